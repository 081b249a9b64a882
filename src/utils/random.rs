/*
* 随机数来源：
* 1. 所有随机行为（个体值、闪光、暴击、努力值、每日奖励）都通过 RandomSource 注入
* 2. RandomGenerator 基于 ChaCha8，相同种子产生相同序列，便于复现战斗
* 3. 不存在任何全局随机数生成器
*/

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// 可注入的随机数来源
pub trait RandomSource {
    /// 生成 [min, max] 内的整数（包含max）
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32;

    /// 以给定概率返回 true
    fn chance(&mut self, probability: f64) -> bool;

    /// 在 [0, len) 内选择一个下标，len 必须大于0
    fn pick_index(&mut self, len: usize) -> usize;
}

/// 可复现的随机数生成器
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    rng: ChaCha8Rng,
    seed: u64,
    /// 已生成次数
    draws: u64,
}

impl RandomGenerator {
    /// 使用随机种子创建
    pub fn new() -> Self {
        Self::with_seed(rand::random::<u64>())
    }

    /// 使用指定种子创建
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            draws: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// 重置种子
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::with_seed(seed);
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for RandomGenerator {
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        self.draws += 1;
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.draws += 1;
        self.rng.gen::<f64>() < probability.clamp(0.0, 1.0)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick_index 需要非空范围");
        self.draws += 1;
        self.rng.gen_range(0..len.max(1))
    }
}
