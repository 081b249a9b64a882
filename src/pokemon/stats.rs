// Pokemon能力值系统
// 每次升级按 Δ = 基础成长 + 个体值/个体除数 + 努力值/努力除数 增长（整数除法）
// 体力从个体值获得的成长更快，攻击/防御/速度使用更粗的除数

use serde::{Deserialize, Serialize};
use std::fmt;

// 基础能力值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Health,     // 体力
    Attack,     // 攻击
    Defense,    // 防御
    Speed,      // 速度
}

/// 个体值上限
pub const MAX_IV: u32 = 31;

// 四项能力值，同时用于实际值、个体值(IV)、努力值(EV)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatBlock {
    pub health: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

// 单项成长参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthRule {
    pub base_growth: u32,
    pub iv_divisor: u32,
    pub ev_divisor: u32,
}

impl StatKind {
    pub const ALL: [StatKind; 4] = [
        StatKind::Health,
        StatKind::Attack,
        StatKind::Defense,
        StatKind::Speed,
    ];

    pub fn growth_rule(self) -> GrowthRule {
        match self {
            StatKind::Health => GrowthRule { base_growth: 2, iv_divisor: 8, ev_divisor: 4 },
            StatKind::Attack | StatKind::Defense | StatKind::Speed => {
                GrowthRule { base_growth: 1, iv_divisor: 16, ev_divisor: 8 }
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatKind::Health => "health",
            StatKind::Attack => "attack",
            StatKind::Defense => "defense",
            StatKind::Speed => "speed",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StatBlock {
    pub const fn new(health: u32, attack: u32, defense: u32, speed: u32) -> Self {
        Self { health, attack, defense, speed }
    }

    pub fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Health => self.health,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Speed => self.speed,
        }
    }

    pub fn get_mut(&mut self, kind: StatKind) -> &mut u32 {
        match kind {
            StatKind::Health => &mut self.health,
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Speed => &mut self.speed,
        }
    }

    /// 四项之和（排行榜战力）
    pub fn total(&self) -> u64 {
        StatKind::ALL.iter().map(|&k| u64::from(self.get(k))).sum()
    }

    pub fn min(&self) -> u32 {
        StatKind::ALL.iter().map(|&k| self.get(k)).min().unwrap_or(0)
    }

    pub fn max(&self) -> u32 {
        StatKind::ALL.iter().map(|&k| self.get(k)).max().unwrap_or(0)
    }
}

/// 单次升级时某项能力的增量
pub fn growth_per_level(kind: StatKind, iv: u32, ev: u32) -> u32 {
    let rule = kind.growth_rule();
    rule.base_growth + iv / rule.iv_divisor + ev / rule.ev_divisor
}

/// 努力值不变时，指定等级的能力值
pub fn effective_stat(kind: StatKind, base: u32, iv: u32, ev: u32, level: u32) -> u32 {
    let level_ups = level.saturating_sub(1);
    base.saturating_add(growth_per_level(kind, iv, ev).saturating_mul(level_ups))
}

/// 一次升级带来的全部增量
pub fn level_up_growth(ivs: &StatBlock, evs: &StatBlock) -> StatBlock {
    let mut delta = StatBlock::default();
    for kind in StatKind::ALL {
        *delta.get_mut(kind) = growth_per_level(kind, ivs.get(kind), evs.get(kind));
    }
    delta
}
