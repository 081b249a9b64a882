/*
* 个体宝可梦：
* 1. 名字可改；种族、属性、个体值在捕获时确定，之后不再变化
* 2. 努力值只增不减，道具或治疗的显式扣除除外
* 3. 当前体力始终在 [0, 最大体力] 内，0 表示失去战斗能力
* 4. 进化资格在捕获时按概率决定，阶段只能 1 -> 2
*/

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::config::ProgressionConfig;
use crate::pokemon::species::SpeciesEntry;
use crate::pokemon::stats::{StatBlock, StatKind, MAX_IV};
use crate::pokemon::types::ElementType;
use crate::utils::random::RandomSource;

/// 闪光个体的名字前缀
pub const SHINY_PREFIX: &str = "Shiny ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvolutionStage {
    Base,
    Evolved,
}

// 胜负记录，宝可梦和训练师共用
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub wins: u32,
    pub losses: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub(crate) name: String,
    pub(crate) species: String,
    pub(crate) element: ElementType,
    pub(crate) sprite: String,
    pub(crate) shiny: bool,

    // 实际能力值，health 为最大体力
    pub(crate) stats: StatBlock,
    pub(crate) ivs: StatBlock,
    pub(crate) evs: StatBlock,

    pub(crate) level: u32,
    pub(crate) xp: u64,
    pub(crate) xp_to_next: u64,
    pub(crate) current_health: u32,

    pub(crate) can_evolve: bool,
    pub(crate) stage: EvolutionStage,

    pub(crate) record: BattleRecord,
}

impl BattleRecord {
    pub fn battles(&self) -> u32 {
        self.wins + self.losses
    }
}

impl Creature {
    /// 以确定的个体值创建1级宝可梦
    pub fn new(species: &SpeciesEntry, ivs: StatBlock, can_evolve: bool, xp_to_next: u64) -> Self {
        debug_assert!(species.base_stats.min() >= 1, "基础能力值必须 >= 1");
        debug_assert!(ivs.max() <= MAX_IV, "个体值必须在 [0, 31] 内");
        debug_assert!(xp_to_next >= 1, "升级经验必须 >= 1");

        Self {
            name: species.name.clone(),
            species: species.name.clone(),
            element: species.element,
            sprite: species.sprite.clone(),
            shiny: false,
            stats: species.base_stats,
            ivs,
            evs: StatBlock::default(),
            level: 1,
            xp: 0,
            xp_to_next,
            current_health: species.base_stats.health,
            can_evolve,
            stage: EvolutionStage::Base,
            record: BattleRecord::default(),
        }
    }

    /// 捕获时随机生成：个体值、进化资格、闪光
    pub fn roll(species: &SpeciesEntry, rng: &mut dyn RandomSource, config: &ProgressionConfig) -> Self {
        let ivs = StatBlock::new(
            rng.range_inclusive(0, MAX_IV),
            rng.range_inclusive(0, MAX_IV),
            rng.range_inclusive(0, MAX_IV),
            rng.range_inclusive(0, MAX_IV),
        );
        let can_evolve = rng.chance(config.evolution_chance);
        let mut creature = Self::new(species, ivs, can_evolve, config.initial_xp_to_next);

        if rng.chance(config.shiny_chance) {
            let bonus = config.shiny_bonus;
            creature.name = format!("{SHINY_PREFIX}{}", species.name);
            creature.sprite = species.shiny_sprite();
            creature.shiny = true;
            creature.stats.health += bonus.health;
            creature.stats.attack += bonus.attack;
            creature.stats.defense += bonus.defense;
            creature.stats.speed += bonus.speed;
            creature.current_health = creature.stats.health;
        }

        debug!(
            "生成宝可梦 {} (IV {:?}, 可进化: {}, 闪光: {})",
            creature.name, creature.ivs, creature.can_evolve, creature.shiny
        );
        creature
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn element(&self) -> ElementType {
        self.element
    }

    pub fn sprite(&self) -> &str {
        &self.sprite
    }

    pub fn is_shiny(&self) -> bool {
        self.shiny
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn ivs(&self) -> &StatBlock {
        &self.ivs
    }

    pub fn evs(&self) -> &StatBlock {
        &self.evs
    }

    pub fn stat(&self, kind: StatKind) -> u32 {
        self.stats.get(kind)
    }

    pub fn max_health(&self) -> u32 {
        self.stats.health
    }

    pub fn attack(&self) -> u32 {
        self.stats.attack
    }

    pub fn defense(&self) -> u32 {
        self.stats.defense
    }

    pub fn speed(&self) -> u32 {
        self.stats.speed
    }

    pub fn current_health(&self) -> u32 {
        self.current_health
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn xp_to_next(&self) -> u64 {
        self.xp_to_next
    }

    /// 当前等级的经验进度，[0, 1)
    pub fn xp_progress(&self) -> f64 {
        self.xp as f64 / self.xp_to_next.max(1) as f64
    }

    pub fn can_evolve(&self) -> bool {
        self.can_evolve
    }

    pub fn stage(&self) -> EvolutionStage {
        self.stage
    }

    pub fn record(&self) -> BattleRecord {
        self.record
    }

    pub fn is_fainted(&self) -> bool {
        self.current_health == 0
    }

    /// 排行榜用的战力：四项实际能力之和
    pub fn power(&self) -> u64 {
        self.stats.total()
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// 回复体力（不超过上限），返回实际回复量
    pub(crate) fn restore_health(&mut self, amount: u32) -> u32 {
        let before = self.current_health;
        self.current_health = self.current_health.saturating_add(amount).min(self.stats.health);
        self.current_health - before
    }

    pub(crate) fn full_restore(&mut self) -> u32 {
        self.restore_health(self.stats.health)
    }

    /// 受到伤害，体力最低为0，返回剩余体力
    pub(crate) fn take_damage(&mut self, amount: u32) -> u32 {
        self.current_health = self.current_health.saturating_sub(amount);
        self.current_health
    }

    pub(crate) fn record_win(&mut self) {
        self.record.wins += 1;
    }

    pub(crate) fn record_loss(&mut self) {
        self.record.losses += 1;
    }
}
