// 宝可梦进化系统
// 只有具备进化资格且仍处于初始阶段的个体可以进化；失败是常见结果，不修改任何状态

use log::info;
use serde::{Deserialize, Serialize};

use crate::core::config::StatBonus;
use crate::core::error::{GameError, GameResult};
use crate::pokemon::individual::{Creature, EvolutionStage};

/// 进化后名字前缀
pub const EVOLVED_PREFIX: &str = "Mega ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionOutcome {
    pub previous_name: String,
    pub new_name: String,
    pub bonus: StatBonus,
}

pub fn can_evolve(creature: &Creature) -> bool {
    creature.can_evolve && creature.stage == EvolutionStage::Base
}

pub fn evolve(creature: &mut Creature, bonus: StatBonus) -> GameResult<EvolutionOutcome> {
    if !can_evolve(creature) {
        return Err(GameError::EvolutionNotEligible(creature.name.clone()));
    }

    let previous_name = creature.name.clone();
    creature.stage = EvolutionStage::Evolved;
    creature.name = format!("{EVOLVED_PREFIX}{previous_name}");

    let stats = &mut creature.stats;
    stats.health = stats.health.saturating_add(bonus.health);
    stats.attack = stats.attack.saturating_add(bonus.attack);
    stats.defense = stats.defense.saturating_add(bonus.defense);
    stats.speed = stats.speed.saturating_add(bonus.speed);
    creature.full_restore();

    info!("{} 进化为 {}", previous_name, creature.name);

    Ok(EvolutionOutcome {
        previous_name,
        new_name: creature.name.clone(),
        bonus,
    })
}
