// 战斗伤害计算器
// 伤害 = max(1, 攻击 - 防御/2)，10% 暴击翻倍，克制关系 ×2，截断取整后最低为1

use serde::{Deserialize, Serialize};

use crate::core::config::BattleConfig;
use crate::pokemon::individual::Creature;
use crate::pokemon::types::TypeEffectiveness;
use crate::utils::random::RandomSource;

#[derive(Debug, Clone, PartialEq)]
pub struct DamageCalculator {
    critical_chance: f64,
    critical_multiplier: u32,
    type_bonus: f64,
}

// 伤害计算结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageResult {
    pub base_damage: u32,
    pub is_critical: bool,
    pub effectiveness: TypeEffectiveness,
    pub final_damage: u32,
}

impl DamageCalculator {
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            critical_chance: config.critical_chance,
            critical_multiplier: config.critical_multiplier,
            type_bonus: config.type_bonus,
        }
    }

    /// max(1, attack - defense / 2)
    pub fn base_damage(attack: u32, defense: u32) -> u32 {
        let raw = i64::from(attack) - i64::from(defense / 2);
        u32::try_from(raw.max(1)).unwrap_or(u32::MAX)
    }

    pub fn calculate(&self, attacker: &Creature, defender: &Creature, rng: &mut dyn RandomSource) -> DamageResult {
        let base_damage = Self::base_damage(attacker.attack(), defender.defense());

        let is_critical = rng.chance(self.critical_chance);
        let mut damage = base_damage;
        if is_critical {
            damage = damage.saturating_mul(self.critical_multiplier);
        }

        let effectiveness = attacker.element().effectiveness_against(defender.element());
        let scaled = f64::from(damage) * effectiveness.multiplier(self.type_bonus);
        // 截断取整
        let final_damage = (scaled as u32).max(1);

        DamageResult {
            base_damage,
            is_critical,
            effectiveness,
            final_damage,
        }
    }
}

impl Default for DamageCalculator {
    fn default() -> Self {
        Self::new(&BattleConfig::default())
    }
}
