/*
* 核心配置：
* 1. 成长、经济、战斗三个分区，默认值即标准数值
* 2. 由调用方读取文件后以TOML字符串传入，核心不做I/O
* 3. 加载后统一校验，非法配置以 GameError::Config 返回
*/

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, GameResult};
use crate::player::inventory::ItemKind;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub progression: ProgressionConfig,
    pub economy: EconomyConfig,
    pub battle: BattleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// 1级升2级所需经验
    pub initial_xp_to_next: u64,
    /// 捕获时获得进化资格的概率
    pub evolution_chance: f64,
    pub shiny_chance: f64,
    pub evolution_bonus: StatBonus,
    pub shiny_bonus: StatBonus,
    /// 治疗时扣除的攻击努力值
    pub heal_ev_penalty: u32,
}

/// 一次性的固定能力加成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBonus {
    pub health: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_currency: u64,
    pub starting_heal_small: u32,
    pub prices: ItemPrices,
    pub daily_currency_min: u64,
    pub daily_currency_max: u64,
    pub release_refund_per_level: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemPrices {
    pub heal_small: u64,
    pub heal_large: u64,
    pub attack_boost: u64,
    pub xp_candy: u64,
    pub evolution_stone: u64,
    pub capture_trap: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub max_turns: u32,
    pub critical_chance: f64,
    pub critical_multiplier: u32,
    pub type_bonus: f64,
    pub win_reward: u64,
    pub loss_reward: u64,
    pub xp_base: u64,
    pub xp_per_loser_level: u64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            initial_xp_to_next: 20,
            evolution_chance: 0.3,
            shiny_chance: 0.01,
            evolution_bonus: StatBonus { health: 20, attack: 10, defense: 10, speed: 10 },
            shiny_bonus: StatBonus { health: 20, attack: 10, defense: 10, speed: 0 },
            heal_ev_penalty: 1,
        }
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_currency: 0,
            starting_heal_small: 2,
            prices: ItemPrices::default(),
            daily_currency_min: 50,
            daily_currency_max: 150,
            release_refund_per_level: 5,
        }
    }
}

impl Default for ItemPrices {
    fn default() -> Self {
        Self {
            heal_small: 50,
            heal_large: 120,
            attack_boost: 80,
            xp_candy: 200,
            evolution_stone: 500,
            capture_trap: 150,
        }
    }
}

impl ItemPrices {
    pub fn price(&self, kind: ItemKind) -> u64 {
        match kind {
            ItemKind::HealSmall => self.heal_small,
            ItemKind::HealLarge => self.heal_large,
            ItemKind::AttackBoost => self.attack_boost,
            ItemKind::XpCandy => self.xp_candy,
            ItemKind::EvolutionStone => self.evolution_stone,
            ItemKind::CaptureTrap => self.capture_trap,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_turns: 20,
            critical_chance: 0.1,
            critical_multiplier: 2,
            type_bonus: 2.0,
            win_reward: 50,
            loss_reward: 20,
            xp_base: 25,
            xp_per_loser_level: 5,
        }
    }
}

impl CoreConfig {
    // 从TOML文本加载，缺省字段使用默认值
    pub fn from_toml_str(text: &str) -> GameResult<Self> {
        let config: CoreConfig = toml::from_str(text)?;
        config.validate()?;
        debug!("核心配置已加载: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> GameResult<()> {
        let progression = &self.progression;
        if progression.initial_xp_to_next < 2 {
            // 阈值为1时 floor(1 * 1.5) == 1，无法严格递增
            return Err(GameError::Config("initial_xp_to_next 必须 >= 2".to_string()));
        }
        check_probability("evolution_chance", progression.evolution_chance)?;
        check_probability("shiny_chance", progression.shiny_chance)?;

        let economy = &self.economy;
        if economy.daily_currency_min > economy.daily_currency_max {
            return Err(GameError::Config(format!(
                "daily_currency_min ({}) 大于 daily_currency_max ({})",
                economy.daily_currency_min, economy.daily_currency_max
            )));
        }

        let battle = &self.battle;
        if battle.max_turns == 0 {
            return Err(GameError::Config("max_turns 必须 >= 1".to_string()));
        }
        check_probability("critical_chance", battle.critical_chance)?;
        if battle.critical_multiplier == 0 {
            return Err(GameError::Config("critical_multiplier 必须 >= 1".to_string()));
        }
        if !(battle.type_bonus.is_finite() && battle.type_bonus >= 1.0) {
            return Err(GameError::Config("type_bonus 必须 >= 1.0".to_string()));
        }

        Ok(())
    }
}

fn check_probability(name: &str, value: f64) -> GameResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GameError::Config(format!("{name} 必须在 [0, 1] 内, 当前 {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.battle.max_turns, 20);
        assert_eq!(config.economy.prices.price(ItemKind::EvolutionStone), 500);
    }

    #[test]
    fn test_default_shop_prices() {
        let prices = ItemPrices::default();
        assert_eq!(prices.price(ItemKind::HealSmall), 50);
        assert_eq!(prices.price(ItemKind::HealLarge), 120);
        assert_eq!(prices.price(ItemKind::AttackBoost), 80);
        assert_eq!(prices.price(ItemKind::XpCandy), 200);
        assert_eq!(prices.price(ItemKind::EvolutionStone), 500);
        assert_eq!(prices.price(ItemKind::CaptureTrap), 150);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CoreConfig::from_toml_str(
            r#"
            [battle]
            win_reward = 75

            [economy.prices]
            xp_candy = 120
            "#,
        )
        .unwrap();

        assert_eq!(config.battle.win_reward, 75);
        assert_eq!(config.battle.loss_reward, 20);
        assert_eq!(config.economy.prices.xp_candy, 120);
        assert_eq!(config.economy.prices.heal_small, 50);
        assert_eq!(config.progression.initial_xp_to_next, 20);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = CoreConfig::from_toml_str("[progression]\ninitial_xp_to_next = 1\n");
        assert!(matches!(result, Err(GameError::Config(_))));

        let result = CoreConfig::from_toml_str("[battle]\ncritical_chance = 1.5\n");
        assert!(matches!(result, Err(GameError::Config(_))));

        let result = CoreConfig::from_toml_str(
            "[economy]\ndaily_currency_min = 200\ndaily_currency_max = 100\n",
        );
        assert!(matches!(result, Err(GameError::Config(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let result = CoreConfig::from_toml_str("[battle\nmax_turns = 3");
        assert!(matches!(result, Err(GameError::Config(_))));
    }
}
