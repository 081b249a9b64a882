// 背包与经济系统
// 货币余额、物品数量、物品效果、每日奖励；余额和数量始终非负

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::core::config::{EconomyConfig, ProgressionConfig};
use crate::core::error::{GameError, GameResult};
use crate::pokemon::evolution::{self, EvolutionOutcome};
use crate::pokemon::individual::Creature;
use crate::pokemon::progression::{self, LevelUpReport};
use crate::utils::random::RandomSource;

// 物品效果数值
pub const HEAL_SMALL_AMOUNT: u32 = 20;
pub const HEAL_LARGE_AMOUNT: u32 = 50;
pub const ATTACK_BOOST_AMOUNT: u32 = 5;
pub const XP_CANDY_AMOUNT: u64 = 50;

// 物品类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    HealSmall,      // 伤药
    HealLarge,      // 好伤药
    AttackBoost,    // 攻击强化
    XpCandy,        // 经验糖果
    EvolutionStone, // 进化石
    CaptureTrap,    // 捕获陷阱
}

// 物品使用效果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    Healed { restored: u32 },
    AttackBoosted { amount: u32 },
    XpGained(LevelUpReport),
    Evolved(EvolutionOutcome),
}

// 使用物品的结构化结果，文本由传输层渲染
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub item: ItemKind,
    pub creature: String,
    pub effect: ItemEffect,
    pub remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DailyReward {
    Currency(u64),
    Item(ItemKind),
}

// 背包
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    currency: u64,
    items: HashMap<ItemKind, u32>,
}

impl ItemKind {
    pub const ALL: [ItemKind; 6] = [
        ItemKind::HealSmall,
        ItemKind::HealLarge,
        ItemKind::AttackBoost,
        ItemKind::XpCandy,
        ItemKind::EvolutionStone,
        ItemKind::CaptureTrap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::HealSmall => "heal_small",
            ItemKind::HealLarge => "heal_large",
            ItemKind::AttackBoost => "attack_boost",
            ItemKind::XpCandy => "xp_candy",
            ItemKind::EvolutionStone => "evolution_stone",
            ItemKind::CaptureTrap => "capture_trap",
        }
    }

    /// 对宝可梦施加效果；失败时调用方负责退还物品
    pub fn apply(self, creature: &mut Creature, config: &ProgressionConfig) -> GameResult<ItemEffect> {
        match self {
            ItemKind::HealSmall => Ok(ItemEffect::Healed {
                restored: creature.restore_health(HEAL_SMALL_AMOUNT),
            }),
            ItemKind::HealLarge => Ok(ItemEffect::Healed {
                restored: creature.restore_health(HEAL_LARGE_AMOUNT),
            }),
            ItemKind::AttackBoost => {
                creature.stats.attack = creature.stats.attack.saturating_add(ATTACK_BOOST_AMOUNT);
                Ok(ItemEffect::AttackBoosted { amount: ATTACK_BOOST_AMOUNT })
            }
            ItemKind::XpCandy => Ok(ItemEffect::XpGained(progression::gain_xp(creature, XP_CANDY_AMOUNT))),
            ItemKind::EvolutionStone => {
                evolution::evolve(creature, config.evolution_bonus).map(ItemEffect::Evolved)
            }
            ItemKind::CaptureTrap => Err(GameError::ItemNotUsable(self)),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = GameError;

    // 兼容旧指令中的物品名
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase().replace('-', "_");
        let kind = match lowered.as_str() {
            "potion" => ItemKind::HealSmall,
            "super_potion" => ItemKind::HealLarge,
            "boost" => ItemKind::AttackBoost,
            "rare_candy" => ItemKind::XpCandy,
            "trap" => ItemKind::CaptureTrap,
            other => ItemKind::ALL
                .iter()
                .copied()
                .find(|k| k.as_str() == other)
                .ok_or_else(|| GameError::Config(format!("未知物品: {s}")))?,
        };
        Ok(kind)
    }
}

impl Inventory {
    pub fn new(config: &EconomyConfig) -> Self {
        let mut inventory = Self {
            currency: config.starting_currency,
            items: HashMap::new(),
        };
        if config.starting_heal_small > 0 {
            inventory.add_item(ItemKind::HealSmall, config.starting_heal_small);
        }
        inventory
    }

    pub fn currency(&self) -> u64 {
        self.currency
    }

    pub fn count(&self, kind: ItemKind) -> u32 {
        self.items.get(&kind).copied().unwrap_or(0)
    }

    /// 持有数量大于0的物品，按固定顺序
    pub fn owned(&self) -> Vec<(ItemKind, u32)> {
        ItemKind::ALL
            .iter()
            .map(|&kind| (kind, self.count(kind)))
            .filter(|&(_, count)| count > 0)
            .collect()
    }

    pub fn add_item(&mut self, kind: ItemKind, quantity: u32) {
        let count = self.items.entry(kind).or_insert(0);
        *count = count.saturating_add(quantity);
        debug!("添加物品: {} x{}", kind, quantity);
    }

    /// 取出一个物品，数量为0时失败
    pub fn take_item(&mut self, kind: ItemKind) -> GameResult<()> {
        match self.items.get_mut(&kind) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(())
            }
            _ => Err(GameError::ItemNotOwned(kind)),
        }
    }

    pub fn credit(&mut self, amount: u64) {
        self.currency = self.currency.saturating_add(amount);
    }

    pub fn debit(&mut self, amount: u64) -> GameResult<()> {
        if self.currency < amount {
            return Err(GameError::InsufficientFunds {
                required: amount,
                available: self.currency,
            });
        }
        self.currency -= amount;
        Ok(())
    }

    pub fn buy(&mut self, kind: ItemKind, config: &EconomyConfig) -> GameResult<()> {
        self.debit(config.prices.price(kind))?;
        self.add_item(kind, 1);
        Ok(())
    }

    pub fn grant(&mut self, reward: DailyReward) {
        match reward {
            DailyReward::Currency(amount) => self.credit(amount),
            DailyReward::Item(kind) => self.add_item(kind, 1),
        }
    }
}

/// 奖励种类（货币 / 物品）等概率，物品再在全部物品中等概率选择
pub fn roll_daily_reward(rng: &mut dyn RandomSource, config: &EconomyConfig) -> DailyReward {
    if rng.pick_index(2) == 0 {
        let min = u32::try_from(config.daily_currency_min).unwrap_or(u32::MAX);
        let max = u32::try_from(config.daily_currency_max).unwrap_or(u32::MAX);
        DailyReward::Currency(u64::from(rng.range_inclusive(min, max)))
    } else {
        DailyReward::Item(ItemKind::ALL[rng.pick_index(ItemKind::ALL.len())])
    }
}
