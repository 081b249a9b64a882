/*
* 训练师：
* 1. 身份键大小写不敏感，来自平台用户名，缺失时用 "显示名_数字ID"
* 2. 队伍最多6只，按捕获顺序排列，第一只是出战宝可梦
* 3. 持有背包（货币 + 物品）、胜负记录、每日奖励领取日期
* 4. 所有操作都返回结构化结果，不格式化面向用户的文本
*/

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::core::config::CoreConfig;
use crate::core::error::{GameError, GameResult};
use crate::player::inventory::{self, DailyReward, Inventory, ItemKind, ItemOutcome};
use crate::pokemon::evolution::{self, EvolutionOutcome};
use crate::pokemon::individual::{BattleRecord, Creature};
use crate::pokemon::progression::{self, HealOutcome};
use crate::pokemon::species::{SpeciesCatalog, SpeciesEntry};
use crate::pokemon::stats::{StatBlock, StatKind};
use crate::pokemon::types::ElementType;
use crate::utils::random::RandomSource;

/// 队伍容量
pub const MAX_ROSTER_SIZE: usize = 6;

// 训练师身份，统一小写
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrainerId(String);

// 队伍排序方式（降序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterOrder {
    Health,
    Attack,
    Speed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseOutcome {
    pub creature: Creature,
    pub refund: u64,
}

// 全体治疗中单只宝可梦的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureHealed {
    pub creature: String,
    pub outcome: HealOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    id: TrainerId,
    roster: Vec<Creature>,
    inventory: Inventory,
    record: BattleRecord,
    last_daily_claim: Option<NaiveDate>,
    #[serde(skip)]
    config: Arc<CoreConfig>,
}

impl TrainerId {
    pub fn new(identity: &str) -> Self {
        Self(identity.trim().to_lowercase())
    }

    /// 平台用户名优先，缺失时使用 显示名_ID
    pub fn from_platform(handle: Option<&str>, display_name: &str, user_id: i64) -> Self {
        match handle.map(str::trim).filter(|h| !h.is_empty()) {
            Some(handle) => Self::new(handle),
            None => Self::new(&format!("{display_name}_{user_id}")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrainerId {
    fn from(identity: &str) -> Self {
        Self::new(identity)
    }
}

impl Trainer {
    pub fn new(id: TrainerId, config: Arc<CoreConfig>) -> Self {
        Self {
            inventory: Inventory::new(&config.economy),
            id,
            roster: Vec::new(),
            record: BattleRecord::default(),
            last_daily_claim: None,
            config,
        }
    }

    /// 队伍固定的非玩家训练师（道馆馆主等），超过容量时失败
    pub fn npc(id: TrainerId, roster: Vec<Creature>, config: Arc<CoreConfig>) -> GameResult<Self> {
        if roster.len() > MAX_ROSTER_SIZE {
            return Err(GameError::RosterFull { capacity: MAX_ROSTER_SIZE });
        }
        let mut trainer = Self::new(id, config);
        trainer.roster = roster;
        Ok(trainer)
    }

    /// 岩石道馆馆主：小拳石 + 大岩蛇，个体值为0且不可进化
    pub fn rock_gym_leader(config: Arc<CoreConfig>) -> Self {
        let xp_to_next = config.progression.initial_xp_to_next;
        let roster = [
            SpeciesEntry::new("Geodude", ElementType::Rock, StatBlock::new(80, 100, 120, 30)),
            SpeciesEntry::new("Onix", ElementType::Rock, StatBlock::new(120, 80, 150, 50)),
        ]
        .iter()
        .map(|species| Creature::new(species, StatBlock::default(), false, xp_to_next))
        .collect();

        Self {
            roster,
            ..Self::new(TrainerId::new("gym_leader_brock"), config)
        }
    }

    pub fn id(&self) -> &TrainerId {
        &self.id
    }

    pub fn roster(&self) -> &[Creature] {
        &self.roster
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn currency(&self) -> u64 {
        self.inventory.currency()
    }

    pub fn record(&self) -> BattleRecord {
        self.record
    }

    pub fn last_daily_claim(&self) -> Option<NaiveDate> {
        self.last_daily_claim
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// 出战宝可梦
    pub fn lead(&self) -> Option<&Creature> {
        self.roster.first()
    }

    pub fn total_level(&self) -> u64 {
        self.roster.iter().map(|c| u64::from(c.level())).sum()
    }

    pub fn total_power(&self) -> u64 {
        self.roster.iter().map(Creature::power).sum()
    }

    pub fn find(&self, name: &str) -> Option<&Creature> {
        self.roster.iter().find(|c| c.matches_name(name))
    }

    fn position(&self, name: &str) -> GameResult<usize> {
        self.roster
            .iter()
            .position(|c| c.matches_name(name))
            .ok_or_else(|| GameError::CreatureNotFound(name.to_string()))
    }

    /// 从图鉴中随机捕获一只，队伍已满时不做任何修改
    pub fn catch(&mut self, catalog: &SpeciesCatalog, rng: &mut dyn RandomSource) -> GameResult<&Creature> {
        if self.roster.len() >= MAX_ROSTER_SIZE {
            debug!("{} 捕获失败: 队伍已满", self.id);
            return Err(GameError::RosterFull { capacity: MAX_ROSTER_SIZE });
        }
        if catalog.is_empty() {
            return Err(GameError::EmptySpeciesCatalog);
        }

        let species = &catalog.entries()[rng.pick_index(catalog.len())];
        let creature = Creature::roll(species, rng, &self.config.progression);
        info!("{} 捕获了 {}", self.id, creature.name());
        self.roster.push(creature);

        let index = self.roster.len() - 1;
        Ok(&self.roster[index])
    }

    pub fn rename(&mut self, old: &str, new: &str) -> GameResult<&Creature> {
        let new = new.trim();
        if new.is_empty() {
            return Err(GameError::InvalidName(new.to_string()));
        }
        let index = self.position(old)?;
        self.roster[index].set_name(new);
        Ok(&self.roster[index])
    }

    /// 使用物品；进化石等效果失败时物品退还
    pub fn use_item(&mut self, kind: ItemKind, creature_name: &str) -> GameResult<ItemOutcome> {
        if self.inventory.count(kind) == 0 {
            return Err(GameError::ItemNotOwned(kind));
        }
        let index = self.position(creature_name)?;

        self.inventory.take_item(kind)?;
        let creature = &mut self.roster[index];
        match kind.apply(creature, &self.config.progression) {
            Ok(effect) => {
                debug!("{} 对 {} 使用了 {}", self.id, creature.name(), kind);
                Ok(ItemOutcome {
                    item: kind,
                    creature: creature.name().to_string(),
                    effect,
                    remaining: self.inventory.count(kind),
                })
            }
            Err(error) => {
                self.inventory.add_item(kind, 1);
                debug!("{} 使用 {} 失败, 已退还: {}", self.id, kind, error);
                Err(error)
            }
        }
    }

    pub fn evolve(&mut self, creature_name: &str) -> GameResult<EvolutionOutcome> {
        let index = self.position(creature_name)?;
        evolution::evolve(&mut self.roster[index], self.config.progression.evolution_bonus)
    }

    pub fn heal(&mut self, creature_name: &str) -> GameResult<HealOutcome> {
        let index = self.position(creature_name)?;
        Ok(progression::heal(&mut self.roster[index], self.config.progression.heal_ev_penalty))
    }

    /// 治疗全部宝可梦，每只都按单体治疗扣除努力值
    pub fn heal_all(&mut self) -> GameResult<Vec<CreatureHealed>> {
        if self.roster.is_empty() {
            return Err(GameError::SelfHasNoCreatures);
        }
        let penalty = self.config.progression.heal_ev_penalty;
        let healed = self
            .roster
            .iter_mut()
            .map(|creature| CreatureHealed {
                outcome: progression::heal(creature, penalty),
                creature: creature.name().to_string(),
            })
            .collect();
        debug!("{} 治疗了全部宝可梦", self.id);
        Ok(healed)
    }

    /// 放生，按等级返还货币
    pub fn release(&mut self, creature_name: &str) -> GameResult<ReleaseOutcome> {
        let index = self.position(creature_name)?;
        let creature = self.roster.remove(index);
        let refund = u64::from(creature.level()) * self.config.economy.release_refund_per_level;
        self.inventory.credit(refund);
        info!("{} 放生了 {} (返还 {})", self.id, creature.name(), refund);
        Ok(ReleaseOutcome { creature, refund })
    }

    pub fn claim_daily(&mut self, today: NaiveDate, rng: &mut dyn RandomSource) -> GameResult<DailyReward> {
        if self.last_daily_claim == Some(today) {
            return Err(GameError::AlreadyClaimed(today));
        }
        let reward = inventory::roll_daily_reward(rng, &self.config.economy);
        self.inventory.grant(reward);
        self.last_daily_claim = Some(today);
        debug!("{} 领取每日奖励 {:?}", self.id, reward);
        Ok(reward)
    }

    pub fn buy(&mut self, kind: ItemKind) -> GameResult<()> {
        self.inventory.buy(kind, &self.config.economy)
    }

    /// 稳定降序排序，会改变出战宝可梦
    pub fn sort_roster(&mut self, order: RosterOrder) {
        let kind = match order {
            RosterOrder::Health => StatKind::Health,
            RosterOrder::Attack => StatKind::Attack,
            RosterOrder::Speed => StatKind::Speed,
        };
        self.roster.sort_by(|a, b| b.stat(kind).cmp(&a.stat(kind)));
    }

    /// 把指定宝可梦移到队首
    pub fn set_lead(&mut self, creature_name: &str) -> GameResult<&Creature> {
        let index = self.position(creature_name)?;
        let creature = self.roster.remove(index);
        self.roster.insert(0, creature);
        Ok(&self.roster[0])
    }

    /// 对战用的拆分借用；没有宝可梦时返回 None
    pub(crate) fn corner(&mut self) -> Option<Corner<'_>> {
        let lead = self.roster.first_mut()?;
        Some(Corner {
            id: &self.id,
            lead,
            record: &mut self.record,
            inventory: &mut self.inventory,
        })
    }

    #[cfg(test)]
    pub(crate) fn push_creature(&mut self, creature: Creature) {
        self.roster.push(creature);
    }

    #[cfg(test)]
    pub(crate) fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }
}

/// 对战期间的训练师视图：出战宝可梦、战绩、背包分别借用
#[derive(Debug)]
pub(crate) struct Corner<'a> {
    pub id: &'a TrainerId,
    pub lead: &'a mut Creature,
    record: &'a mut BattleRecord,
    inventory: &'a mut Inventory,
}

impl Corner<'_> {
    pub fn record_win(&mut self, reward: u64) {
        self.record.wins += 1;
        self.inventory.credit(reward);
    }

    pub fn record_loss(&mut self, reward: u64) {
        self.record.losses += 1;
        self.inventory.credit(reward);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::engine::BattleEngine;
    use crate::pokemon::individual::EvolutionStage;
    use crate::utils::random::testing::ScriptedRandom;
    use crate::utils::random::RandomGenerator;

    fn trainer() -> Trainer {
        Trainer::new(TrainerId::new("Ash"), Arc::new(CoreConfig::default()))
    }

    fn creature(name: &str, stats: StatBlock, can_evolve: bool) -> Creature {
        Creature::new(&SpeciesEntry::new(name, ElementType::Normal, stats), StatBlock::default(), can_evolve, 20)
    }

    #[test]
    fn test_trainer_identity() {
        assert_eq!(TrainerId::new(" MiSTY ").as_str(), "misty");
        assert_eq!(TrainerId::from_platform(Some("Brock"), "Brock", 7).as_str(), "brock");
        assert_eq!(TrainerId::from_platform(None, "Gary", 42).as_str(), "gary_42");
        assert_eq!(TrainerId::from_platform(Some("  "), "Gary", 42).as_str(), "gary_42");
        assert!(TrainerId::new("alice") < TrainerId::new("bob"));
    }

    #[test]
    fn test_new_trainer_state() {
        let trainer = trainer();
        assert_eq!(trainer.id().as_str(), "ash");
        assert!(trainer.roster().is_empty());
        assert!(trainer.lead().is_none());
        assert_eq!(trainer.inventory().count(ItemKind::HealSmall), 2);
        assert_eq!(trainer.last_daily_claim(), None);
    }

    #[test]
    fn test_seventh_catch_fails() {
        let mut trainer = trainer();
        let catalog = SpeciesCatalog::starter();
        let mut rng = RandomGenerator::with_seed(99);

        for _ in 0..MAX_ROSTER_SIZE {
            assert!(trainer.catch(&catalog, &mut rng).is_ok());
        }
        let before = trainer.roster().to_vec();
        assert_eq!(
            trainer.catch(&catalog, &mut rng).map(|c| c.name().to_string()),
            Err(GameError::RosterFull { capacity: 6 })
        );
        assert_eq!(trainer.roster(), before.as_slice());
    }

    #[test]
    fn test_catch_appends_in_order() {
        let mut trainer = trainer();
        let catalog = SpeciesCatalog::starter();
        let mut rng = RandomGenerator::with_seed(1);

        let first = trainer.catch(&catalog, &mut rng).unwrap().species().to_string();
        let second = trainer.catch(&catalog, &mut rng).unwrap().species().to_string();
        assert_eq!(trainer.roster()[0].species(), first);
        assert_eq!(trainer.roster()[1].species(), second);
        assert_eq!(trainer.lead().unwrap().species(), first);
    }

    #[test]
    fn test_rename() {
        let mut trainer = trainer();
        trainer.push_creature(creature("Eevee", StatBlock::new(55, 55, 50, 55), false));

        assert_eq!(trainer.rename("eevee", "Sparky").unwrap().name(), "Sparky");
        assert!(trainer.find("SPARKY").is_some());
        assert_eq!(
            trainer.rename("eevee", "Other").map(|c| c.name().to_string()),
            Err(GameError::CreatureNotFound("eevee".to_string()))
        );
        assert!(matches!(trainer.rename("sparky", "   "), Err(GameError::InvalidName(_))));
    }

    #[test]
    fn test_use_item_errors() {
        let mut trainer = trainer();
        trainer.push_creature(creature("Eevee", StatBlock::new(55, 55, 50, 55), false));

        assert_eq!(
            trainer.use_item(ItemKind::XpCandy, "eevee"),
            Err(GameError::ItemNotOwned(ItemKind::XpCandy))
        );
        assert_eq!(
            trainer.use_item(ItemKind::HealSmall, "mew"),
            Err(GameError::CreatureNotFound("mew".to_string()))
        );
        assert_eq!(trainer.inventory().count(ItemKind::HealSmall), 2);
    }

    #[test]
    fn test_use_item_consumes_one() {
        let mut trainer = trainer();
        trainer.push_creature(creature("Eevee", StatBlock::new(55, 55, 50, 55), false));
        trainer.roster[0].take_damage(25);

        let outcome = trainer.use_item(ItemKind::HealSmall, "EEVEE").unwrap();
        assert_eq!(outcome.creature, "Eevee");
        assert_eq!(outcome.remaining, 1);
        assert_eq!(trainer.roster()[0].current_health(), 50);
    }

    #[test]
    fn test_failed_stone_is_refunded() {
        let mut trainer = trainer();
        trainer.push_creature(creature("Eevee", StatBlock::new(55, 55, 50, 55), false));
        trainer.inventory_mut().add_item(ItemKind::EvolutionStone, 1);

        assert!(matches!(
            trainer.use_item(ItemKind::EvolutionStone, "eevee"),
            Err(GameError::EvolutionNotEligible(_))
        ));
        assert_eq!(trainer.inventory().count(ItemKind::EvolutionStone), 1);
        assert_eq!(trainer.roster()[0].stage(), EvolutionStage::Base);
    }

    #[test]
    fn test_successful_stone_is_consumed() {
        let mut trainer = trainer();
        trainer.push_creature(creature("Eevee", StatBlock::new(55, 55, 50, 55), true));
        trainer.inventory_mut().add_item(ItemKind::EvolutionStone, 1);

        let outcome = trainer.use_item(ItemKind::EvolutionStone, "eevee").unwrap();
        assert_eq!(outcome.creature, "Mega Eevee");
        assert_eq!(outcome.remaining, 0);
        assert_eq!(trainer.inventory().count(ItemKind::EvolutionStone), 0);
    }

    #[test]
    fn test_evolve_at_most_once() {
        let mut trainer = trainer();
        trainer.push_creature(creature("Eevee", StatBlock::new(55, 55, 50, 55), true));

        assert!(trainer.evolve("eevee").is_ok());
        assert!(matches!(trainer.evolve("mega eevee"), Err(GameError::EvolutionNotEligible(_))));
        assert!(matches!(trainer.evolve("eevee"), Err(GameError::CreatureNotFound(_))));
    }

    #[test]
    fn test_release_refund() {
        let mut trainer = trainer();
        let mut eevee = creature("Eevee", StatBlock::new(55, 55, 50, 55), false);
        progression::gain_xp(&mut eevee, 50);
        trainer.push_creature(eevee);

        let outcome = trainer.release("eevee").unwrap();
        assert_eq!(outcome.refund, 3 * 5);
        assert_eq!(trainer.currency(), 15);
        assert!(trainer.roster().is_empty());
        assert!(matches!(trainer.release("eevee"), Err(GameError::CreatureNotFound(_))));
    }

    #[test]
    fn test_claim_daily_twice_same_day() {
        let mut trainer = trainer();
        let mut rng = RandomGenerator::with_seed(8);
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        assert!(trainer.claim_daily(today, &mut rng).is_ok());
        let snapshot = trainer.inventory().clone();
        assert_eq!(trainer.claim_daily(today, &mut rng), Err(GameError::AlreadyClaimed(today)));
        assert_eq!(trainer.inventory(), &snapshot);

        let tomorrow = today.succ_opt().unwrap();
        assert!(trainer.claim_daily(tomorrow, &mut rng).is_ok());
        assert_eq!(trainer.last_daily_claim(), Some(tomorrow));
    }

    #[test]
    fn test_buy_insufficient_funds_keeps_balance() {
        let mut trainer = trainer();
        trainer.inventory_mut().credit(400);
        assert_eq!(
            trainer.buy(ItemKind::EvolutionStone),
            Err(GameError::InsufficientFunds { required: 500, available: 400 })
        );
        assert_eq!(trainer.currency(), 400);
        assert!(trainer.buy(ItemKind::HealSmall).is_ok());
        assert_eq!(trainer.currency(), 350);
    }

    #[test]
    fn test_sort_and_set_lead() {
        let mut trainer = trainer();
        trainer.push_creature(creature("Slow", StatBlock::new(90, 10, 10, 10), false));
        trainer.push_creature(creature("Fast", StatBlock::new(30, 40, 10, 99), false));
        trainer.push_creature(creature("Strong", StatBlock::new(50, 80, 10, 50), false));

        trainer.sort_roster(RosterOrder::Speed);
        assert_eq!(trainer.lead().unwrap().name(), "Fast");
        trainer.sort_roster(RosterOrder::Attack);
        assert_eq!(trainer.lead().unwrap().name(), "Strong");
        trainer.sort_roster(RosterOrder::Health);
        assert_eq!(trainer.lead().unwrap().name(), "Slow");

        trainer.set_lead("fast").unwrap();
        let names: Vec<&str> = trainer.roster().iter().map(Creature::name).collect();
        assert_eq!(names, vec!["Fast", "Slow", "Strong"]);
    }

    #[test]
    fn test_heal_command() {
        let mut trainer = trainer();
        trainer.push_creature(creature("Eevee", StatBlock::new(55, 55, 50, 55), false));
        trainer.roster[0].take_damage(40);
        let outcome = trainer.heal("eevee").unwrap();
        assert_eq!(outcome.restored, 40);
        assert!(matches!(trainer.heal("nobody"), Err(GameError::CreatureNotFound(_))));
    }

    #[test]
    fn test_heal_all() {
        let mut trainer = trainer();
        assert_eq!(trainer.heal_all(), Err(GameError::SelfHasNoCreatures));

        trainer.push_creature(creature("Eevee", StatBlock::new(55, 55, 50, 55), false));
        trainer.push_creature(creature("Ditto", StatBlock::new(48, 48, 48, 48), false));
        trainer.roster[0].take_damage(15);
        trainer.roster[1].evs.attack = 2;

        let healed = trainer.heal_all().unwrap();
        assert_eq!(healed.len(), 2);
        assert_eq!(healed[0].creature, "Eevee");
        assert_eq!(healed[0].outcome, HealOutcome { restored: 15, ev_reduced: 0 });
        assert_eq!(healed[1].outcome, HealOutcome { restored: 0, ev_reduced: 1 });
        assert!(trainer.roster().iter().all(|c| c.current_health() == c.max_health()));
        assert_eq!(trainer.roster()[1].evs().attack, 1);
    }

    #[test]
    fn test_npc_roster_capacity() {
        let config = Arc::new(CoreConfig::default());
        let six = vec![creature("Rattata", StatBlock::new(30, 56, 35, 72), false); 6];
        let npc = Trainer::npc(TrainerId::new("Youngster"), six.clone(), Arc::clone(&config)).unwrap();
        assert_eq!(npc.roster().len(), 6);
        assert_eq!(npc.id().as_str(), "youngster");

        let mut seven = six;
        seven.push(creature("Pidgey", StatBlock::new(40, 45, 40, 56), false));
        assert!(matches!(
            Trainer::npc(TrainerId::new("Youngster"), seven, config),
            Err(GameError::RosterFull { capacity: 6 })
        ));
    }

    #[test]
    fn test_gym_battle() {
        let config = Arc::new(CoreConfig::default());
        let mut leader = Trainer::rock_gym_leader(Arc::clone(&config));
        let names: Vec<&str> = leader.roster().iter().map(Creature::name).collect();
        assert_eq!(names, vec!["Geodude", "Onix"]);

        let mut challenger = Trainer::new(TrainerId::new("ash"), config);
        let pikachu = SpeciesCatalog::starter().get("Pikachu").unwrap().clone();
        challenger.push_creature(Creature::new(&pikachu, StatBlock::default(), false, 20));

        // 皮卡丘先手只能造成1点伤害，小拳石 100 - 40/2 = 80 一击击倒
        let mut rng = ScriptedRandom::new();
        let outcome = BattleEngine::default().resolve(&mut challenger, &mut leader, &mut rng).unwrap();
        assert_eq!(outcome.turns, 1);
        assert_eq!(outcome.winner.trainer.as_str(), "gym_leader_brock");
        assert_eq!(outcome.winner.creature, "Geodude");
        assert_eq!(challenger.record().losses, 1);
        assert_eq!(challenger.currency(), 20);
        assert!(challenger.lead().unwrap().is_fainted());
    }
}
