// 战斗引擎核心 - 回合制战斗逻辑实现
// 状态机：NotStarted -> InProgress -> Concluded
// 双方各以队伍第一只宝可梦出战；速度严格更高者先手，同速时第一个训练师先手

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::battle::damage_calculator::DamageCalculator;
use crate::battle::turn::{Side, TurnEvent};
use crate::core::config::BattleConfig;
use crate::core::error::{GameError, GameResult};
use crate::player::trainer::{Corner, Trainer, TrainerId};
use crate::pokemon::individual::Creature;
use crate::pokemon::progression::{self, LevelUpReport};
use crate::pokemon::stats::StatBlock;
use crate::utils::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    NotStarted,
    InProgress,
    Concluded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BattleEngine {
    config: BattleConfig,
    damage_calculator: DamageCalculator,
}

// 参战者（训练师 + 出战宝可梦）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub trainer: TrainerId,
    pub creature: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditsAwarded {
    pub winner: u64,
    pub loser: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub turn_log: Vec<TurnEvent>,
    pub turns: u32,
    pub winner_side: Side,
    pub winner: Combatant,
    pub loser: Combatant,
    pub xp_awarded: u64,
    pub level_up: LevelUpReport,
    pub trained_factors_gained: StatBlock,
    pub credits_awarded: CreditsAwarded,
    pub ended_by_turn_limit: bool,
}

/// 一场进行中的战斗，持有双方训练师的可变借用直到结算
#[derive(Debug)]
pub struct Battle<'a> {
    engine: &'a BattleEngine,
    first: Corner<'a>,
    second: Corner<'a>,
    phase: BattlePhase,
    turn: u32,
    log: Vec<TurnEvent>,
    winner: Option<Side>,
}

impl BattleEngine {
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            config: config.clone(),
            damage_calculator: DamageCalculator::new(config),
        }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// 完整结算一场战斗
    pub fn resolve(
        &self,
        first: &mut Trainer,
        second: &mut Trainer,
        rng: &mut dyn RandomSource,
    ) -> GameResult<BattleOutcome> {
        Ok(Battle::new(self, first, second)?.finish(rng))
    }
}

impl Default for BattleEngine {
    fn default() -> Self {
        Self::new(&BattleConfig::default())
    }
}

impl<'a> Battle<'a> {
    pub fn new(engine: &'a BattleEngine, first: &'a mut Trainer, second: &'a mut Trainer) -> GameResult<Self> {
        let first = first.corner().ok_or(GameError::SelfHasNoCreatures)?;
        let second = second.corner().ok_or(GameError::OpponentHasNoCreatures)?;
        for lead in [&*first.lead, &*second.lead] {
            if lead.is_fainted() {
                return Err(GameError::ActiveCreatureFainted(lead.name().to_string()));
            }
        }

        debug!(
            "战斗准备: {}({}) vs {}({})",
            first.id,
            first.lead.name(),
            second.id,
            second.lead.name()
        );

        Ok(Self {
            engine,
            first,
            second,
            phase: BattlePhase::NotStarted,
            turn: 0,
            log: Vec::new(),
            winner: None,
        })
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// 已完成的回合数
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn log(&self) -> &[TurnEvent] {
        &self.log
    }

    fn attacker_and_defender(&mut self, attacker: Side) -> (&mut Creature, &mut Creature) {
        let (first, second) = (&mut *self.first.lead, &mut *self.second.lead);
        match attacker {
            Side::First => (first, second),
            Side::Second => (second, first),
        }
    }

    /// 行动顺序：速度严格更高者先手，否则第一个训练师先手
    fn turn_order(&self) -> [Side; 2] {
        if self.second.lead.speed() > self.first.lead.speed() {
            [Side::Second, Side::First]
        } else {
            [Side::First, Side::Second]
        }
    }

    /// 进行一个回合，返回之后的阶段
    pub fn play_turn(&mut self, rng: &mut dyn RandomSource) -> BattlePhase {
        match self.phase {
            BattlePhase::Concluded => return BattlePhase::Concluded,
            BattlePhase::NotStarted => self.phase = BattlePhase::InProgress,
            BattlePhase::InProgress => {}
        }

        let engine = self.engine;
        let turn = self.turn + 1;
        for attacker_side in self.turn_order() {
            let (attacker, defender) = self.attacker_and_defender(attacker_side);

            let result = engine.damage_calculator.calculate(attacker, defender, rng);
            let remaining = defender.take_damage(result.final_damage);
            let attacker_name = attacker.name().to_string();
            let defender_name = defender.name().to_string();

            debug!(
                "回合 {}: {} -> {} 伤害 {} (暴击: {}) 剩余 {}",
                turn, attacker_name, defender_name, result.final_damage, result.is_critical, remaining
            );

            self.log.push(TurnEvent::Attack {
                turn,
                attacker: attacker_side,
                attacker_name,
                defender_name: defender_name.clone(),
                damage: result.final_damage,
                critical: result.is_critical,
                effectiveness: result.effectiveness,
                defender_health: remaining,
            });

            if remaining == 0 {
                self.log.push(TurnEvent::Knockout {
                    turn,
                    side: attacker_side.opponent(),
                    creature: defender_name,
                });
                self.turn = turn;
                self.winner = Some(attacker_side);
                self.phase = BattlePhase::Concluded;
                return self.phase;
            }
        }

        self.turn = turn;
        if self.turn >= engine.config.max_turns {
            // 双方都未倒下时固定判第一个训练师获胜
            self.log.push(TurnEvent::TurnLimitReached { turns: self.turn });
            self.winner = Some(Side::First);
            self.phase = BattlePhase::Concluded;
        }
        self.phase
    }

    /// 打完剩余回合并发放奖励
    pub fn finish(mut self, rng: &mut dyn RandomSource) -> BattleOutcome {
        while self.play_turn(rng) != BattlePhase::Concluded {}

        let winner_side = self.winner.unwrap_or(Side::First);
        let ended_by_turn_limit = matches!(self.log.last(), Some(TurnEvent::TurnLimitReached { .. }));
        let engine = self.engine;
        let config = &engine.config;
        let turns = self.turn;
        let turn_log = std::mem::take(&mut self.log);

        let (winner, loser) = match winner_side {
            Side::First => (&mut self.first, &mut self.second),
            Side::Second => (&mut self.second, &mut self.first),
        };

        loser.lead.record_loss();
        loser.record_loss(config.loss_reward);
        let loser_level = loser.lead.level();

        let xp_awarded = config.xp_base + u64::from(loser_level) * config.xp_per_loser_level;
        let level_up = progression::gain_xp(&mut *winner.lead, xp_awarded);
        let trained_factors_gained = progression::gain_trained_factors(&mut *winner.lead, rng);
        winner.lead.record_win();
        winner.record_win(config.win_reward);

        let winner = Combatant {
            trainer: winner.id.clone(),
            creature: winner.lead.name().to_string(),
        };
        let loser = Combatant {
            trainer: loser.id.clone(),
            creature: loser.lead.name().to_string(),
        };

        info!(
            "战斗结束: {} 的 {} 击败了 {} 的 {} ({} 回合)",
            winner.trainer, winner.creature, loser.trainer, loser.creature, turns
        );

        BattleOutcome {
            turn_log,
            turns,
            winner_side,
            winner,
            loser,
            xp_awarded,
            level_up,
            trained_factors_gained,
            credits_awarded: CreditsAwarded {
                winner: config.win_reward,
                loser: config.loss_reward,
            },
            ended_by_turn_limit,
        }
    }
}
