// 战斗系统模块 - 宝可梦对战核心机制
// 双方出战宝可梦轮流攻击，直到一方倒下或达到回合上限

pub mod damage_calculator;
pub mod engine;
pub mod turn;

pub use damage_calculator::{DamageCalculator, DamageResult};
pub use engine::{Battle, BattleEngine, BattleOutcome, BattlePhase, Combatant, CreditsAwarded};
pub use turn::{Side, TurnEvent};
