// 宝可梦模块
// 能力值公式、个体、成长与进化、属性、图鉴

pub mod evolution;
pub mod individual;
pub mod progression;
pub mod species;
pub mod stats;
pub mod types;

pub use evolution::{evolve, EvolutionOutcome};
pub use individual::{BattleRecord, Creature, EvolutionStage};
pub use progression::{gain_trained_factors, gain_xp, heal, HealOutcome, LevelUpReport};
pub use species::{SpeciesCatalog, SpeciesEntry};
pub use stats::{StatBlock, StatKind};
pub use types::{ElementType, TypeEffectiveness};
