// 核心模块 - 错误类型与配置
// 其余子系统都依赖这里的 GameError / CoreConfig

pub mod config;
pub mod error;

// 重新导出核心类型
pub use config::{BattleConfig, CoreConfig, EconomyConfig, ItemPrices, ProgressionConfig, StatBonus};
pub use error::{GameError, GameResult};
