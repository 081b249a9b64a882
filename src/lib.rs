// 宝可梦聊天机器人游戏核心库
// 捕获、成长、背包经济、回合制对战；传输层（聊天平台）不在本库内
// 所有随机性通过 RandomSource 注入，给定种子结果可复现

// 核心模块
pub mod core;
pub mod utils;

// 游戏系统
pub mod pokemon;
pub mod player;
pub mod battle;

// 重新导出核心类型
pub use crate::core::{CoreConfig, GameError, GameResult};
pub use crate::utils::{RandomGenerator, RandomSource};
pub use crate::pokemon::{Creature, SpeciesCatalog};
pub use crate::player::{ItemKind, Trainer, TrainerId, TrainerRegistry};
pub use crate::battle::{BattleEngine, BattleOutcome};

// 版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "pokebot";

// 游戏常量
pub mod constants {
    pub use crate::player::trainer::MAX_ROSTER_SIZE;
    pub use crate::pokemon::stats::MAX_IV;

    pub const STARTING_LEVEL: u32 = 1;
    pub const STARTING_XP_TO_NEXT: u64 = 20;
}

/// 初始化日志系统，未设置 RUST_LOG 时默认 pokebot=info；重复调用无副作用
pub fn init() {
    let env = env_logger::Env::default().default_filter_or("pokebot=info");
    if env_logger::Builder::from_env(env).try_init().is_ok() {
        log::info!("宝可梦机器人核心初始化完成 v{}", VERSION);
    }
}
