// 玩家系统
// 训练师、背包经济、进程内训练师注册表

pub mod inventory;
pub mod registry;
pub mod trainer;

pub use inventory::{DailyReward, Inventory, ItemEffect, ItemKind, ItemOutcome};
pub use registry::{CreatureRanking, LeaderboardEntry, TrainerHandle, TrainerRegistry};
pub use trainer::{CreatureHealed, ReleaseOutcome, RosterOrder, Trainer, TrainerId, MAX_ROSTER_SIZE};
