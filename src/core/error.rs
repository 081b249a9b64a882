// 错误处理系统
// 所有预期内的失败都以值的形式返回给调用方，由传输层负责转换为用户文本

use chrono::NaiveDate;
use thiserror::Error;

use crate::player::inventory::ItemKind;

// 游戏主要错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    // 队伍相关
    #[error("队伍已满 (上限 {capacity})")]
    RosterFull { capacity: usize },

    #[error("宝可梦未找到: {0}")]
    CreatureNotFound(String),

    #[error("名字无效: {0:?}")]
    InvalidName(String),

    // 物品相关
    #[error("没有该物品: {0}")]
    ItemNotOwned(ItemKind),

    #[error("物品无法对宝可梦使用: {0}")]
    ItemNotUsable(ItemKind),

    #[error("余额不足: 需要 {required}, 当前 {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("今日奖励已领取 ({0})")]
    AlreadyClaimed(NaiveDate),

    // 进化相关
    #[error("{0} 无法进化")]
    EvolutionNotEligible(String),

    // 战斗相关
    #[error("对手没有宝可梦")]
    OpponentHasNoCreatures,

    #[error("你没有宝可梦")]
    SelfHasNoCreatures,

    #[error("{0} 已失去战斗能力")]
    ActiveCreatureFainted(String),

    #[error("不能和自己对战")]
    CannotBattleSelf,

    // 训练师登记
    #[error("训练师已存在: {0}")]
    TrainerAlreadyExists(String),

    #[error("训练师未找到: {0}")]
    TrainerNotFound(String),

    // 配置与数据
    #[error("宝可梦图鉴为空")]
    EmptySpeciesCatalog,

    #[error("配置错误: {0}")]
    Config(String),
}

// Result类型别名
pub type GameResult<T> = std::result::Result<T, GameError>;

impl GameError {
    /// 是否为玩家操作被拒绝（可直接提示用户），而非配置或数据问题
    pub fn is_user_error(&self) -> bool {
        !matches!(self, GameError::EmptySpeciesCatalog | GameError::Config(_))
    }
}

// 错误转换实现
impl From<toml::de::Error> for GameError {
    fn from(error: toml::de::Error) -> Self {
        GameError::Config(error.to_string())
    }
}

impl From<serde_json::Error> for GameError {
    fn from(error: serde_json::Error) -> Self {
        GameError::Config(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = GameError::CreatureNotFound("pikachu".to_string());
        assert_eq!(error.to_string(), "宝可梦未找到: pikachu");

        let error = GameError::InsufficientFunds { required: 500, available: 400 };
        assert_eq!(error.to_string(), "余额不足: 需要 500, 当前 400");
    }

    #[test]
    fn test_error_classification() {
        assert!(GameError::RosterFull { capacity: 6 }.is_user_error());
        assert!(GameError::ItemNotOwned(ItemKind::HealSmall).is_user_error());
        assert!(!GameError::Config("bad".to_string()).is_user_error());
        assert!(!GameError::EmptySpeciesCatalog.is_user_error());
    }

    #[test]
    fn test_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let game_error: GameError = toml_error.into();
        match game_error {
            GameError::Config(_) => {}
            other => panic!("Expected Config, got {other:?}"),
        }
    }
}
