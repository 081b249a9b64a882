// 回合日志
// 战斗按顺序记录每次行动，传输层据此渲染战报

use serde::{Deserialize, Serialize};

use crate::pokemon::types::TypeEffectiveness;

/// 参战方：First 为发起战斗时传入的第一个训练师
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    Attack {
        turn: u32,
        attacker: Side,
        attacker_name: String,
        defender_name: String,
        damage: u32,
        critical: bool,
        effectiveness: TypeEffectiveness,
        defender_health: u32,
    },
    Knockout {
        turn: u32,
        side: Side,
        creature: String,
    },
    TurnLimitReached {
        turns: u32,
    },
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

impl TurnEvent {
    pub fn turn(&self) -> u32 {
        match self {
            TurnEvent::Attack { turn, .. } | TurnEvent::Knockout { turn, .. } => *turn,
            TurnEvent::TurnLimitReached { turns } => *turns,
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, TurnEvent::Attack { critical: true, .. })
    }
}
