// Pokemon属性系统
// 只建模三组克制关系：水克火、火克草、草克水，其余组合均为普通效果

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::GameError;

// Pokemon属性类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Normal,     // 一般
    Fire,       // 火
    Water,      // 水
    Grass,      // 草
    Electric,   // 电
    Ice,        // 冰
    Dragon,     // 龙
    Rock,       // 岩石
    Psychic,    // 超能力
    Ghost,      // 幽灵
}

// 属性效果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeEffectiveness {
    Normal,
    SuperEffective,
}

impl ElementType {
    pub const ALL: [ElementType; 10] = [
        ElementType::Normal,
        ElementType::Fire,
        ElementType::Water,
        ElementType::Grass,
        ElementType::Electric,
        ElementType::Ice,
        ElementType::Dragon,
        ElementType::Rock,
        ElementType::Psychic,
        ElementType::Ghost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Normal => "normal",
            ElementType::Fire => "fire",
            ElementType::Water => "water",
            ElementType::Grass => "grass",
            ElementType::Electric => "electric",
            ElementType::Ice => "ice",
            ElementType::Dragon => "dragon",
            ElementType::Rock => "rock",
            ElementType::Psychic => "psychic",
            ElementType::Ghost => "ghost",
        }
    }

    /// 本属性攻击 defender 时的效果
    pub fn effectiveness_against(self, defender: ElementType) -> TypeEffectiveness {
        use ElementType::*;
        match (self, defender) {
            (Water, Fire) | (Fire, Grass) | (Grass, Water) => TypeEffectiveness::SuperEffective,
            _ => TypeEffectiveness::Normal,
        }
    }
}

impl TypeEffectiveness {
    pub fn multiplier(self, super_effective_bonus: f64) -> f64 {
        match self {
            TypeEffectiveness::Normal => 1.0,
            TypeEffectiveness::SuperEffective => super_effective_bonus,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        ElementType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| GameError::Config(format!("未知属性: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_effective_pairs() {
        assert_eq!(
            ElementType::Water.effectiveness_against(ElementType::Fire),
            TypeEffectiveness::SuperEffective
        );
        assert_eq!(
            ElementType::Fire.effectiveness_against(ElementType::Grass),
            TypeEffectiveness::SuperEffective
        );
        assert_eq!(
            ElementType::Grass.effectiveness_against(ElementType::Water),
            TypeEffectiveness::SuperEffective
        );
    }

    #[test]
    fn test_everything_else_is_neutral() {
        let mut super_effective = 0;
        for attacker in ElementType::ALL {
            for defender in ElementType::ALL {
                if attacker.effectiveness_against(defender) == TypeEffectiveness::SuperEffective {
                    super_effective += 1;
                }
            }
        }
        assert_eq!(super_effective, 3);
        // 反方向不减伤
        assert_eq!(
            ElementType::Fire.effectiveness_against(ElementType::Water),
            TypeEffectiveness::Normal
        );
    }

    #[test]
    fn test_parse_type() {
        assert_eq!("Fire".parse::<ElementType>().unwrap(), ElementType::Fire);
        assert_eq!(" ghost ".parse::<ElementType>().unwrap(), ElementType::Ghost);
        assert!("steel".parse::<ElementType>().is_err());
    }

    #[test]
    fn test_multiplier() {
        assert_eq!(TypeEffectiveness::Normal.multiplier(2.0), 1.0);
        assert_eq!(TypeEffectiveness::SuperEffective.multiplier(2.0), 2.0);
    }
}
