// 成长引擎 - 经验、升级、努力值、治疗
// 升级阈值每次变为 floor(阈值 × 1.5)，经验在升级时扣减而非清零

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::pokemon::individual::Creature;
use crate::pokemon::stats::{self, StatBlock, StatKind};
use crate::utils::random::RandomSource;

/// 每场胜利单项努力值的增长范围
pub const EV_GAIN_MIN: u32 = 1;
pub const EV_GAIN_MAX: u32 = 3;

// 一次经验结算的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpReport {
    pub xp_gained: u64,
    pub levels_gained: u32,
    pub new_level: u32,
    /// 本次累计的能力增量
    pub stat_growth: StatBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealOutcome {
    pub restored: u32,
    pub ev_reduced: u32,
}

/// floor(threshold × 1.5)
pub fn next_threshold(threshold: u64) -> u64 {
    threshold.saturating_mul(3) / 2
}

/// 获得经验，可能连续升级多次
pub fn gain_xp(creature: &mut Creature, amount: u64) -> LevelUpReport {
    let start_level = creature.level;
    let mut growth = StatBlock::default();

    creature.xp = creature.xp.saturating_add(amount);
    while creature.xp >= creature.xp_to_next {
        creature.xp -= creature.xp_to_next;
        creature.xp_to_next = next_threshold(creature.xp_to_next).max(1);
        creature.level += 1;

        let delta = stats::level_up_growth(&creature.ivs, &creature.evs);
        for kind in StatKind::ALL {
            let value = creature.stats.get_mut(kind);
            *value = value.saturating_add(delta.get(kind));
            let total = growth.get_mut(kind);
            *total = total.saturating_add(delta.get(kind));
        }
        creature.full_restore();

        debug!("{} 升到 {} 级 (增长 {:?})", creature.name, creature.level, delta);
    }

    let levels_gained = creature.level - start_level;
    if levels_gained > 0 {
        info!("{} 升级 {} 次, 当前 {} 级", creature.name, levels_gained, creature.level);
    }

    LevelUpReport {
        xp_gained: amount,
        levels_gained,
        new_level: creature.level,
        stat_growth: growth,
    }
}

/// 胜利后每项努力值独立增加 [1, 3]
pub fn gain_trained_factors(creature: &mut Creature, rng: &mut dyn RandomSource) -> StatBlock {
    let mut gained = StatBlock::default();
    for kind in StatKind::ALL {
        let amount = rng.range_inclusive(EV_GAIN_MIN, EV_GAIN_MAX);
        *gained.get_mut(kind) = amount;
        let ev = creature.evs.get_mut(kind);
        *ev = ev.saturating_add(amount);
    }
    debug!("{} 努力值增加 {:?}", creature.name, gained);
    gained
}

/// 体力回满，代价是扣除攻击努力值（最低为0）
pub fn heal(creature: &mut Creature, ev_penalty: u32) -> HealOutcome {
    let restored = creature.full_restore();
    let ev = creature.evs.get_mut(StatKind::Attack);
    let ev_reduced = (*ev).min(ev_penalty);
    *ev -= ev_reduced;

    HealOutcome { restored, ev_reduced }
}
