// 训练师注册表 - 进程内共享的训练师集合
// 每个训练师一把互斥锁；对战时按 TrainerId 顺序加锁避免死锁

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::battle::engine::{BattleEngine, BattleOutcome};
use crate::core::config::CoreConfig;
use crate::core::error::{GameError, GameResult};
use crate::player::trainer::{Trainer, TrainerId};
use crate::utils::random::RandomSource;

/// 指向同一训练师的共享句柄
#[derive(Debug, Clone)]
pub struct TrainerHandle {
    id: TrainerId,
    inner: Arc<Mutex<Trainer>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub trainer: TrainerId,
    pub total_level: u64,
    pub total_power: u64,
    pub creatures: usize,
}

// 全服宝可梦排行中的一项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRanking {
    pub trainer: TrainerId,
    pub creature: String,
    pub level: u32,
    pub power: u64,
    pub wins: u32,
}

#[derive(Debug)]
pub struct TrainerRegistry {
    trainers: RwLock<IndexMap<TrainerId, TrainerHandle>>,
    config: Arc<CoreConfig>,
}

impl TrainerHandle {
    fn new(trainer: Trainer) -> Self {
        Self {
            id: trainer.id().clone(),
            inner: Arc::new(Mutex::new(trainer)),
        }
    }

    pub fn id(&self) -> &TrainerId {
        &self.id
    }

    /// 锁中毒时仍返回数据：单个操作失败不会留下半更新的训练师
    pub fn lock(&self) -> MutexGuard<'_, Trainer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn same_as(&self, other: &TrainerHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl TrainerRegistry {
    pub fn new(config: CoreConfig) -> Self {
        Self {
            trainers: RwLock::new(IndexMap::new()),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.trainers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按注册顺序返回所有训练师
    pub fn ids(&self) -> Vec<TrainerId> {
        self.trainers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &TrainerId) -> GameResult<TrainerHandle> {
        self.trainers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| GameError::TrainerNotFound(id.to_string()))
    }

    /// 首次访问时创建；并发调用只会得到同一个训练师
    pub fn get_or_create(&self, id: &TrainerId) -> TrainerHandle {
        if let Some(handle) = self.trainers.read().unwrap_or_else(PoisonError::into_inner).get(id) {
            return handle.clone();
        }

        let mut trainers = self.trainers.write().unwrap_or_else(PoisonError::into_inner);
        trainers
            .entry(id.clone())
            .or_insert_with(|| {
                info!("新训练师注册: {}", id);
                TrainerHandle::new(Trainer::new(id.clone(), Arc::clone(&self.config)))
            })
            .clone()
    }

    pub fn create(&self, id: &TrainerId) -> GameResult<TrainerHandle> {
        let mut trainers = self.trainers.write().unwrap_or_else(PoisonError::into_inner);
        if trainers.contains_key(id) {
            return Err(GameError::TrainerAlreadyExists(id.to_string()));
        }
        let handle = TrainerHandle::new(Trainer::new(id.clone(), Arc::clone(&self.config)));
        trainers.insert(id.clone(), handle.clone());
        info!("新训练师注册: {}", id);
        Ok(handle)
    }

    /// 在训练师锁内执行一次操作，不存在时自动创建
    pub fn with_trainer<R>(&self, id: &TrainerId, f: impl FnOnce(&mut Trainer) -> R) -> R {
        let handle = self.get_or_create(id);
        let mut trainer = handle.lock();
        f(&mut trainer)
    }

    /// 两个训练师对战，first 为发起方
    pub fn battle(
        &self,
        first: &TrainerId,
        second: &TrainerId,
        rng: &mut dyn RandomSource,
    ) -> GameResult<BattleOutcome> {
        if first == second {
            return Err(GameError::CannotBattleSelf);
        }

        let first_handle = self.get_or_create(first);
        let second_handle = self.get_or_create(second);

        // 固定加锁顺序，A 打 B 与 B 打 A 同时发生也不会互相等待
        let (mut first_guard, mut second_guard) = if first < second {
            let a = first_handle.lock();
            let b = second_handle.lock();
            (a, b)
        } else {
            let b = second_handle.lock();
            let a = first_handle.lock();
            (a, b)
        };

        debug!("对战开始: {} vs {}", first, second);
        let engine = BattleEngine::new(&self.config.battle);
        engine.resolve(&mut first_guard, &mut second_guard, rng)
    }

    fn handles(&self) -> Vec<TrainerHandle> {
        self.trainers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// 所有训练师的宝可梦按战力降序，取前 limit 只；同战力按注册与捕获顺序
    pub fn top_creatures(&self, limit: usize) -> Vec<CreatureRanking> {
        let mut rankings: Vec<CreatureRanking> = Vec::new();
        for handle in self.handles() {
            let trainer = handle.lock();
            rankings.extend(trainer.roster().iter().map(|creature| CreatureRanking {
                trainer: trainer.id().clone(),
                creature: creature.name().to_string(),
                level: creature.level(),
                power: creature.power(),
                wins: creature.record().wins,
            }));
        }

        rankings.sort_by(|a, b| b.power.cmp(&a.power));
        rankings.truncate(limit);
        rankings
    }

    /// 按 (总等级, 总战力) 降序排列，相同时保持注册顺序
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .handles()
            .iter()
            .map(|handle| {
                let trainer = handle.lock();
                LeaderboardEntry {
                    trainer: trainer.id().clone(),
                    total_level: trainer.total_level(),
                    total_power: trainer.total_power(),
                    creatures: trainer.roster().len(),
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            (b.total_level, b.total_power).cmp(&(a.total_level, a.total_power))
        });
        entries
    }
}

impl Default for TrainerRegistry {
    fn default() -> Self {
        Self::new(CoreConfig::default())
    }
}
