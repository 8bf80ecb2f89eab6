//! FSM AI components (state machine, behavior strategy, маркеры).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EnemyAIConfig;
use crate::navigation::NavAgent;

/// AI FSM состояния sentinel агента
///
/// Timer живёт только в Wait (countdown, всегда ≥ 0).
/// Точка патруля живёт только в Patrol (`None` сразу после спавна: сгенерируется на первом tick).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum AIState {
    /// Patrol: бродим между случайными точками вокруг patrol_origin
    Patrol {
        /// Текущая точка патруля (на navigation surface)
        target_point: Option<Vec3>,
    },

    /// Wait: стоим, ждём countdown, потом заново смотрим
    Wait {
        /// Сколько секунд осталось
        timer: f32,
    },

    /// Chase: преследуем цель (видимую или last known position)
    Chase,
}

impl Default for AIState {
    fn default() -> Self {
        Self::Patrol { target_point: None }
    }
}

impl AIState {
    /// Wait с клампом timer'а (отрицательный/NaN → 0)
    pub fn wait(timer: f32) -> Self {
        Self::Wait {
            timer: if timer.is_finite() { timer.max(0.0) } else { 0.0 },
        }
    }

    pub fn kind(&self) -> AIStateKind {
        match self {
            AIState::Patrol { .. } => AIStateKind::Patrol,
            AIState::Wait { .. } => AIStateKind::Wait,
            AIState::Chase => AIStateKind::Chase,
        }
    }

    /// Countdown (0 вне Wait)
    pub fn timer(&self) -> f32 {
        match self {
            AIState::Wait { timer } => *timer,
            _ => 0.0,
        }
    }

    pub fn patrol_point(&self) -> Option<Vec3> {
        match self {
            AIState::Patrol { target_point } => *target_point,
            _ => None,
        }
    }

    pub fn is_chasing(&self) -> bool {
        matches!(self, AIState::Chase)
    }
}

/// Read-only вид состояния (для тестов/UI/других систем)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum AIStateKind {
    Patrol,
    Wait,
    Chase,
}

/// Behavior strategy агента (выбирается при спавне)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum AIBehavior {
    /// Patrol/Wait/Chase state machine с perception и memory
    #[default]
    Sentinel,
    /// Всегда идёт на цель, без perception
    Relentless,
}

/// Агент (AI-controlled NPC)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform, NavAgent, AIBehavior, EnemyAIConfig)]
pub struct Agent;

/// Цель, которую ищут агенты (игрок)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PerceptionTarget;
