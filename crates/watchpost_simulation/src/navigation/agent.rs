//! Movement controller агента (headless NavAgent)
//!
//! Архитектура:
//! - AI пишет intent (`set_destination` / `set_speed`), fire-and-forget
//! - advance_nav_agents резолвит pending path и двигает Transform по прямой
//! - AI поллит `is_path_pending` / `remaining_distance`, ничего не ждёт

use bevy::prelude::*;

/// Интерфейс движения, который видит AI controller
pub trait MovementController {
    fn set_destination(&mut self, point: Vec3);
    fn set_speed(&mut self, speed: f32);
    fn is_path_pending(&self) -> bool;
    fn remaining_distance(&self) -> f32;
    fn stopping_distance(&self) -> f32;
}

/// Навигационный агент
///
/// Логика pending:
/// - новая destination → `path_pending = true`
/// - та же destination повторно → ничего не сбрасываем (иначе AI, ставящий цель каждый tick, никогда не "дойдёт")
/// - advance_nav_agents снимает pending на своём шаге
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    /// Скорость (м/с)
    pub speed: f32,
    /// Агент останавливается на этом расстоянии от destination
    pub stopping_distance: f32,
    pub path_pending: bool,
    /// Дистанция до destination после последнего шага движения
    pub remaining_distance: f32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            destination: None,
            speed: 2.0,
            stopping_distance: 0.0,
            path_pending: false,
            remaining_distance: 0.0,
        }
    }
}

impl NavAgent {
    pub fn with_stopping_distance(mut self, stopping_distance: f32) -> Self {
        self.stopping_distance = stopping_distance.max(0.0);
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed.max(0.0);
        self
    }
}

impl MovementController for NavAgent {
    fn set_destination(&mut self, point: Vec3) {
        if self.destination != Some(point) {
            self.destination = Some(point);
            self.path_pending = true;
        }
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn is_path_pending(&self) -> bool {
        self.path_pending
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining_distance
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }
}

/// Один шаг движения агента
///
/// Двигаемся по прямой к destination, не ближе stopping_distance,
/// разворачиваемся по горизонтальному направлению движения.
pub fn step_nav_agent(transform: &mut Transform, agent: &mut NavAgent, delta: f32) {
    let Some(destination) = agent.destination else {
        agent.path_pending = false;
        agent.remaining_distance = 0.0;
        return;
    };

    agent.path_pending = false;

    let to_destination = destination - transform.translation;
    let distance = to_destination.length();

    if distance > agent.stopping_distance && distance > f32::EPSILON {
        let direction = to_destination / distance;
        let step = (agent.speed * delta).min(distance - agent.stopping_distance);
        transform.translation += direction * step;

        let facing = Vec3::new(direction.x, 0.0, direction.z);
        if facing.length_squared() > 1e-6 {
            transform.look_to(facing, Vec3::Y);
        }
    }

    agent.remaining_distance = transform.translation.distance(destination);
}

/// Система: движение NavAgent'ов (FixedUpdate, после AI decisions)
pub fn advance_nav_agents(mut agents: Query<(&mut Transform, &mut NavAgent)>, time: Res<Time>) {
    let delta = time.delta_secs();

    for (mut transform, mut agent) in agents.iter_mut() {
        step_nav_agent(&mut transform, &mut agent, delta);
    }
}
