//! Spawn helpers: агенты (sentinel / relentless), цель, стены.
//!
//! Behavior strategy выбирается здесь, при спавне, и дальше не меняется.

use bevy::prelude::*;

use crate::ai::components::{AIBehavior, AIState, Agent, PerceptionTarget, SpatialMemory};
use crate::combat::ContactDamage;
use crate::config::EnemyAIConfig;
use crate::navigation::NavAgent;
use crate::physics::SightCollider;

/// Sentinel: Patrol / Wait / Chase, perception + memory
///
/// Stopping distance поднимается до `min_stopping_distance` (иначе memory pursuit
/// никогда не "доходит": агент упирается в цель).
pub fn spawn_sentinel(commands: &mut Commands, position: Vec3, config: EnemyAIConfig) -> Entity {
    let config = config.sanitized();
    let nav = NavAgent::default()
        .with_speed(config.move_speed)
        .with_stopping_distance(config.min_stopping_distance);

    commands
        .spawn((
            Transform::from_translation(position),
            Agent,
            AIBehavior::Sentinel,
            AIState::default(),
            SpatialMemory::default(),
            nav,
            config,
            SightCollider::actor_body(),
            ContactDamage::default(),
        ))
        .id()
}

/// Relentless: всегда идёт на цель (без perception)
pub fn spawn_relentless(commands: &mut Commands, position: Vec3, config: EnemyAIConfig) -> Entity {
    let config = config.sanitized();
    let nav = NavAgent::default().with_speed(config.chase_speed);

    commands
        .spawn((
            Transform::from_translation(position),
            Agent,
            AIBehavior::Relentless,
            nav,
            config,
            SightCollider::actor_body(),
            ContactDamage::default(),
        ))
        .id()
}

/// Цель (игрок): PerceptionTarget + тело для ray cast'ов
pub fn spawn_target(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            PerceptionTarget,
            SightCollider::target_body(),
        ))
        .id()
}

/// Стена (environment layer: блокирует зрение)
pub fn spawn_wall(commands: &mut Commands, center: Vec3, half_extents: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(center),
            SightCollider::wall(half_extents),
        ))
        .id()
}
