//! AI decision-making module
//!
//! Sentinel FSM (Patrol / Wait / Chase) + relentless strategy.
//! Leaves first: perception → memory → patrol → pursuit → controller.
//! ECS системы (systems/) только собирают snapshot мира и вызывают controller.

use bevy::prelude::*;

pub mod components;
pub mod controller;
pub mod events;
pub mod patrol;
pub mod perception;
pub mod pursuit;
pub mod spawn;
pub mod systems;


// Re-export основных типов
pub use components::{
    AIBehavior, AIState, AIStateKind, Agent, PerceptionTarget, SpatialMemory,
};
pub use controller::{on_external_alert, tick_relentless, tick_sentinel, SentinelReport, SentinelTick};
pub use events::{AIStateChanged, AgentDestroyed, GunfireAlert};
pub use patrol::generate_patrol_point;
pub use perception::{can_perceive, perceive, PerceivedTarget};
pub use pursuit::{plan_pursuit, PursuitDecision, PursuitInput};
pub use spawn::{spawn_relentless, spawn_sentinel, spawn_target, spawn_wall};

use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения (Decide):
/// 1. broadcast_gunfire_alerts: alert bus → on_external_alert
/// 2. enemy_ai_tick: sight test + per-state behavior
///
/// React: despawn_destroyed_agents
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GunfireAlert>()
            .add_event::<AgentDestroyed>()
            .add_event::<AIStateChanged>()
            .register_type::<AIState>()
            .register_type::<AIBehavior>()
            .register_type::<SpatialMemory>();

        app.add_systems(
            FixedUpdate,
            (
                systems::broadcast_gunfire_alerts,
                systems::enemy_ai_tick,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Decide),
        );

        app.add_systems(
            FixedUpdate,
            systems::despawn_destroyed_agents.in_set(SimulationSet::React),
        );
    }
}
