//! AI reaction systems (gunfire alert bus, agent destruction).

use bevy::prelude::*;

use crate::ai::components::{AIBehavior, AIState, SpatialMemory};
use crate::ai::controller::on_external_alert;
use crate::ai::events::{AIStateChanged, AgentDestroyed, GunfireAlert};
use crate::config::EnemyAIConfig;
use crate::navigation::{NavAgent, NavigationSurface};

/// System: AI реакция на звук выстрела
///
/// Broadcaster: каждый GunfireAlert доставляется всем sentinel агентам.
/// - Skip: relentless агенты (всегда идут на цель и так)
/// - Skip: агенты уже в Chase (no-op внутри on_external_alert)
/// - Остальные: LKP = snap(позиции выстрела), Chase, memory pursuit
///
/// Идёт ДО enemy_ai_tick: Chase виден decision'у в том же tick'е.
pub fn broadcast_gunfire_alerts(
    mut gunfire_events: EventReader<GunfireAlert>,
    mut agents: Query<(
        Entity,
        &EnemyAIConfig,
        &AIBehavior,
        &mut AIState,
        &mut SpatialMemory,
        &mut NavAgent,
    )>,
    navigation: Res<NavigationSurface>,
    mut state_changes: EventWriter<AIStateChanged>,
) {
    for alert in gunfire_events.read() {
        for (entity, config, behavior, mut state, mut memory, mut nav) in agents.iter_mut() {
            if *behavior != AIBehavior::Sentinel {
                continue;
            }

            let from = state.kind();
            let accepted = on_external_alert(
                entity,
                alert.position,
                config,
                &mut *state,
                &mut *memory,
                &mut *nav,
                &*navigation,
            );

            if accepted {
                crate::logger::log(&format!(
                    "🔊 {:?} heard gunfire at {:?} → investigating {:?}",
                    entity, alert.position, memory.last_known_position
                ));
                state_changes.write(AIStateChanged {
                    entity,
                    from,
                    to: state.kind(),
                });
            }
        }
    }
}

/// System: уничтоженные агенты (сигнал от health collaborator) → despawn
pub fn despawn_destroyed_agents(
    mut destroyed_events: EventReader<AgentDestroyed>,
    mut commands: Commands,
) {
    for event in destroyed_events.read() {
        let Ok(mut entity_commands) = commands.get_entity(event.entity) else {
            // Уже despawned (двойной сигнал): не ошибка
            continue;
        };

        entity_commands.despawn();
        crate::logger::log_info(&format!("AI: {:?} destroyed → despawned", event.entity));
    }
}
