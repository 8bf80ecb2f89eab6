//! FSM AI systems (per-tick decision).

use bevy::prelude::*;

use crate::ai::components::{AIBehavior, AIState, PerceptionTarget, SpatialMemory};
use crate::ai::controller::{tick_relentless, tick_sentinel, SentinelTick};
use crate::ai::events::AIStateChanged;
use crate::ai::perception::PerceivedTarget;
use crate::config::EnemyAIConfig;
use crate::navigation::{NavAgent, NavigationSurface};
use crate::physics::{SightCollider, SightColliders};
use crate::DeterministicRng;

/// Система: один tick AI для каждого агента
///
/// Snapshot мира на tick:
/// - цель (ровно один PerceptionTarget, иначе "цели нет")
/// - sight colliders (occlusion)
///
/// Sentinel без AIState/SpatialMemory (забыли при спавне): вставляем дефолты через Commands,
/// решение начнётся со следующего tick'а.
pub fn enemy_ai_tick(
    mut agents: Query<(
        Entity,
        &Transform,
        &EnemyAIConfig,
        &AIBehavior,
        &mut NavAgent,
        Option<&mut AIState>,
        Option<&mut SpatialMemory>,
    )>,
    targets: Query<(Entity, &Transform), With<PerceptionTarget>>,
    colliders: Query<(Entity, &Transform, &SightCollider)>,
    navigation: Res<NavigationSurface>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time>,
    mut state_changes: EventWriter<AIStateChanged>,
    mut commands: Commands,
) {
    let target = targets
        .single()
        .ok()
        .map(|(entity, transform)| PerceivedTarget {
            entity,
            position: transform.translation,
        });
    let occlusion = SightColliders::collect(colliders.iter());
    let now = time.elapsed_secs_f64();
    let delta = time.delta_secs();

    for (entity, transform, config, behavior, mut nav, state, memory) in agents.iter_mut() {
        match behavior {
            AIBehavior::Relentless => {
                tick_relentless(target.map(|t| t.position), config, &mut *nav);
            }
            AIBehavior::Sentinel => {
                let (Some(mut state), Some(mut memory)) = (state, memory) else {
                    commands
                        .entity(entity)
                        .insert((AIState::default(), SpatialMemory::default()));
                    continue;
                };

                let report = tick_sentinel(
                    SentinelTick {
                        agent: entity,
                        position: transform.translation,
                        forward: *transform.forward(),
                        target,
                        now,
                        delta,
                        navigation: &*navigation,
                        occlusion: &occlusion,
                        rng: &mut rng.rng,
                    },
                    config,
                    &mut *state,
                    &mut *memory,
                    &mut *nav,
                );

                if report.changed() {
                    state_changes.write(AIStateChanged {
                        entity,
                        from: report.from,
                        to: report.to,
                    });
                }
            }
        }
    }
}
