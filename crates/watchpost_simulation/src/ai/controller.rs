//! Sentinel controller: Patrol / Wait / Chase tick driver
//!
//! Порядок на каждом tick:
//! 1. Sight test (если цель есть). Успех → Chase (или остаёмся в Chase)
//! 2. Per-state behavior по (возможно только что обновлённому) состоянию
//!
//! External alert (`on_external_alert`) идёт мимо perception: сразу Chase к snap(позиции).
//!
//! Controller не знает про ECS: работает через collaborator traits,
//! ECS system (`enemy_ai_tick`) только собирает snapshot и вызывает tick.

use bevy::prelude::*;
use rand::RngCore;

use crate::ai::components::{snap_alert_position, AIState, AIStateKind, SpatialMemory};
use crate::ai::patrol::generate_patrol_point;
use crate::ai::perception::{perceive, PerceivedTarget};
use crate::ai::pursuit::{plan_pursuit, PursuitDecision, PursuitInput};
use crate::config::EnemyAIConfig;
use crate::navigation::{MovementController, NavigationSampler};
use crate::physics::OcclusionQuery;

/// Входы одного tick'а sentinel агента
pub struct SentinelTick<'a> {
    pub agent: Entity,
    pub position: Vec3,
    pub forward: Vec3,
    /// Snapshot цели на этот tick (None: цели нет / уничтожена)
    pub target: Option<PerceivedTarget>,
    /// Simulation time (секунды)
    pub now: f64,
    pub delta: f32,
    pub navigation: &'a dyn NavigationSampler,
    pub occlusion: &'a dyn OcclusionQuery,
    pub rng: &'a mut dyn RngCore,
}

/// Что произошло за tick (для events/тестов)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentinelReport {
    pub seen: bool,
    pub from: AIStateKind,
    pub to: AIStateKind,
}

impl SentinelReport {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

pub fn tick_sentinel<M: MovementController>(
    tick: SentinelTick<'_>,
    config: &EnemyAIConfig,
    state: &mut AIState,
    memory: &mut SpatialMemory,
    mover: &mut M,
) -> SentinelReport {
    let SentinelTick {
        agent,
        position,
        forward,
        target,
        now,
        delta,
        navigation,
        occlusion,
        rng,
    } = tick;

    let from = state.kind();

    let seen = perceive(
        agent,
        position,
        forward,
        target.as_ref(),
        config,
        occlusion,
        navigation,
        memory,
        now,
    );

    if seen && !state.is_chasing() {
        transition(agent, state, AIState::Chase, "target spotted");
    }

    match *state {
        AIState::Patrol { target_point } => {
            patrol(agent, position, target_point, config, state, mover, navigation, rng);
        }
        AIState::Wait { timer } => {
            let remaining = (timer - delta).max(0.0);
            if remaining > 0.0 {
                *state = AIState::wait(remaining);
            } else {
                // seen == true сюда не доходит: sight test уже перевёл в Chase
                enter_patrol(agent, config, state, mover, navigation, rng);
            }
        }
        AIState::Chase => {
            chase(agent, position, seen, target, now, config, state, memory, mover);
        }
    }

    SentinelReport {
        seen,
        from,
        to: state.kind(),
    }
}

#[allow(clippy::too_many_arguments)]
fn patrol<M: MovementController>(
    agent: Entity,
    position: Vec3,
    target_point: Option<Vec3>,
    config: &EnemyAIConfig,
    state: &mut AIState,
    mover: &mut M,
    navigation: &dyn NavigationSampler,
    rng: &mut dyn RngCore,
) {
    // Только заспавнились: точки ещё нет
    let Some(point) = target_point else {
        enter_patrol(agent, config, state, mover, navigation, rng);
        return;
    };

    if position.distance(point) < config.patrol_arrival_distance {
        transition(agent, state, AIState::wait(config.wait_time), "patrol point reached");
        return;
    }

    mover.set_speed(config.move_speed);
    mover.set_destination(point);

    // Path посчитан, осталось мало, но до точки не дошли: застряли
    if !mover.is_path_pending() && mover.remaining_distance() < config.stall_distance {
        crate::logger::log_warning(&format!(
            "AI: {:?} stalled {:.2}m from patrol point {:?}",
            agent,
            position.distance(point),
            point
        ));
        transition(agent, state, AIState::wait(config.retry_time), "movement stalled");
    }
}

/// Вход в Patrol: новая точка или Wait(retry) если surface не дал ни одной
fn enter_patrol<M: MovementController>(
    agent: Entity,
    config: &EnemyAIConfig,
    state: &mut AIState,
    mover: &mut M,
    navigation: &dyn NavigationSampler,
    rng: &mut dyn RngCore,
) {
    let Some(point) = generate_patrol_point(
        config.patrol_origin,
        config.patrol_radius,
        config.patrol_snap_radius,
        navigation,
        rng,
    ) else {
        crate::logger::log_warning(&format!(
            "AI: {:?} no navigable patrol point around {:?}, retry in {}s",
            agent, config.patrol_origin, config.retry_time
        ));
        transition(agent, state, AIState::wait(config.retry_time), "patrol point unavailable");
        return;
    };

    mover.set_speed(config.move_speed);
    mover.set_destination(point);
    transition(
        agent,
        state,
        AIState::Patrol {
            target_point: Some(point),
        },
        "new patrol point",
    );
}

#[allow(clippy::too_many_arguments)]
fn chase<M: MovementController>(
    agent: Entity,
    position: Vec3,
    seen: bool,
    target: Option<PerceivedTarget>,
    now: f64,
    config: &EnemyAIConfig,
    state: &mut AIState,
    memory: &mut SpatialMemory,
    mover: &mut M,
) {
    let input = PursuitInput {
        seen_now: seen,
        target_position: target.map(|t| t.position),
        pursuing_memory: memory.pursuing_memory,
        has_ever_perceived: memory.has_ever_perceived,
        time_since_seen: memory.time_since_seen(now),
        forget_duration: config.forget_duration,
        last_known_position: memory.last_known_position,
        distance_to_memory: position.distance(memory.last_known_position),
        stopping_distance: mover.stopping_distance(),
        path_pending: mover.is_path_pending(),
        remaining_distance: mover.remaining_distance(),
        trigger_margin: config.memory_trigger_margin,
        arrival_margin: config.memory_arrival_margin,
    };

    match plan_pursuit(&input) {
        PursuitDecision::PursueTarget(target_position) => {
            memory.pursuing_memory = false;
            mover.set_speed(config.chase_speed);
            mover.set_destination(target_position);
        }
        PursuitDecision::BeginMemoryPursuit(last_known) => {
            memory.pursuing_memory = true;
            mover.set_speed(config.chase_speed);
            mover.set_destination(last_known);
            crate::logger::log(&format!(
                "AI: {:?} lost target, checking last known position {:?}",
                agent, last_known
            ));
        }
        PursuitDecision::ContinueMemoryPursuit(last_known) => {
            mover.set_speed(config.chase_speed);
            mover.set_destination(last_known);
        }
        PursuitDecision::MemoryReached => {
            memory.pursuing_memory = false;
            transition(
                agent,
                state,
                AIState::wait(config.settle_delay),
                "last known position reached",
            );
        }
        PursuitDecision::Hold => {}
    }
}

/// External stimulus ("услышал выстрел")
///
/// В Chase: no-op (уже реагируем). Иначе: LKP = snap(source), memory pursuit, Chase,
/// destination ставится сразу. Возвращает true если alert принят.
pub fn on_external_alert<M: MovementController>(
    agent: Entity,
    source: Vec3,
    config: &EnemyAIConfig,
    state: &mut AIState,
    memory: &mut SpatialMemory,
    mover: &mut M,
    navigation: &dyn NavigationSampler,
) -> bool {
    if state.is_chasing() {
        return false;
    }

    let investigate = snap_alert_position(navigation, source, config);
    memory.record_alert(investigate);

    mover.set_speed(config.chase_speed);
    mover.set_destination(investigate);

    transition(agent, state, AIState::Chase, "gunfire alert");
    true
}

/// Relentless strategy: всегда идём на цель, perception нет
pub fn tick_relentless<M: MovementController>(
    target_position: Option<Vec3>,
    config: &EnemyAIConfig,
    mover: &mut M,
) {
    let Some(target_position) = target_position else {
        return;
    };

    mover.set_speed(config.chase_speed);
    mover.set_destination(target_position);
}

fn transition(agent: Entity, state: &mut AIState, next: AIState, reason: &str) {
    let from = state.kind();
    *state = next;

    if from != next.kind() {
        crate::logger::log(&format!(
            "AI: {:?} {:?} → {:?} ({})",
            agent,
            from,
            next.kind(),
            reason
        ));
    }
}
