//! Pursuit planner (Chase state)
//!
//! Решает куда двигаться в Chase на этот tick:
//! - живая цель видна → идём на неё (приоритет над памятью, даже посреди memory pursuit)
//! - цель потеряна и forget_duration прошёл → идём к last known position
//! - дошли до LKP → сигнал controller'у (→ Wait)
//! - иначе (ещё не забыли) → ничего не делаем этот tick
//!
//! Planner ничего не мутирует: возвращает решение, controller применяет.

use bevy::prelude::*;

use crate::ai::components::forget_elapsed;

/// Снимок входов planner'а на один tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuitInput {
    pub seen_now: bool,
    /// Позиция живой цели (если цель существует)
    pub target_position: Option<Vec3>,
    pub pursuing_memory: bool,
    pub has_ever_perceived: bool,
    /// now - last_seen (`+inf` если видели только через alert)
    pub time_since_seen: f64,
    pub forget_duration: f32,
    pub last_known_position: Vec3,
    pub distance_to_memory: f32,
    pub stopping_distance: f32,
    pub path_pending: bool,
    pub remaining_distance: f32,
    /// Запас сверх stopping_distance для старта memory pursuit
    pub trigger_margin: f32,
    /// Запас сверх stopping_distance для "дошли"
    pub arrival_margin: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PursuitDecision {
    /// Видим цель → destination = живая позиция, memory pursuit сбрасывается
    PursueTarget(Vec3),
    /// Забыли → начинаем идти к LKP
    BeginMemoryPursuit(Vec3),
    /// Продолжаем идти к LKP
    ContinueMemoryPursuit(Vec3),
    /// Дошли до LKP (или уже стоим на ней) → Wait
    MemoryReached,
    /// Ждём пока истечёт forget_duration
    Hold,
}

pub fn plan_pursuit(input: &PursuitInput) -> PursuitDecision {
    if input.seen_now {
        if let Some(target) = input.target_position {
            return PursuitDecision::PursueTarget(target);
        }
    }

    if !input.pursuing_memory {
        if !forget_elapsed(
            input.has_ever_perceived,
            input.time_since_seen,
            input.forget_duration,
        ) {
            return PursuitDecision::Hold;
        }

        // Уже стоим на LKP: идти некуда, сразу отдаём Wait (иначе застрянем в Chase навсегда)
        if input.distance_to_memory > input.stopping_distance + input.trigger_margin {
            return PursuitDecision::BeginMemoryPursuit(input.last_known_position);
        }
        return PursuitDecision::MemoryReached;
    }

    let arrived = !input.path_pending
        && input.remaining_distance <= input.stopping_distance + input.arrival_margin;
    if arrived {
        PursuitDecision::MemoryReached
    } else {
        PursuitDecision::ContinueMemoryPursuit(input.last_known_position)
    }
}
