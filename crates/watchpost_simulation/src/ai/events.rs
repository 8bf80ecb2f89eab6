//! AI Events: alert bus, lifecycle, state observability

use bevy::prelude::*;

use crate::ai::components::AIStateKind;

/// Выстрел ("shot fired"): слышат все sentinel агенты
///
/// broadcast_gunfire_alerts вызывает `on_external_alert` для каждого агента.
/// Агенты в Chase игнорируют (уже реагируют).
#[derive(Event, Debug, Clone, Copy)]
pub struct GunfireAlert {
    /// Откуда стреляли (снапается на navigation surface)
    pub position: Vec3,
}

/// Агент уничтожен (сигнал от внешнего health collaborator)
#[derive(Event, Debug, Clone, Copy)]
pub struct AgentDestroyed {
    pub entity: Entity,
}

/// FSM перешёл в другое состояние (только реальные смены)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AIStateChanged {
    pub entity: Entity,
    pub from: AIStateKind,
    pub to: AIStateKind,
}
