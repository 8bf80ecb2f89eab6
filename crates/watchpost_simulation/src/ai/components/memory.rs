//! Spatial memory агента: last known position цели.

use bevy::prelude::*;

use crate::config::EnemyAIConfig;
use crate::navigation::NavigationSampler;

/// Память о цели
///
/// Пишется только sight test'ом (успех) и external alert'ом.
/// `last_known_position` имеет смысл только при `has_ever_perceived`.
/// `pursuing_memory` может быть true только в Chase.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SpatialMemory {
    pub last_known_position: Vec3,
    /// Simulation time последнего подтверждённого контакта (`-inf` до первого)
    pub last_seen: f64,
    /// Монотонный: сбрасывается только пересозданием агента
    pub has_ever_perceived: bool,
    /// Идём к last_known_position, а не к живой цели
    pub pursuing_memory: bool,
}

impl Default for SpatialMemory {
    fn default() -> Self {
        Self {
            last_known_position: Vec3::ZERO,
            last_seen: f64::NEG_INFINITY,
            has_ever_perceived: false,
            pursuing_memory: false,
        }
    }
}

impl SpatialMemory {
    /// Sight test успешен: запоминаем позицию и время
    pub fn record_sighting(&mut self, position: Vec3, now: f64) {
        self.last_known_position = position;
        self.last_seen = now;
        self.has_ever_perceived = true;
    }

    /// External alert: идём проверять позицию как "потеряли из виду"
    ///
    /// last_seen уходит в `-inf`: alert: не визуальный контакт.
    pub fn record_alert(&mut self, position: Vec3) {
        self.last_known_position = position;
        self.last_seen = f64::NEG_INFINITY;
        self.has_ever_perceived = true;
        self.pursuing_memory = true;
    }

    /// Last known position, если цель вообще когда-то была замечена
    pub fn recall(&self) -> Option<Vec3> {
        self.has_ever_perceived.then_some(self.last_known_position)
    }

    /// Секунды с последнего контакта (`+inf` если контакта не было)
    pub fn time_since_seen(&self, now: f64) -> f64 {
        now - self.last_seen
    }
}

/// Пора идти к last known position: цель когда-то была замечена
/// и без контакта уже не меньше forget_duration секунд
pub fn forget_elapsed(has_ever_perceived: bool, time_since_seen: f64, forget_duration: f32) -> bool {
    has_ever_perceived && time_since_seen >= forget_duration as f64
}

/// Snap увиденной позиции на navigation surface
///
/// Малый радиус → большой радиус → raw позиция.
pub fn snap_memory_position(
    navigation: &dyn NavigationSampler,
    position: Vec3,
    config: &EnemyAIConfig,
) -> Vec3 {
    navigation
        .sample_navigable(position, config.memory_snap_radius)
        .or_else(|| navigation.sample_navigable(position, config.memory_fallback_snap_radius))
        .unwrap_or(position)
}

/// Snap позиции alert'а (один радиус → raw позиция)
pub fn snap_alert_position(
    navigation: &dyn NavigationSampler,
    position: Vec3,
    config: &EnemyAIConfig,
) -> Vec3 {
    navigation
        .sample_navigable(position, config.alert_snap_radius)
        .unwrap_or(position)
}
