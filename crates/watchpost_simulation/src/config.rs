//! Конфигурация: tunables врага + параметры симуляции
//!
//! EnemyAIConfig: per-agent компонент (immutable после спавна).
//! Грузится из RON, отсутствующие поля берутся из Default (`#[serde(default)]`).

use std::{fmt, fs, path::Path};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::physics::COLLISION_LAYER_ENVIRONMENT;

/// Tunables одного врага (perception, patrol, movement, timers, memory)
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct EnemyAIConfig {
    /// Дальность зрения (метры)
    pub sight_range: f32,
    /// Полный угол конуса зрения (градусы)
    pub fov_degrees: f32,
    /// Высота глаз над pivot (чтобы луч не цеплял пол)
    pub eye_height: f32,
    /// Какие collision layers блокируют взгляд (target layer добавляется всегда)
    pub obstruction_filter: u32,

    pub patrol_origin: Vec3,
    pub patrol_radius: f32,
    /// Радиус snap'а кандидата патруля на navigation surface
    pub patrol_snap_radius: f32,
    /// Patrol → Wait когда ближе этого к точке патруля
    pub patrol_arrival_distance: f32,
    /// Path не pending и remaining меньше этого, но точка не достигнута → stuck
    pub stall_distance: f32,

    pub move_speed: f32,
    pub chase_speed: f32,
    /// Нижняя граница stopping distance у NavAgent
    pub min_stopping_distance: f32,

    /// Wait после достижения точки патруля (секунды)
    pub wait_time: f32,
    /// Wait после stuck / неудачной генерации точки (секунды)
    pub retry_time: f32,
    /// Wait после прихода на last known position (секунды)
    pub settle_delay: f32,
    /// Сколько секунд без контакта до похода на last known position
    pub forget_duration: f32,

    /// Snap увиденной позиции цели: сначала малый радиус, потом большой, потом raw
    pub memory_snap_radius: f32,
    pub memory_fallback_snap_radius: f32,
    /// Snap позиции выстрела (external alert)
    pub alert_snap_radius: f32,
    /// Memory pursuit стартует только если до LKP больше stopping + margin
    pub memory_trigger_margin: f32,
    /// Memory pursuit закончен когда remaining <= stopping + margin
    pub memory_arrival_margin: f32,
}

impl Default for EnemyAIConfig {
    fn default() -> Self {
        Self {
            sight_range: 15.0,
            fov_degrees: 120.0,
            eye_height: 1.0,
            obstruction_filter: COLLISION_LAYER_ENVIRONMENT,

            patrol_origin: Vec3::new(3.0, 0.0, 12.0),
            patrol_radius: 15.0,
            patrol_snap_radius: 2.0,
            patrol_arrival_distance: 1.0,
            stall_distance: 0.5,

            move_speed: 3.0,
            chase_speed: 5.0,
            min_stopping_distance: 0.4,

            wait_time: 4.0,
            retry_time: 2.0,
            settle_delay: 2.0,
            forget_duration: 3.0,

            memory_snap_radius: 1.0,
            memory_fallback_snap_radius: 5.0,
            alert_snap_radius: 5.0,
            memory_trigger_margin: 0.5,
            memory_arrival_margin: 0.05,
        }
    }
}

impl EnemyAIConfig {
    /// Зажимает tunables в валидные диапазоны (NaN → default значение поля)
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let non_negative = |value: f32, fallback: f32| {
            if value.is_finite() {
                value.max(0.0)
            } else {
                fallback
            }
        };

        Self {
            sight_range: non_negative(self.sight_range, defaults.sight_range),
            fov_degrees: non_negative(self.fov_degrees, defaults.fov_degrees).min(360.0),
            eye_height: non_negative(self.eye_height, defaults.eye_height),
            obstruction_filter: self.obstruction_filter,

            patrol_origin: if self.patrol_origin.is_finite() {
                self.patrol_origin
            } else {
                defaults.patrol_origin
            },
            patrol_radius: non_negative(self.patrol_radius, defaults.patrol_radius),
            patrol_snap_radius: non_negative(self.patrol_snap_radius, defaults.patrol_snap_radius),
            patrol_arrival_distance: non_negative(
                self.patrol_arrival_distance,
                defaults.patrol_arrival_distance,
            ),
            stall_distance: non_negative(self.stall_distance, defaults.stall_distance),

            move_speed: non_negative(self.move_speed, defaults.move_speed),
            chase_speed: non_negative(self.chase_speed, defaults.chase_speed),
            min_stopping_distance: non_negative(
                self.min_stopping_distance,
                defaults.min_stopping_distance,
            ),

            wait_time: non_negative(self.wait_time, defaults.wait_time),
            retry_time: non_negative(self.retry_time, defaults.retry_time),
            settle_delay: non_negative(self.settle_delay, defaults.settle_delay),
            forget_duration: non_negative(self.forget_duration, defaults.forget_duration),

            memory_snap_radius: non_negative(self.memory_snap_radius, defaults.memory_snap_radius),
            memory_fallback_snap_radius: non_negative(
                self.memory_fallback_snap_radius,
                defaults.memory_fallback_snap_radius,
            ),
            alert_snap_radius: non_negative(self.alert_snap_radius, defaults.alert_snap_radius),
            memory_trigger_margin: non_negative(
                self.memory_trigger_margin,
                defaults.memory_trigger_margin,
            ),
            memory_arrival_margin: non_negative(
                self.memory_arrival_margin,
                defaults.memory_arrival_margin,
            ),
        }
    }

    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source).map_err(ConfigError::Parse)?;
        Ok(config.sanitized())
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(ConfigError::Serialize)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_ron_str(&source)
    }

    /// Грузит конфиг, при любой ошибке: warning и defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                crate::logger::log_warning(&format!(
                    "Failed to load AI config {}: {}. Fallback to default.",
                    path.display(),
                    e
                ));
                Self::default()
            }
        }
    }
}

/// Параметры симуляции (seed RNG, частота fixed tick)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub tick_hz: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 60.0,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Serialize(ron::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "io error: {}", e),
            ConfigError::Parse(e) => write!(f, "parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
        }
    }
}
