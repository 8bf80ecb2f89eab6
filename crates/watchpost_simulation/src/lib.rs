//! WATCHPOST Simulation Core
//!
//! ECS-симуляция enemy AI на Bevy 0.16 (headless)
//!
//! Один tick = один FixedUpdate:
//! - Decide: gunfire alerts → sight test → Patrol / Wait / Chase
//! - Move: NavAgent'ы двигаются к destination
//! - React: contact damage, despawn уничтоженных агентов

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod config;
pub mod logger;
pub mod navigation;
pub mod physics;

// Re-export базовых типов для удобства
pub use ai::{
    spawn_relentless, spawn_sentinel, spawn_target, spawn_wall, AIBehavior, AIPlugin, AIState,
    AIStateChanged, AIStateKind, Agent, AgentDestroyed, GunfireAlert, PerceptionTarget,
    SpatialMemory,
};
pub use combat::{CombatPlugin, ContactDamage, ContactHit};
pub use config::{ConfigError, EnemyAIConfig, SimulationConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use navigation::{NavAgent, NavRegion, NavigationPlugin, NavigationSurface};
pub use physics::SightCollider;

/// Фазы simulation tick'а (FixedUpdate, строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Decide,
    Move,
    React,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Seed и частоту берёт из `SimulationConfig` (если хост положил его до add_plugins),
/// уже вставленный DeterministicRng не трогает.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(config.seed));
        }

        app
            // Fixed timestep для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
            .insert_resource(config)
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Decide,
                    SimulationSet::Move,
                    SimulationSet::React,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((AIPlugin, NavigationPlugin, CombatPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Каждый `app.update()` двигает время ровно на один fixed tick (первый update: нулевой delta).
/// SimulationPlugin не добавляется: тесты решают сами.
pub fn create_headless_app(seed: u64) -> App {
    let config = SimulationConfig {
        seed,
        ..default()
    };

    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(config.tick_hz)) // 60Hz FixedUpdate
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / config.tick_hz,
        )))
        .insert_resource(config);

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

/// Сколько агентов в каждом состоянии (Patrol, Wait, Chase)
pub fn state_histogram(world: &mut World) -> [(AIStateKind, usize); 3] {
    let mut histogram = [
        (AIStateKind::Patrol, 0),
        (AIStateKind::Wait, 0),
        (AIStateKind::Chase, 0),
    ];

    let mut query = world.query::<&AIState>();
    for state in query.iter(world) {
        if let Some(slot) = histogram.iter_mut().find(|(kind, _)| *kind == state.kind()) {
            slot.1 += 1;
        }
    }

    histogram
}
