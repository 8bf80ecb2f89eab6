//! Headless симуляция WATCHPOST
//!
//! Арена: пол, стена, цель, один sentinel и один relentless агент.
//! На 300-м тике: выстрел. Логируем переходы и итоговую гистограмму состояний.
//!
//! Опционально: путь к RON с EnemyAIConfig первым аргументом.

use bevy::prelude::*;
use watchpost_simulation::{
    create_headless_app, log_info, spawn_relentless, spawn_sentinel, spawn_target, spawn_wall,
    state_histogram, AIStateChanged, EnemyAIConfig, GunfireAlert, NavigationSurface,
    SimulationPlugin,
};

const TICKS: usize = 1000;
const ALERT_TICK: usize = 300;

/// Пишем смены состояний в лог (вместо UI)
fn log_state_changes(mut changes: EventReader<AIStateChanged>) {
    for change in changes.read() {
        log_info(&format!(
            "state: {:?} {:?} → {:?}",
            change.entity, change.from, change.to
        ));
    }
}

fn main() {
    let seed = 42;
    let config = match std::env::args().nth(1) {
        Some(path) => EnemyAIConfig::load_or_default(path),
        None => EnemyAIConfig::default(),
    };

    log_info(&format!("Starting WATCHPOST headless simulation (seed: {})", seed));

    let mut app = create_headless_app(seed);
    app.insert_resource(NavigationSurface::flat(Vec3::ZERO, Vec2::splat(40.0)))
        .add_plugins(SimulationPlugin)
        .add_systems(Update, log_state_changes);

    {
        let mut commands = app.world_mut().commands();
        spawn_wall(&mut commands, Vec3::new(0.0, 1.0, 4.0), Vec3::new(4.0, 2.0, 0.3));
        spawn_target(&mut commands, Vec3::new(0.0, 0.0, 10.0));
        spawn_sentinel(&mut commands, Vec3::new(3.0, 0.0, 12.0), config.clone());
        spawn_relentless(&mut commands, Vec3::new(-15.0, 0.0, -15.0), config);
    }
    app.world_mut().flush();

    for tick in 0..TICKS {
        if tick == ALERT_TICK {
            app.world_mut().send_event(GunfireAlert {
                position: Vec3::new(-10.0, 0.0, 0.0),
            });
        }

        app.update();

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            log_info(&format!("Tick {}: {} entities", tick, entity_count));
        }
    }

    for (kind, count) in state_histogram(app.world_mut()) {
        log_info(&format!("{:?}: {}", kind, count));
    }

    log_info("Simulation complete!");
}
