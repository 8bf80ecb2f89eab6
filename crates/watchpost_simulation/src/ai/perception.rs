//! Sight test: range + field of view + line of sight
//!
//! Порядок проверок (дешёвые первыми):
//! 1. distance > sight_range → false
//! 2. угол между forward и направлением на цель > fov/2 → false
//! 3. ray cast из глаз (pivot + eye_height) по направлению на цель:
//!    true только если первый hit: сама цель (собственное тело смотрящего луч пропускает)
//!
//! Side effect (только при успехе): SpatialMemory получает snap позиции цели и время.

use bevy::prelude::*;

use crate::ai::components::{snap_memory_position, SpatialMemory};
use crate::config::EnemyAIConfig;
use crate::navigation::NavigationSampler;
use crate::physics::{sight_ray_mask, OcclusionQuery};

/// Цель на этот tick (snapshot позиции)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceivedTarget {
    pub entity: Entity,
    pub position: Vec3,
}

/// Чистая проверка видимости (без side effects)
pub fn can_perceive(
    observer: Entity,
    position: Vec3,
    forward: Vec3,
    target: &PerceivedTarget,
    config: &EnemyAIConfig,
    occlusion: &dyn OcclusionQuery,
) -> bool {
    let to_target = target.position - position;
    if to_target.length() > config.sight_range {
        return false;
    }

    // Цель в той же точке: направления нет, луч не построить
    let Some(direction) = to_target.try_normalize() else {
        return false;
    };
    let Some(forward) = forward.try_normalize() else {
        return false;
    };

    let angle = forward.angle_between(direction).to_degrees();
    if angle > config.fov_degrees / 2.0 {
        return false;
    }

    let eye = position + Vec3::Y * config.eye_height;
    let mask = sight_ray_mask(config.obstruction_filter);

    occlusion
        .raycast(eye, direction, config.sight_range, mask, &[observer])
        .is_some_and(|hit| hit.entity == target.entity)
}

/// Sight test + запись в память при успехе
///
/// Идемпотентен в пределах tick'а: повторный вызов с теми же входами
/// даёт тот же результат и то же состояние памяти.
#[allow(clippy::too_many_arguments)]
pub fn perceive(
    observer: Entity,
    position: Vec3,
    forward: Vec3,
    target: Option<&PerceivedTarget>,
    config: &EnemyAIConfig,
    occlusion: &dyn OcclusionQuery,
    navigation: &dyn NavigationSampler,
    memory: &mut SpatialMemory,
    now: f64,
) -> bool {
    // Нет цели (не заспавнена / уничтожена): просто не видим
    let Some(target) = target else {
        return false;
    };

    if !can_perceive(observer, position, forward, target, config, occlusion) {
        return false;
    }

    let remembered = snap_memory_position(navigation, target.position, config);
    memory.record_sighting(remembered, now);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::NavigationSurface;
    use crate::physics::{
        SightCollider, SightColliders, COLLISION_LAYER_ACTORS, COLLISION_LAYER_ENVIRONMENT,
    };

    const OBSERVER: Entity = Entity::from_raw(1);

    fn target_at(position: Vec3) -> (PerceivedTarget, SightColliders) {
        let entity = Entity::from_raw(7);
        let mut colliders = SightColliders::new();
        colliders.insert(
            entity,
            &Transform::from_translation(position),
            &SightCollider::target_body(),
        );
        (PerceivedTarget { entity, position }, colliders)
    }

    #[test]
    fn test_visible_target_straight_ahead() {
        let config = EnemyAIConfig::default();
        let (target, colliders) = target_at(Vec3::new(0.0, 0.0, -10.0));

        assert!(can_perceive(OBSERVER, Vec3::ZERO, Vec3::NEG_Z, &target, &config, &colliders));
    }

    #[test]
    fn test_target_beyond_range_is_never_seen() {
        let config = EnemyAIConfig::default();
        let (target, colliders) = target_at(Vec3::new(0.0, 0.0, -20.0));

        assert!(!can_perceive(OBSERVER, Vec3::ZERO, Vec3::NEG_Z, &target, &config, &colliders));
    }

    #[test]
    fn test_fov_boundary() {
        let config = EnemyAIConfig::default(); // 120° → half angle 60°

        // ~50° от forward: видим
        let inside = Vec3::new(50f32.to_radians().sin(), 0.0, -50f32.to_radians().cos()) * 8.0;
        let (target, colliders) = target_at(inside);
        assert!(can_perceive(OBSERVER, Vec3::ZERO, Vec3::NEG_Z, &target, &config, &colliders));

        // ~70° от forward: вне конуса
        let outside = Vec3::new(70f32.to_radians().sin(), 0.0, -70f32.to_radians().cos()) * 8.0;
        let (target, colliders) = target_at(outside);
        assert!(!can_perceive(OBSERVER, Vec3::ZERO, Vec3::NEG_Z, &target, &config, &colliders));
    }

    #[test]
    fn test_wall_blocks_sight() {
        let config = EnemyAIConfig::default();
        let (target, mut colliders) = target_at(Vec3::new(0.0, 0.0, -10.0));
        colliders.insert(
            Entity::from_raw(99),
            &Transform::from_xyz(0.0, 1.0, -5.0),
            &SightCollider::wall(Vec3::new(3.0, 2.0, 0.2)),
        );

        assert!(!can_perceive(OBSERVER, Vec3::ZERO, Vec3::NEG_Z, &target, &config, &colliders));
    }

    #[test]
    fn test_unfiltered_layers_do_not_block() {
        let config = EnemyAIConfig::default(); // obstruction = environment only
        let (target, mut colliders) = target_at(Vec3::new(0.0, 0.0, -10.0));
        colliders.insert(
            Entity::from_raw(50),
            &Transform::from_xyz(0.0, 0.0, -5.0),
            &SightCollider::actor_body(),
        );

        assert!(can_perceive(OBSERVER, Vec3::ZERO, Vec3::NEG_Z, &target, &config, &colliders));
    }

    #[test]
    fn test_target_without_collider_is_not_seen() {
        let config = EnemyAIConfig::default();
        let target = PerceivedTarget {
            entity: Entity::from_raw(7),
            position: Vec3::new(0.0, 0.0, -5.0),
        };

        assert!(!can_perceive(
            OBSERVER,
            Vec3::ZERO,
            Vec3::NEG_Z,
            &target,
            &config,
            &SightColliders::new()
        ));
    }

    #[test]
    fn test_perceive_writes_memory_only_on_success() {
        let config = EnemyAIConfig::default();
        let surface = NavigationSurface::flat(Vec3::ZERO, Vec2::splat(50.0));
        let (target, colliders) = target_at(Vec3::new(0.0, 0.0, -10.0));
        let mut memory = SpatialMemory::default();

        // Отвернулись: не видим, память не трогаем
        let seen = perceive(
            OBSERVER,
            Vec3::ZERO,
            Vec3::Z,
            Some(&target),
            &config,
            &colliders,
            &surface,
            &mut memory,
            1.0,
        );
        assert!(!seen);
        assert_eq!(memory, SpatialMemory::default());

        let seen = perceive(
            OBSERVER,
            Vec3::ZERO,
            Vec3::NEG_Z,
            Some(&target),
            &config,
            &colliders,
            &surface,
            &mut memory,
            2.0,
        );
        assert!(seen);
        assert_eq!(memory.recall(), Some(Vec3::new(0.0, 0.0, -10.0)));
        assert_eq!(memory.last_seen, 2.0);

        // Повторно в тот же tick: тот же результат, та же память
        let snapshot = memory;
        let seen_again = perceive(
            OBSERVER,
            Vec3::ZERO,
            Vec3::NEG_Z,
            Some(&target),
            &config,
            &colliders,
            &surface,
            &mut memory,
            2.0,
        );
        assert!(seen_again);
        assert_eq!(memory, snapshot);
    }

    #[test]
    fn test_missing_target_is_not_an_error() {
        let config = EnemyAIConfig::default();
        let mut memory = SpatialMemory::default();

        assert!(!perceive(
            OBSERVER,
            Vec3::ZERO,
            Vec3::NEG_Z,
            None,
            &config,
            &SightColliders::new(),
            &NavigationSurface::default(),
            &mut memory,
            0.0,
        ));
    }

    #[test]
    fn test_own_body_never_blocks_sight() {
        let config = EnemyAIConfig {
            obstruction_filter: COLLISION_LAYER_ACTORS | COLLISION_LAYER_ENVIRONMENT,
            ..default()
        };
        let (target, mut colliders) = target_at(Vec3::new(0.0, 0.0, -10.0));
        colliders.insert(OBSERVER, &Transform::IDENTITY, &SightCollider::actor_body());

        assert!(can_perceive(OBSERVER, Vec3::ZERO, Vec3::NEG_Z, &target, &config, &colliders));
    }

    #[test]
    fn test_other_actor_blocks_sight_when_actors_filtered() {
        let config = EnemyAIConfig {
            obstruction_filter: COLLISION_LAYER_ACTORS | COLLISION_LAYER_ENVIRONMENT,
            ..default()
        };
        let (target, mut colliders) = target_at(Vec3::new(0.0, 0.0, -10.0));
        colliders.insert(OBSERVER, &Transform::IDENTITY, &SightCollider::actor_body());
        colliders.insert(
            Entity::from_raw(50),
            &Transform::from_xyz(0.0, 0.0, -5.0),
            &SightCollider::actor_body(),
        );

        assert!(!can_perceive(OBSERVER, Vec3::ZERO, Vec3::NEG_Z, &target, &config, &colliders));
    }
}
