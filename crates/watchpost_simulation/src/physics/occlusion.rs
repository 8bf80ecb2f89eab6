//! Occlusion query: line-of-sight ray cast для sight test
//!
//! Каждый tick собираем snapshot SightCollider'ов (Transform + shape + layers),
//! ray cast через parry shapes. Ближайший hit выигрывает.

use bevy::prelude::*;
use bevy_rapier3d::parry::query::{Ray, RayCast};
use bevy_rapier3d::parry::shape::{Ball, Cuboid};
use bevy_rapier3d::rapier::na::{Isometry3, Point3, Quaternion, Translation3, UnitQuaternion, Vector3};

use super::collision_layers::{
    COLLISION_LAYER_ACTORS, COLLISION_LAYER_ENVIRONMENT, COLLISION_LAYER_TARGET,
};

/// Результат ray cast: кто первым попался на луче
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub distance: f32,
}

/// Ray cast коллаборатор sight test'а
pub trait OcclusionQuery {
    /// `None`: луч ничего не задел (или direction нулевой)
    ///
    /// `exclude`: entities, которые луч пропускает (обычно сам смотрящий:
    /// глаза внутри своего тела, иначе первый hit всегда он сам).
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter_mask: u32,
        exclude: &[Entity],
    ) -> Option<RayHit>;
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum SightShape {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Коллайдер для sight ray cast (не для физики)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SightCollider {
    pub shape: SightShape,
    /// Смещение центра shape от Transform (обычно вверх от pivot в ногах)
    pub offset: Vec3,
    pub layers: u32,
}

impl SightCollider {
    /// Стена/препятствие (центр = Transform)
    pub fn wall(half_extents: Vec3) -> Self {
        Self {
            shape: SightShape::Cuboid { half_extents },
            offset: Vec3::ZERO,
            layers: COLLISION_LAYER_ENVIRONMENT,
        }
    }

    /// Тело цели: ~2м ростом, pivot в ногах
    pub fn target_body() -> Self {
        Self {
            shape: SightShape::Cuboid {
                half_extents: Vec3::new(0.4, 1.0, 0.4),
            },
            offset: Vec3::Y,
            layers: COLLISION_LAYER_TARGET,
        }
    }

    pub fn actor_body() -> Self {
        Self {
            shape: SightShape::Cuboid {
                half_extents: Vec3::new(0.4, 1.0, 0.4),
            },
            offset: Vec3::Y,
            layers: COLLISION_LAYER_ACTORS,
        }
    }
}

#[derive(Debug, Clone)]
struct ColliderEntry {
    entity: Entity,
    layers: u32,
    isometry: Isometry3<f32>,
    shape: SightShape,
}

/// Snapshot всех sight коллайдеров на текущий tick
#[derive(Debug, Clone, Default)]
pub struct SightColliders {
    entries: Vec<ColliderEntry>,
}

impl SightColliders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect<'a>(
        colliders: impl IntoIterator<Item = (Entity, &'a Transform, &'a SightCollider)>,
    ) -> Self {
        let mut snapshot = Self::new();
        for (entity, transform, collider) in colliders {
            snapshot.insert(entity, transform, collider);
        }
        snapshot
    }

    pub fn insert(&mut self, entity: Entity, transform: &Transform, collider: &SightCollider) {
        let center = transform.translation + transform.rotation * collider.offset;
        let rotation = transform.rotation;

        let isometry = Isometry3::from_parts(
            Translation3::new(center.x, center.y, center.z),
            UnitQuaternion::new_normalize(Quaternion::new(
                rotation.w, rotation.x, rotation.y, rotation.z,
            )),
        );

        self.entries.push(ColliderEntry {
            entity,
            layers: collider.layers,
            isometry,
            shape: collider.shape,
        });
    }
}

impl OcclusionQuery for SightColliders {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter_mask: u32,
        exclude: &[Entity],
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        let ray = Ray::new(
            Point3::new(origin.x, origin.y, origin.z),
            Vector3::new(direction.x, direction.y, direction.z),
        );

        self.entries
            .iter()
            .filter(|entry| entry.layers & filter_mask != 0)
            .filter(|entry| !exclude.contains(&entry.entity))
            .filter_map(|entry| {
                let toi = match entry.shape {
                    SightShape::Ball { radius } => {
                        Ball::new(radius).cast_ray(&entry.isometry, &ray, max_distance, true)
                    }
                    SightShape::Cuboid { half_extents } => Cuboid::new(Vector3::new(
                        half_extents.x,
                        half_extents.y,
                        half_extents.z,
                    ))
                    .cast_ray(&entry.isometry, &ray, max_distance, true),
                };

                toi.map(|distance| RayHit {
                    entity: entry.entity,
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    #[test]
    fn test_nearest_hit_wins() {
        let mut colliders = SightColliders::new();
        colliders.insert(
            entity(1),
            &Transform::from_xyz(0.0, 1.0, -10.0),
            &SightCollider::wall(Vec3::new(2.0, 2.0, 0.2)),
        );
        colliders.insert(
            entity(2),
            &Transform::from_xyz(0.0, 1.0, -5.0),
            &SightCollider::wall(Vec3::new(2.0, 2.0, 0.2)),
        );

        let hit = colliders
            .raycast(Vec3::Y, Vec3::NEG_Z, 20.0, COLLISION_LAYER_ENVIRONMENT, &[])
            .unwrap();

        assert_eq!(hit.entity, entity(2));
        assert!((hit.distance - 4.8).abs() < 1e-3, "distance = {}", hit.distance);
    }

    #[test]
    fn test_filtered_layers_are_ignored() {
        let mut colliders = SightColliders::new();
        colliders.insert(
            entity(1),
            &Transform::from_xyz(0.0, 0.0, -3.0),
            &SightCollider::actor_body(),
        );

        let hit = colliders.raycast(Vec3::Y, Vec3::NEG_Z, 20.0, COLLISION_LAYER_ENVIRONMENT, &[]);
        assert!(hit.is_none());
    }

    #[test]
    fn test_max_distance_limits_ray() {
        let mut colliders = SightColliders::new();
        colliders.insert(
            entity(1),
            &Transform::from_xyz(0.0, 0.0, -10.0),
            &SightCollider {
                shape: SightShape::Ball { radius: 1.0 },
                offset: Vec3::ZERO,
                layers: COLLISION_LAYER_ENVIRONMENT,
            },
        );

        assert!(colliders
            .raycast(Vec3::ZERO, Vec3::NEG_Z, 5.0, COLLISION_LAYER_ENVIRONMENT, &[])
            .is_none());
        assert!(colliders
            .raycast(Vec3::ZERO, Vec3::NEG_Z, 15.0, COLLISION_LAYER_ENVIRONMENT, &[])
            .is_some());
    }

    #[test]
    fn test_zero_direction_never_hits() {
        let mut colliders = SightColliders::new();
        colliders.insert(
            entity(1),
            &Transform::IDENTITY,
            &SightCollider::wall(Vec3::ONE),
        );

        assert!(colliders
            .raycast(Vec3::ZERO, Vec3::ZERO, 15.0, u32::MAX, &[])
            .is_none());
    }

    #[test]
    fn test_origin_inside_excluded_body_sees_past_it() {
        let observer = entity(1);
        let mut colliders = SightColliders::new();
        colliders.insert(observer, &Transform::IDENTITY, &SightCollider::actor_body());
        colliders.insert(
            entity(2),
            &Transform::from_xyz(0.0, 1.0, -6.0),
            &SightCollider::wall(Vec3::new(2.0, 2.0, 0.2)),
        );
        let mask = COLLISION_LAYER_ACTORS | COLLISION_LAYER_ENVIRONMENT;

        // Луч из глаз (внутри собственного тела) без exclude упирается в себя
        let hit = colliders.raycast(Vec3::Y, Vec3::NEG_Z, 20.0, mask, &[]).unwrap();
        assert_eq!(hit.entity, observer);
        assert_eq!(hit.distance, 0.0);

        let hit = colliders
            .raycast(Vec3::Y, Vec3::NEG_Z, 20.0, mask, &[observer])
            .unwrap();
        assert_eq!(hit.entity, entity(2));
    }
}
