//! Physics domain: только то, что нужно perception
//!
//! Нет physics pipeline: sight колайдеры: статичная геометрия,
//! ray cast через parry (re-export bevy_rapier3d).

pub mod collision_layers;
pub mod occlusion;

pub use collision_layers::*;
pub use occlusion::{OcclusionQuery, RayHit, SightCollider, SightColliders, SightShape};
