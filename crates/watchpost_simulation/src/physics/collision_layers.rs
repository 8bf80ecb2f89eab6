//! Collision Layers Constants
//!
//! ## Архитектура:
//! - **Layers (битовая маска):** На каком слое находится объект (`SightCollider::layers`)
//! - **Mask (битовая маска):** Какие слои учитывает ray cast (`OcclusionQuery::raycast`)
//!
//! ## Layers:
//! - 0b1 = 1: Reserved
//! - 0b10 = 2: Actors (агенты)
//! - 0b100 = 4: Environment (стены, препятствия)
//! - 0b1000 = 8: Target (тот, кого агенты ищут)

/// Layer: Actors (enemy агенты)
pub const COLLISION_LAYER_ACTORS: u32 = 0b10; // 2

/// Layer: Environment (walls, obstacles, terrain)
pub const COLLISION_LAYER_ENVIRONMENT: u32 = 0b100; // 4

/// Layer: Target (игрок)
pub const COLLISION_LAYER_TARGET: u32 = 0b1000; // 8

/// Mask для sight ray: obstruction filter + всегда сам target
///
/// Без target layer луч никогда не "попадёт" в цель и sight test всегда false.
pub const fn sight_ray_mask(obstruction_filter: u32) -> u32 {
    obstruction_filter | COLLISION_LAYER_TARGET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sight_mask_always_includes_target() {
        assert_eq!(sight_ray_mask(0), COLLISION_LAYER_TARGET);
        assert_eq!(
            sight_ray_mask(COLLISION_LAYER_ENVIRONMENT),
            COLLISION_LAYER_ENVIRONMENT | COLLISION_LAYER_TARGET
        );
    }
}
