//! Patrol point generator
//!
//! До MAX_PATROL_ATTEMPTS кандидатов: случайная точка в шаре радиуса patrol_radius
//! (Y обнулён → горизонтальный диск), snap на navigation surface.
//! Радиус растёт линейно 1.0× → 1.2× к последней попытке.
//! Все попытки провалились → None (caller уходит в Wait/retry).

use bevy::prelude::*;
use rand::{Rng, RngCore};

use crate::navigation::NavigationSampler;

pub const MAX_PATROL_ATTEMPTS: usize = 10;

/// Насколько вырастает радиус к последней попытке (0.2 = +20%)
pub const PATROL_RADIUS_GROWTH: f32 = 0.2;

pub fn generate_patrol_point(
    origin: Vec3,
    radius: f32,
    snap_radius: f32,
    navigation: &dyn NavigationSampler,
    rng: &mut dyn RngCore,
) -> Option<Vec3> {
    for attempt in 0..MAX_PATROL_ATTEMPTS {
        let scale = attempt_radius_scale(attempt);

        let mut offset = random_inside_unit_sphere(rng) * radius * scale;
        offset.y = 0.0;

        if let Some(point) = navigation.sample_navigable(origin + offset, snap_radius) {
            return Some(point);
        }
    }

    None
}

fn attempt_radius_scale(attempt: usize) -> f32 {
    let progress = attempt as f32 / (MAX_PATROL_ATTEMPTS - 1) as f32;
    1.0 + PATROL_RADIUS_GROWTH * progress
}

/// Равномерная точка внутри единичного шара (rejection sampling)
fn random_inside_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let candidate = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if candidate.length_squared() <= 1.0 {
            return candidate;
        }
    }
}
