//! Navigation sampler: произвольная точка → ближайшая точка на walkable surface

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub trait NavigationSampler {
    /// Ближайшая navigable точка в пределах `search_radius`, иначе `None`
    fn sample_navigable(&self, point: Vec3, search_radius: f32) -> Option<Vec3>;
}

/// Walkable прямоугольник (XZ extents на фиксированной высоте)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct NavRegion {
    pub min: Vec2,
    pub max: Vec2,
    pub height: f32,
}

impl NavRegion {
    pub fn new(center: Vec3, half_extents: Vec2) -> Self {
        let center_xz = Vec2::new(center.x, center.z);
        Self {
            min: center_xz - half_extents.abs(),
            max: center_xz + half_extents.abs(),
            height: center.y,
        }
    }

    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            self.height,
            point.z.clamp(self.min.y, self.max.y),
        )
    }
}

/// Walkable surface уровня (resource)
///
/// Пустая surface ничего не сэмплит: patrol generator тогда уходит в Wait/retry.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationSurface {
    pub regions: Vec<NavRegion>,
}

impl NavigationSurface {
    pub fn new(regions: Vec<NavRegion>) -> Self {
        Self { regions }
    }

    /// Плоский пол вокруг center (удобно для тестов и headless demo)
    pub fn flat(center: Vec3, half_extents: Vec2) -> Self {
        Self::new(vec![NavRegion::new(center, half_extents)])
    }

    pub fn with_region(mut self, region: NavRegion) -> Self {
        self.regions.push(region);
        self
    }}

impl NavigationSampler for NavigationSurface {
    fn sample_navigable(&self, point: Vec3, search_radius: f32) -> Option<Vec3> {
        self.regions
            .iter()
            .map(|region| region.closest_point(point))
            .map(|candidate| (candidate, candidate.distance(point)))
            .filter(|(_, distance)| *distance <= search_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_on_surface_is_returned_as_is() {
        let surface = NavigationSurface::flat(Vec3::ZERO, Vec2::splat(10.0));
        let sampled = surface.sample_navigable(Vec3::new(3.0, 0.0, -4.0), 0.1);
        assert_eq!(sampled, Some(Vec3::new(3.0, 0.0, -4.0)));
    }

    #[test]
    fn test_point_off_edge_snaps_within_radius() {
        let surface = NavigationSurface::flat(Vec3::ZERO, Vec2::splat(10.0));

        let sampled = surface.sample_navigable(Vec3::new(11.5, 0.0, 0.0), 2.0);
        assert_eq!(sampled, Some(Vec3::new(10.0, 0.0, 0.0)));

        assert!(surface.sample_navigable(Vec3::new(13.0, 0.0, 0.0), 2.0).is_none());
    }

    #[test]
    fn test_height_counts_toward_search_radius() {
        let surface = NavigationSurface::flat(Vec3::ZERO, Vec2::splat(10.0));
        assert!(surface.sample_navigable(Vec3::new(0.0, 1.5, 0.0), 1.0).is_none());
        assert_eq!(
            surface.sample_navigable(Vec3::new(0.0, 1.5, 0.0), 2.0),
            Some(Vec3::ZERO)
        );
    }

    #[test]
    fn test_closest_region_wins() {
        let surface = NavigationSurface::flat(Vec3::ZERO, Vec2::splat(1.0))
            .with_region(NavRegion::new(Vec3::new(10.0, 0.0, 0.0), Vec2::splat(1.0)));

        let sampled = surface.sample_navigable(Vec3::new(7.0, 0.0, 0.0), 5.0);
        assert_eq!(sampled, Some(Vec3::new(9.0, 0.0, 0.0)));
    }

    #[test]
    fn test_empty_surface_samples_nothing() {
        let surface = NavigationSurface::default();
        assert!(surface.sample_navigable(Vec3::ZERO, 100.0).is_none());
    }
}
