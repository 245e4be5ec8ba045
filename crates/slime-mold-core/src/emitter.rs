use crate::field::ScalarField;
use crate::grid::{CellKind, Grid};
use crate::spatial::DistanceMetric;

/// Footprint of the emission painted around every food cell each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmissionProfile {
    pub intensity: f32,
    pub radius: u32,
    pub metric: DistanceMetric,
    pub ceiling: f32,
}

impl EmissionProfile {
    /// Linear falloff from `intensity` at distance 0 to zero at `radius + 1`.
    pub fn strength_at(&self, distance: f32) -> f32 {
        let span = self.radius as f32 + 1.0;
        (self.intensity * (span - distance) / span).max(0.0)
    }
}

/// Add decaying emission around every food cell, clamped to the ceiling.
///
/// Only ever increases values. Obstacles absorb nothing.
pub fn emit(chemical: &mut ScalarField, grid: &Grid, profile: &EmissionProfile) {
    let r = profile.radius as i64;
    let sources = grid.indices_of(CellKind::Food);
    for idx in sources {
        let (fx, fy) = grid.coords(idx);
        for dy in -r..=r {
            for dx in -r..=r {
                let nx = fx as i64 + dx;
                let ny = fy as i64 + dy;
                if !grid.in_bounds(nx, ny) {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if grid.get(nx, ny) == Some(CellKind::Obstacle) {
                    continue;
                }
                let emission = profile.strength_at(profile.metric.between(dx, dy));
                if emission <= 0.0 {
                    continue;
                }
                let current = chemical.get(nx, ny);
                let base = if current.is_finite() { current } else { 0.0 };
                chemical.set(nx, ny, (base + emission).min(profile.ceiling));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manhattan_profile() -> EmissionProfile {
        EmissionProfile {
            intensity: 6.0,
            radius: 2,
            metric: DistanceMetric::Manhattan,
            ceiling: 15.0,
        }
    }

    #[test]
    fn manhattan_emission_falls_off_linearly() {
        let mut grid = Grid::new(7, 7);
        grid.set(3, 3, CellKind::Food);
        let mut chemical = ScalarField::new(7, 7, 0.0);
        emit(&mut chemical, &grid, &manhattan_profile());

        assert_eq!(chemical.get(3, 3), 6.0);
        assert_eq!(chemical.get(4, 3), 4.0);
        assert_eq!(chemical.get(4, 4), 2.0);
        assert_eq!(chemical.get(5, 3), 2.0);
        // Box corners lie beyond the falloff and must not go negative.
        assert_eq!(chemical.get(5, 5), 0.0);
        assert_eq!(chemical.get(0, 0), 0.0);
    }

    #[test]
    fn chebyshev_emission_covers_full_square() {
        let mut grid = Grid::new(9, 9);
        grid.set(4, 4, CellKind::Food);
        let mut chemical = ScalarField::new(9, 9, 0.0);
        let profile = EmissionProfile {
            intensity: 4.0,
            radius: 3,
            metric: DistanceMetric::Chebyshev,
            ceiling: 25.0,
        };
        emit(&mut chemical, &grid, &profile);
        assert_eq!(chemical.get(4, 4), 4.0);
        assert_eq!(chemical.get(7, 7), 1.0);
        assert_eq!(chemical.get(5, 7), 1.0);
        assert_eq!(chemical.get(8, 8), 0.0);
    }

    #[test]
    fn emission_clamps_to_ceiling_and_skips_obstacles() {
        let mut grid = Grid::new(5, 5);
        grid.set(2, 2, CellKind::Food);
        grid.set(3, 2, CellKind::Obstacle);
        let mut chemical = ScalarField::new(5, 5, 14.0);
        chemical.set(3, 2, 0.0);
        emit(&mut chemical, &grid, &manhattan_profile());
        assert_eq!(chemical.get(2, 2), 15.0);
        assert_eq!(chemical.get(3, 2), 0.0);
    }

    #[test]
    fn emission_near_edge_is_bounds_checked() {
        let mut grid = Grid::new(3, 3);
        grid.set(0, 0, CellKind::Food);
        let mut chemical = ScalarField::new(3, 3, 0.0);
        emit(&mut chemical, &grid, &manhattan_profile());
        assert_eq!(chemical.get(0, 0), 6.0);
        assert!(chemical.all_within(0.0, 15.0));
    }
}
