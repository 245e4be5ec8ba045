use super::metrics::StepTimings;
use super::World;
use crate::config::SimConfig;
use crate::diffuser::diffuse;
use crate::emitter::emit;
use crate::field::ScalarField;
use crate::grid::{CellKind, Grid};
use crate::growth::GrowthInputs;
use crate::scenario::Scenario;
use crate::spatial::DistanceMetric;
use std::time::Instant;
use tracing::debug;

pub(crate) fn paint_scenario(config: &SimConfig, scenario: &Scenario) -> Grid {
    let mut grid = Grid::new(config.width, config.height);
    for cell in scenario.obstacles.cells() {
        grid.set(cell.x, cell.y, CellKind::Obstacle);
    }
    for food in &scenario.food {
        grid.set(food.x, food.y, CellKind::Food);
    }
    grid.set(scenario.mold_seed.x, scenario.mold_seed.y, CellKind::Mold);
    grid
}

/// Broad exponential gradient around each food source plus a strong local
/// patch around the mold seed. Values are clamped to the ceiling and
/// obstacles stay empty of chemical.
pub(crate) fn seed_chemicals(config: &SimConfig, scenario: &Scenario, grid: &Grid) -> ScalarField {
    let s = &config.seeding;
    let mut chemical = ScalarField::new(grid.width(), grid.height(), 0.0);

    let reach = s.food_gradient_radius.ceil() as i64;
    for food in &scenario.food {
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let (nx, ny) = (food.x as i64 + dx, food.y as i64 + dy);
                if !grid.in_bounds(nx, ny) {
                    continue;
                }
                let d = DistanceMetric::Euclidean.between(dx, dy);
                if d <= s.food_gradient_radius {
                    let strength = s.food_gradient_peak * (-d / s.food_gradient_falloff).exp();
                    chemical.raise_to(grid.index(nx as usize, ny as usize), strength);
                }
            }
        }
    }

    let seed = scenario.mold_seed;
    chemical.set(seed.x, seed.y, s.mold_seed_chemical);
    let r = s.mold_patch_radius as i64;
    for dy in -r..=r {
        for dx in -r..=r {
            let (nx, ny) = (seed.x as i64 + dx, seed.y as i64 + dy);
            if !grid.in_bounds(nx, ny) {
                continue;
            }
            let d = DistanceMetric::Chebyshev.between(dx, dy);
            let strength = s.mold_patch_peak - d * s.mold_patch_falloff;
            chemical.raise_to(grid.index(nx as usize, ny as usize), strength);
        }
    }

    for (value, kind) in chemical.data_mut().iter_mut().zip(grid.cells()) {
        *value = if *kind == CellKind::Obstacle {
            0.0
        } else {
            value.clamp(0.0, config.chemical_ceiling)
        };
    }
    chemical
}

pub(crate) fn seed_health(config: &SimConfig, scenario: &Scenario) -> ScalarField {
    let mut health = ScalarField::new(config.width, config.height, 0.0);
    let seed = scenario.mold_seed;
    health.set(seed.x, seed.y, config.health.initial_seed_health);
    health
}

impl World {
    /// Advance exactly one tick: emit, diffuse, then grow.
    pub fn step(&mut self) -> StepTimings {
        let total_start = Instant::now();

        // 1. Food emission, in place
        let t0 = Instant::now();
        emit(&mut self.chemical, &self.grid, &self.emission);
        let emit_us = t0.elapsed().as_micros() as u64;

        // 2. Diffusion/evaporation into a fresh field
        let t1 = Instant::now();
        self.chemical = diffuse(
            &self.chemical,
            &self.grid,
            self.health.as_ref(),
            &self.diffusion,
        );
        let diffuse_us = t1.elapsed().as_micros() as u64;

        // 3. Growth against the post-diffusion field and pre-tick grid
        let t2 = Instant::now();
        let inputs = GrowthInputs {
            grid: &self.grid,
            chemical: &self.chemical,
            health: self.health.as_ref(),
            distances: &self.food_distances,
            ceiling: self.config.chemical_ceiling,
        };
        let outcome = self.growth.grow(&inputs, &mut self.rng);
        self.grid = outcome.grid;
        self.chemical = outcome.chemical;
        if outcome.health.is_some() {
            self.health = outcome.health;
        }
        let grow_us = t2.elapsed().as_micros() as u64;

        self.step_index += 1;
        self.grown_last_step = outcome.grown;
        self.died_last_step = outcome.died;
        self.total_grown += outcome.grown;
        self.total_died += outcome.died;

        debug!(
            step = self.step_index,
            grown = outcome.grown,
            died = outcome.died,
            "tick complete"
        );

        StepTimings {
            emit_us,
            diffuse_us,
            grow_us,
            total_us: total_start.elapsed().as_micros() as u64,
        }
    }
}
