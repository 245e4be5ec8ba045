use super::{choose_target, reinforce, GrowthInputs, GrowthOutcome, GrowthRule};
use crate::config::{HealthGrowthParams, MAX_HEALTH};
use crate::field::ScalarField;
use crate::grid::{CellKind, Grid};
use crate::rng::{cell_stream, GrowthPass};
use rayon::prelude::*;

/// Health-driven growth. Each mold cell eases its health toward a target set
/// by food proximity and local chemical; weak cells die, healthy cells
/// reinforce their channel and spread.
#[derive(Clone, Debug)]
pub struct HealthGrowth {
    params: HealthGrowthParams,
}

#[derive(Clone, Copy, Debug)]
struct Upkeep {
    health: f32,
    dies: bool,
}

impl HealthGrowth {
    pub fn new(params: HealthGrowthParams) -> Self {
        Self { params }
    }

    /// Health a cell at `food_distance` with `chemical` drifts toward.
    pub fn target_health(&self, food_distance: f32, chemical: f32) -> f32 {
        let p = &self.params;
        let proximity = (MAX_HEALTH - p.distance_penalty * food_distance).max(0.0);
        (proximity + p.chemical_gain * chemical).min(MAX_HEALTH)
    }

    /// Asymmetric ease toward `target`: at most `rise_step` up or `fall_step` down.
    pub fn ease_toward(&self, current: f32, target: f32) -> f32 {
        let next = if target > current {
            (current + self.params.rise_step).min(target)
        } else {
            (current - self.params.fall_step).max(target)
        };
        if next.is_finite() {
            next.clamp(0.0, MAX_HEALTH)
        } else {
            0.0
        }
    }

    /// Starting health of a freshly grown cell.
    pub fn seed_health(&self, food_distance: f32) -> f32 {
        let p = &self.params;
        (p.seed_health_base - p.seed_health_distance_penalty * food_distance)
            .max(p.seed_health_min)
            .min(MAX_HEALTH)
    }

    fn food_pull(&self, food_distance: f32) -> f32 {
        let p = &self.params;
        if p.food_pull_range <= 0.0 {
            return 0.0;
        }
        (p.food_pull_range - food_distance).max(0.0) / p.food_pull_range * p.food_pull_weight
    }

    /// Health field for a grid that arrived without one: every mold cell at
    /// the configured seed health.
    pub fn initial_health(&self, grid: &Grid) -> ScalarField {
        let mut health = ScalarField::new(grid.width(), grid.height(), 0.0);
        for idx in grid.indices_of(CellKind::Mold) {
            health.data_mut()[idx] = self.params.initial_seed_health;
        }
        health
    }
}

impl GrowthRule for HealthGrowth {
    fn grow(&self, inputs: &GrowthInputs<'_>, tick_seed: u64) -> GrowthOutcome {
        let p = &self.params;
        let GrowthInputs {
            grid,
            chemical,
            health,
            distances,
            ceiling,
        } = *inputs;
        let mut next_health = match health {
            Some(h) => h.clone(),
            None => self.initial_health(grid),
        };
        let molds = grid.indices_of(CellKind::Mold);

        // Pass 1: ease health toward target; no randomness here.
        let upkeep: Vec<Upkeep> = molds
            .par_iter()
            .map(|&idx| {
                let target =
                    self.target_health(distances.euclidean[idx], chemical.data()[idx]);
                let health = self.ease_toward(next_health.data()[idx], target);
                Upkeep {
                    health,
                    dies: health <= p.death_threshold,
                }
            })
            .collect();

        let mut next_grid = grid.clone();
        let mut next_chemical = chemical.clone();
        let reinforce_cap = p.reinforce_cap.min(ceiling);
        let mut died = 0;
        for (&idx, u) in molds.iter().zip(&upkeep) {
            if u.dies {
                next_grid.cells_mut()[idx] = CellKind::Empty;
                next_health.data_mut()[idx] = 0.0;
                died += 1;
                continue;
            }
            next_health.data_mut()[idx] = u.health;
            if u.health > p.reinforce_threshold {
                let slot = &mut next_chemical.data_mut()[idx];
                *slot = reinforce(*slot, p.reinforce_amount, reinforce_cap);
            }
        }

        // Pass 2: only healthy survivors spread.
        let scored = &next_chemical;
        let targets: Vec<Option<usize>> = molds
            .par_iter()
            .zip(upkeep.par_iter())
            .map(|(&idx, u)| {
                if u.dies || u.health <= p.growth_min_health {
                    return None;
                }
                let mut rng = cell_stream(tick_seed, idx, GrowthPass::Spread);
                choose_target(
                    grid,
                    idx,
                    p.growth_threshold,
                    p.growth_acceptance_probability,
                    &mut rng,
                    |n| scored.data()[n] + self.food_pull(distances.euclidean[n]),
                )
            })
            .collect();

        let mut grown = 0;
        for target in targets.into_iter().flatten() {
            if next_grid.cells()[target] == CellKind::Empty {
                next_grid.cells_mut()[target] = CellKind::Mold;
                grown += 1;
            }
            next_health.data_mut()[target] = self.seed_health(distances.euclidean[target]);
        }

        for (h, kind) in next_health.data_mut().iter_mut().zip(next_grid.cells()) {
            if *kind != CellKind::Mold {
                *h = 0.0;
            }
        }

        GrowthOutcome {
            grid: next_grid,
            chemical: next_chemical,
            health: Some(next_health),
            grown,
            died,
        }
    }
}
