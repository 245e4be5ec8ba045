use super::{choose_target, reinforce, GrowthInputs, GrowthOutcome, GrowthRule};
use crate::config::SimpleGrowthParams;
use crate::grid::CellKind;
use crate::rng::{cell_stream, GrowthPass};
use rand::Rng;
use rayon::prelude::*;

/// Chemical-threshold growth: mold near food is reinforced, starving mold
/// decays and may die, and every mold cell tries to spread toward the
/// strongest attractant.
#[derive(Clone, Debug)]
pub struct SimpleGrowth {
    params: SimpleGrowthParams,
}

impl SimpleGrowth {
    pub fn new(params: SimpleGrowthParams) -> Self {
        Self { params }
    }

    fn food_bonus(&self, manhattan: f32) -> f32 {
        if manhattan < self.params.food_bonus_range {
            self.params.food_bonus_scale / (manhattan + 1.0)
        } else {
            0.0
        }
    }
}

impl GrowthRule for SimpleGrowth {
    fn grow(&self, inputs: &GrowthInputs<'_>, tick_seed: u64) -> GrowthOutcome {
        let p = &self.params;
        let GrowthInputs {
            grid,
            chemical,
            distances,
            ceiling,
            ..
        } = *inputs;
        let molds = grid.indices_of(CellKind::Mold);
        let sense_radius = p.food_sense_radius as f32;
        let reinforce_cap = p.reinforce_cap.min(ceiling);

        // Pass 1: upkeep. Yields (new chemical, starved to death).
        let upkeep: Vec<(f32, bool)> = molds
            .par_iter()
            .map(|&idx| {
                let value = chemical.data()[idx];
                if distances.chebyshev[idx] <= sense_radius {
                    return (reinforce(value, p.reinforce_amount, reinforce_cap), false);
                }
                let decayed = (value * p.starvation_decay).max(0.0);
                let dies = decayed < p.starvation_threshold
                    && cell_stream(tick_seed, idx, GrowthPass::Upkeep).random::<f32>()
                        < p.starvation_death_probability;
                (decayed, dies)
            })
            .collect();

        let mut next_grid = grid.clone();
        let mut next_chemical = chemical.clone();
        let mut died = 0;
        for (&idx, &(value, dies)) in molds.iter().zip(&upkeep) {
            next_chemical.data_mut()[idx] = value;
            if dies {
                next_grid.cells_mut()[idx] = CellKind::Empty;
                died += 1;
            }
        }

        // Pass 2: spread from every pre-tick mold cell into pre-tick empty cells.
        let scored = &next_chemical;
        let targets: Vec<Option<usize>> = molds
            .par_iter()
            .map(|&idx| {
                let mut rng = cell_stream(tick_seed, idx, GrowthPass::Spread);
                choose_target(
                    grid,
                    idx,
                    p.growth_threshold,
                    p.growth_acceptance_probability,
                    &mut rng,
                    |n| scored.data()[n] + self.food_bonus(distances.manhattan[n]),
                )
            })
            .collect();

        let seed_cap = p.seed_chemical_cap.min(ceiling);
        let mut grown = 0;
        for target in targets.into_iter().flatten() {
            if next_grid.cells()[target] == CellKind::Empty {
                next_grid.cells_mut()[target] = CellKind::Mold;
                grown += 1;
            }
            let slot = &mut next_chemical.data_mut()[target];
            *slot = reinforce(*slot, p.seed_chemical, seed_cap);
        }

        GrowthOutcome {
            grid: next_grid,
            chemical: next_chemical,
            health: None,
            grown,
            died,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ScalarField;
    use crate::grid::Grid;
    use crate::spatial::FoodDistances;

    fn run(grid: &Grid, chemical: &ScalarField, params: SimpleGrowthParams, seed: u64) -> GrowthOutcome {
        let distances = FoodDistances::build(grid);
        let inputs = GrowthInputs {
            grid,
            chemical,
            health: None,
            distances: &distances,
            ceiling: 15.0,
        };
        SimpleGrowth::new(params).grow(&inputs, seed)
    }

    #[test]
    fn mold_near_food_is_reinforced_up_to_ceiling() {
        let mut grid = Grid::new(9, 9);
        grid.set(4, 4, CellKind::Food);
        grid.set(2, 2, CellKind::Mold);
        let mut chemical = ScalarField::new(9, 9, 0.0);
        chemical.set(2, 2, 4.0);
        let params = SimpleGrowthParams {
            growth_acceptance_probability: 0.0,
            ..SimpleGrowthParams::default()
        };
        let out = run(&grid, &chemical, params.clone(), 1);
        assert_eq!(out.chemical.get(2, 2), 9.0);

        chemical.set(2, 2, 13.0);
        let out = run(&grid, &chemical, params, 1);
        assert_eq!(out.chemical.get(2, 2), 15.0);
    }

    #[test]
    fn starving_mold_decays_and_dies_when_certain() {
        let mut grid = Grid::new(30, 5);
        grid.set(0, 2, CellKind::Food);
        grid.set(20, 2, CellKind::Mold);
        let mut chemical = ScalarField::new(30, 5, 0.0);
        chemical.set(20, 2, 0.4);
        let params = SimpleGrowthParams {
            starvation_death_probability: 1.0,
            growth_acceptance_probability: 0.0,
            ..SimpleGrowthParams::default()
        };
        let out = run(&grid, &chemical, params, 5);
        assert_eq!(out.grid.get(20, 2), Some(CellKind::Empty));
        assert_eq!(out.died, 1);
        assert!((out.chemical.get(20, 2) - 0.4 * 0.98).abs() < 1e-6);
    }

    #[test]
    fn starving_mold_above_threshold_survives() {
        let mut grid = Grid::new(30, 5);
        grid.set(0, 2, CellKind::Food);
        grid.set(20, 2, CellKind::Mold);
        let mut chemical = ScalarField::new(30, 5, 0.0);
        chemical.set(20, 2, 3.0);
        let params = SimpleGrowthParams {
            starvation_death_probability: 1.0,
            growth_acceptance_probability: 0.0,
            ..SimpleGrowthParams::default()
        };
        let out = run(&grid, &chemical, params, 5);
        assert_eq!(out.grid.get(20, 2), Some(CellKind::Mold));
        assert_eq!(out.died, 0);
    }

    #[test]
    fn spreads_toward_strongest_neighbor() {
        let mut grid = Grid::new(5, 5);
        grid.set(2, 2, CellKind::Mold);
        grid.set(4, 4, CellKind::Food);
        let mut chemical = ScalarField::new(5, 5, 0.0);
        chemical.set(3, 2, 6.0);
        chemical.set(2, 1, 2.0);
        let params = SimpleGrowthParams {
            growth_acceptance_probability: 1.0,
            ..SimpleGrowthParams::default()
        };
        let out = run(&grid, &chemical, params, 3);
        assert_eq!(out.grid.get(3, 2), Some(CellKind::Mold));
        assert_eq!(out.grid.count(CellKind::Mold), 2);
        assert_eq!(out.grown, 1);
        assert_eq!(out.chemical.get(3, 2), 11.0);
    }

    #[test]
    fn new_mold_does_not_cascade_within_a_tick() {
        let mut grid = Grid::new(7, 3);
        grid.set(1, 1, CellKind::Mold);
        grid.set(6, 1, CellKind::Food);
        let mut chemical = ScalarField::new(7, 3, 0.0);
        for x in 2..6 {
            chemical.set(x, 1, 10.0);
        }
        let params = SimpleGrowthParams {
            growth_acceptance_probability: 1.0,
            ..SimpleGrowthParams::default()
        };
        let out = run(&grid, &chemical, params, 11);
        assert_eq!(out.grid.count(CellKind::Mold), 2);
        assert_eq!(out.grid.get(2, 1), Some(CellKind::Mold));
    }

    #[test]
    fn border_mold_grows_with_bounds_checks() {
        let mut grid = Grid::new(5, 5);
        grid.set(0, 0, CellKind::Mold);
        grid.set(4, 4, CellKind::Food);
        let chemical = ScalarField::new(5, 5, 5.0);
        let params = SimpleGrowthParams {
            growth_acceptance_probability: 1.0,
            ..SimpleGrowthParams::default()
        };
        let out = run(&grid, &chemical, params, 2);
        assert_eq!(out.grid.count(CellKind::Mold), 2);
    }

    #[test]
    fn same_seed_same_outcome() {
        let mut grid = Grid::new(12, 12);
        grid.set(6, 6, CellKind::Food);
        for x in 2..9 {
            grid.set(x, 3, CellKind::Mold);
        }
        let chemical = ScalarField::new(12, 12, 2.0);
        let a = run(&grid, &chemical, SimpleGrowthParams::default(), 77);
        let b = run(&grid, &chemical, SimpleGrowthParams::default(), 77);
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.chemical, b.chemical);
    }
}
