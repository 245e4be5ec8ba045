//! Mold upkeep and directed growth.
//!
//! Both rule sets share the same two-pass shape: an upkeep pass over the
//! pre-tick mold cells, then a spread pass in which each source picks at most
//! one empty axis neighbor. Every decision reads the pre-tick classification,
//! so cells converted during the spread pass never seed further growth in the
//! same tick.

mod health;
mod simple;

pub use health::HealthGrowth;
pub use simple::SimpleGrowth;

use crate::config::{GrowthVariant, SimConfig};
use crate::field::ScalarField;
use crate::grid::{CellKind, Grid};
use crate::spatial::FoodDistances;
use rand::Rng;

/// Frozen read-only view handed to a growth rule.
#[derive(Clone, Copy)]
pub struct GrowthInputs<'a> {
    pub grid: &'a Grid,
    /// Post-diffusion chemical field.
    pub chemical: &'a ScalarField,
    pub health: Option<&'a ScalarField>,
    pub distances: &'a FoodDistances,
    pub ceiling: f32,
}

#[derive(Clone, Debug)]
pub struct GrowthOutcome {
    pub grid: Grid,
    pub chemical: ScalarField,
    pub health: Option<ScalarField>,
    /// Distinct empty cells converted to mold.
    pub grown: usize,
    pub died: usize,
}

/// A growth rule set. `tick_seed` keys the per-cell random streams.
pub trait GrowthRule {
    fn grow(&self, inputs: &GrowthInputs<'_>, tick_seed: u64) -> GrowthOutcome;
}

/// Growth strategy selected by configuration.
#[derive(Clone, Debug)]
pub enum GrowthEngine {
    Simple(SimpleGrowth),
    Health(HealthGrowth),
}

impl GrowthEngine {
    pub fn from_config(config: &SimConfig) -> Self {
        match config.variant {
            GrowthVariant::Simple => GrowthEngine::Simple(SimpleGrowth::new(config.simple.clone())),
            GrowthVariant::Health => GrowthEngine::Health(HealthGrowth::new(config.health.clone())),
        }
    }

    pub fn variant(&self) -> GrowthVariant {
        match self {
            GrowthEngine::Simple(_) => GrowthVariant::Simple,
            GrowthEngine::Health(_) => GrowthVariant::Health,
        }
    }

    /// Run both passes. Draws exactly one value from `rng` per call.
    pub fn grow<R: Rng + ?Sized>(&self, inputs: &GrowthInputs<'_>, rng: &mut R) -> GrowthOutcome {
        let tick_seed = rng.random::<u64>();
        match self {
            GrowthEngine::Simple(rule) => rule.grow(inputs, tick_seed),
            GrowthEngine::Health(rule) => rule.grow(inputs, tick_seed),
        }
    }
}

/// Best-scoring empty axis neighbor of `source` above `threshold`.
///
/// A candidate only replaces the current best if it also wins its own
/// acceptance draw; draws are skipped for candidates that cannot win.
pub(crate) fn choose_target<R: Rng + ?Sized>(
    snapshot: &Grid,
    source: usize,
    threshold: f32,
    acceptance: f32,
    rng: &mut R,
    score: impl Fn(usize) -> f32,
) -> Option<usize> {
    let (x, y) = snapshot.coords(source);
    let mut best = None;
    let mut best_score = 0.0f32;
    for (_, _, n) in snapshot.axis_neighbors(x, y) {
        if snapshot.cells()[n] != CellKind::Empty {
            continue;
        }
        let s = score(n);
        if s > best_score && s > threshold && rng.random::<f32>() < acceptance {
            best = Some(n);
            best_score = s;
        }
    }
    best
}

/// Add `amount` without lowering a value already above `cap`.
#[inline]
pub(crate) fn reinforce(value: f32, amount: f32, cap: f32) -> f32 {
    if value >= cap {
        value
    } else {
        (value + amount).min(cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn choose_target_ignores_non_empty_neighbors() {
        let mut grid = Grid::new(3, 3);
        grid.set(1, 1, CellKind::Mold);
        grid.set(1, 0, CellKind::Food);
        grid.set(0, 1, CellKind::Obstacle);
        grid.set(2, 1, CellKind::Mold);
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let source = grid.index(1, 1);
        let target = choose_target(&grid, source, 0.5, 1.0, &mut rng, |_| 10.0);
        assert_eq!(target, Some(grid.index(1, 2)));
    }

    #[test]
    fn choose_target_prefers_highest_score() {
        let grid = Grid::new(3, 3);
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let best = grid.index(2, 1);
        let target = choose_target(&grid, grid.index(1, 1), 0.5, 1.0, &mut rng, |n| {
            if n == best {
                5.0
            } else {
                1.0
            }
        });
        assert_eq!(target, Some(best));
    }

    #[test]
    fn choose_target_respects_threshold_and_gate() {
        let grid = Grid::new(3, 3);
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let source = grid.index(1, 1);
        assert_eq!(choose_target(&grid, source, 2.0, 1.0, &mut rng, |_| 2.0), None);
        assert_eq!(choose_target(&grid, source, 0.0, 0.0, &mut rng, |_| 9.0), None);
    }

    #[test]
    fn reinforce_never_lowers() {
        assert_eq!(reinforce(3.0, 5.0, 12.0), 8.0);
        assert_eq!(reinforce(10.0, 5.0, 12.0), 12.0);
        assert_eq!(reinforce(14.0, 1.0, 12.0), 14.0);
    }
}
