pub mod lifecycle;
pub mod metrics;

pub use metrics::*;

use crate::config::{GrowthVariant, SimConfig, SimConfigError};
use crate::diffuser::DiffusionParams;
use crate::emitter::EmissionProfile;
use crate::field::ScalarField;
use crate::grid::{CellKind, Grid};
use crate::growth::GrowthEngine;
use crate::scenario::{Scenario, ScenarioError};
use crate::spatial::FoodDistances;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::info;

/// Exclusively owned simulation state. Stages borrow pieces of it for the
/// duration of one tick; nothing is shared between worlds.
pub struct World {
    pub(crate) config: SimConfig,
    pub(crate) scenario: Scenario,
    pub(crate) grid: Grid,
    pub(crate) chemical: ScalarField,
    /// Present only for the health variant.
    pub(crate) health: Option<ScalarField>,
    pub(crate) food_distances: FoodDistances,
    pub(crate) growth: GrowthEngine,
    pub(crate) emission: EmissionProfile,
    pub(crate) diffusion: DiffusionParams,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) step_index: usize,
    pub(crate) grown_last_step: usize,
    pub(crate) died_last_step: usize,
    pub(crate) total_grown: usize,
    pub(crate) total_died: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldInitError {
    #[error("invalid config: {0}")]
    Config(#[from] SimConfigError),
    #[error("invalid scenario: {0}")]
    Scenario(#[from] ScenarioError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExperimentError {
    #[error("sample_every must be positive")]
    InvalidSampleEvery,
    #[error("steps ({actual}) exceed supported maximum ({max})")]
    TooManySteps { max: usize, actual: usize },
}

impl World {
    pub const MAX_EXPERIMENT_STEPS: usize = 1_000_000;

    pub fn new(config: SimConfig, scenario: Scenario) -> Self {
        Self::try_new(config, scenario).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Validate inputs, paint the scenario and run the initialization pass.
    pub fn try_new(config: SimConfig, scenario: Scenario) -> Result<Self, WorldInitError> {
        config.validate()?;
        scenario.validate(config.width, config.height)?;

        let grid = lifecycle::paint_scenario(&config, &scenario);
        let chemical = lifecycle::seed_chemicals(&config, &scenario, &grid);
        let health = (config.variant == GrowthVariant::Health)
            .then(|| lifecycle::seed_health(&config, &scenario));
        let food_distances = FoodDistances::build(&grid);

        info!(
            width = config.width,
            height = config.height,
            variant = ?config.variant,
            food = scenario.food.len(),
            seed = config.seed,
            "world initialized"
        );

        Ok(Self {
            growth: GrowthEngine::from_config(&config),
            emission: config.emission_profile(),
            diffusion: config.diffusion_params(),
            rng: ChaCha12Rng::seed_from_u64(config.seed),
            config,
            scenario,
            grid,
            chemical,
            health,
            food_distances,
            step_index: 0,
            grown_last_step: 0,
            died_last_step: 0,
            total_grown: 0,
            total_died: 0,
        })
    }

    /// World on the default two-food layout sized to the config.
    pub fn with_classic_scenario(config: SimConfig) -> Result<Self, WorldInitError> {
        let scenario = Scenario::classic(config.width, config.height);
        Self::try_new(config, scenario)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn variant(&self) -> GrowthVariant {
        self.growth.variant()
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn chemical(&self) -> &ScalarField {
        &self.chemical
    }

    pub fn health_field(&self) -> Option<&ScalarField> {
        self.health.as_ref()
    }

    pub fn food_distances(&self) -> &FoodDistances {
        &self.food_distances
    }

    pub fn cell_kind(&self, x: usize, y: usize) -> Option<CellKind> {
        self.grid.get(x, y)
    }

    pub fn chemical_at(&self, x: usize, y: usize) -> Option<f32> {
        (x < self.width() && y < self.height()).then(|| self.chemical.get(x, y))
    }

    /// Mold vitality at a cell; `None` outside the grid or in the simple variant.
    pub fn health_at(&self, x: usize, y: usize) -> Option<f32> {
        let health = self.health.as_ref()?;
        (x < self.width() && y < self.height()).then(|| health.get(x, y))
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn mold_count(&self) -> usize {
        self.grid.count(CellKind::Mold)
    }

    /// Tick forever until `stop` is raised. The flag is checked only between
    /// ticks, so a started tick always completes. Returns ticks run.
    pub fn run_until<F>(&mut self, stop: &AtomicBool, mut on_tick: F) -> usize
    where
        F: FnMut(&World, &StepTimings),
    {
        let mut ticks = 0;
        while !stop.load(Ordering::Acquire) {
            let timings = self.step();
            ticks += 1;
            on_tick(self, &timings);
        }
        ticks
    }

    pub fn run_experiment(&mut self, steps: usize, sample_every: usize) -> RunSummary {
        self.try_run_experiment(steps, sample_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_run_experiment(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }

        let grown_before = self.total_grown;
        let died_before = self.total_died;
        let estimated_samples = if steps == 0 {
            0
        } else {
            ((steps - 1) / sample_every) + 1
        };
        let mut samples = Vec::with_capacity(estimated_samples);
        for step in 1..=steps {
            self.step();
            if step % sample_every == 0 || step == steps {
                samples.push(self.collect_step_metrics());
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            steps,
            sample_every,
            variant: self.variant(),
            seed: self.config.seed,
            final_mold_count: self.mold_count(),
            total_grown: self.total_grown - grown_before,
            total_died: self.total_died - died_before,
            samples,
        })
    }
}
