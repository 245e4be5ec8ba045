pub mod config;
pub mod diffuser;
pub mod emitter;
pub mod field;
pub mod grid;
pub mod growth;
pub mod rng;
pub mod scenario;
pub mod spatial;
pub mod world;

pub use config::{GrowthVariant, SimConfig, SimConfigError};
pub use field::ScalarField;
pub use grid::{CellKind, Grid};
pub use scenario::{Coord, ObstacleRegion, Scenario, ScenarioError};
pub use world::{ExperimentError, RunSummary, StepMetrics, StepTimings, World, WorldInitError};
