use super::World;
use crate::config::GrowthVariant;
use crate::grid::CellKind;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug)]
pub struct StepTimings {
    pub emit_us: u64,
    pub diffuse_us: u64,
    pub grow_us: u64,
    pub total_us: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StepMetrics {
    pub step: usize,
    pub mold_count: usize,
    pub grown: usize,
    pub died: usize,
    pub chemical_total: f64,
    pub chemical_max: f32,
    /// Mean health over mold cells; zero for the simple variant.
    pub health_mean: f32,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub sample_every: usize,
    pub variant: GrowthVariant,
    pub seed: u64,
    pub final_mold_count: usize,
    #[serde(default)]
    pub total_grown: usize,
    #[serde(default)]
    pub total_died: usize,
    pub samples: Vec<StepMetrics>,
}

impl World {
    pub fn collect_step_metrics(&self) -> StepMetrics {
        let mold_count = self.mold_count();
        let health_mean = match &self.health {
            Some(health) if mold_count > 0 => {
                let sum: f32 = health
                    .data()
                    .iter()
                    .zip(self.grid.cells())
                    .filter(|(_, kind)| **kind == CellKind::Mold)
                    .map(|(h, _)| *h)
                    .sum();
                sum / mold_count as f32
            }
            _ => 0.0,
        };
        StepMetrics {
            step: self.step_index,
            mold_count,
            grown: self.grown_last_step,
            died: self.died_last_step,
            chemical_total: self.chemical.total(),
            chemical_max: self.chemical.max_value(),
            health_mean,
        }
    }
}
