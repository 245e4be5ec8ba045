use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;
use slime_mold_core::{Scenario, SimConfig, World};

/// PyO3 module exposing slime-mold-core to a Python renderer.
#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

fn parse_json<T: serde::de::DeserializeOwned>(what: &str, json: &str) -> PyResult<T> {
    serde_json::from_str(json).map_err(|e| PyValueError::new_err(format!("invalid {what} json: {e}")))
}

#[pyclass(name = "Simulation")]
struct PySimulation {
    world: World,
}

#[pymethods]
impl PySimulation {
    /// Build from optional JSON config/scenario; omitted scenario uses the classic layout.
    #[new]
    #[pyo3(signature = (config_json=None, scenario_json=None))]
    fn new(config_json: Option<&str>, scenario_json: Option<&str>) -> PyResult<Self> {
        let config: SimConfig = match config_json {
            Some(json) => parse_json("config", json)?,
            None => SimConfig::default(),
        };
        let scenario: Scenario = match scenario_json {
            Some(json) => parse_json("scenario", json)?,
            None => Scenario::classic(config.width, config.height),
        };
        let world =
            World::try_new(config, scenario).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { world })
    }

    /// Advance one tick; returns the tick's total wall time in microseconds.
    fn step(&mut self) -> u64 {
        self.world.step().total_us
    }

    #[getter]
    fn width(&self) -> usize {
        self.world.width()
    }

    #[getter]
    fn height(&self) -> usize {
        self.world.height()
    }

    #[getter]
    fn step_index(&self) -> usize {
        self.world.step_index()
    }

    #[getter]
    fn mold_count(&self) -> usize {
        self.world.mold_count()
    }

    fn cell_kind(&self, x: usize, y: usize) -> PyResult<u8> {
        self.world
            .cell_kind(x, y)
            .map(|k| k.as_u8())
            .ok_or_else(|| PyIndexError::new_err(format!("({x}, {y}) is outside the grid")))
    }

    fn health_at(&self, x: usize, y: usize) -> Option<f32> {
        self.world.health_at(x, y)
    }

    /// Row-major cell kinds (0 empty, 1 mold, 2 food, 3 obstacle).
    fn kinds(&self) -> Vec<u8> {
        self.world.grid().kinds_as_u8()
    }

    fn chemical(&self) -> Vec<f32> {
        self.world.chemical().data().to_vec()
    }

    fn health(&self) -> Option<Vec<f32>> {
        self.world.health_field().map(|h| h.data().to_vec())
    }

    /// Run `steps` ticks and return the run summary as JSON.
    fn run_experiment_json(&mut self, steps: usize, sample_every: usize) -> PyResult<String> {
        let summary = self
            .world
            .try_run_experiment(steps, sample_every)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        serde_json::to_string(&summary).map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_class::<PySimulation>()?;
    Ok(())
}
