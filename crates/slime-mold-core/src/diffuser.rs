use crate::config::MAX_HEALTH;
use crate::field::ScalarField;
use crate::grid::{CellKind, Grid};
use rayon::prelude::*;
use tracing::warn;

/// How mold cells modulate transport relative to empty cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoldTransport {
    /// Constant multipliers on the base rates.
    Fixed {
        diffusion_scale: f32,
        evaporation_scale: f32,
    },
    /// Multipliers interpolated between `[at health 0, at health 100]`.
    HealthScaled {
        diffusion_scale: [f32; 2],
        evaporation_scale: [f32; 2],
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffusionParams {
    pub diffusion_rate: f32,
    pub evaporation_rate: f32,
    pub ceiling: f32,
    pub mold: MoldTransport,
}

impl DiffusionParams {
    /// (diffusion, evaporation) factors for a transporting cell.
    fn coefficients(&self, kind: CellKind, health: f32) -> (f32, f32) {
        if kind != CellKind::Mold {
            return (self.diffusion_rate, self.evaporation_rate);
        }
        match self.mold {
            MoldTransport::Fixed {
                diffusion_scale,
                evaporation_scale,
            } => (
                self.diffusion_rate * diffusion_scale,
                self.evaporation_rate * evaporation_scale,
            ),
            MoldTransport::HealthScaled {
                diffusion_scale,
                evaporation_scale,
            } => {
                let t = if health.is_finite() {
                    (health / MAX_HEALTH).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let lerp = |[lo, hi]: [f32; 2]| lo + (hi - lo) * t;
                (
                    self.diffusion_rate * lerp(diffusion_scale),
                    self.evaporation_rate * lerp(evaporation_scale),
                )
            }
        }
    }
}

/// One explicit reaction-diffusion step over the interior of the grid.
///
/// Reads only `chemical` and writes a fresh field, so rows are processed in
/// parallel. Border cells are carried over unchanged, food is frozen and
/// obstacles are forced to zero everywhere.
pub fn diffuse(
    chemical: &ScalarField,
    grid: &Grid,
    health: Option<&ScalarField>,
    params: &DiffusionParams,
) -> ScalarField {
    let w = grid.width();
    let src = chemical.data();
    let kinds = grid.cells();
    let mut next = chemical.clone();

    let guarded: usize = next
        .data_mut()
        .par_chunks_mut(w)
        .enumerate()
        .map(|(y, row)| {
            let mut guarded = 0usize;
            for (x, out) in row.iter_mut().enumerate() {
                let idx = y * w + x;
                match kinds[idx] {
                    CellKind::Obstacle => {
                        *out = 0.0;
                        continue;
                    }
                    CellKind::Food => continue,
                    _ => {}
                }
                if !grid.is_interior(x, y) {
                    continue;
                }

                let current = src[idx];
                if !current.is_finite() {
                    *out = 0.0;
                    guarded += 1;
                    continue;
                }
                let cell_health = health.map(|f| f.data()[idx]).unwrap_or(0.0);
                let (diffusion, evaporation) = params.coefficients(kinds[idx], cell_health);
                let retained = current * (1.0 - evaporation);

                let laplacian =
                    src[idx - w] + src[idx + w] + src[idx - 1] + src[idx + 1] - 4.0 * current;
                let value = if laplacian.is_finite() {
                    retained + diffusion * laplacian
                } else {
                    guarded += 1;
                    retained
                };
                *out = value.clamp(0.0, params.ceiling);
            }
            guarded
        })
        .sum();

    if guarded > 0 {
        warn!(cells = guarded, "non-finite chemical replaced by pure decay");
    }
    next
}
