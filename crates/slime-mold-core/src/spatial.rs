use crate::grid::{CellKind, Grid};
use rstar::RTree;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    Manhattan,
    Chebyshev,
    Euclidean,
}

impl DistanceMetric {
    pub fn between(self, dx: i64, dy: i64) -> f32 {
        let (ax, ay) = (dx.unsigned_abs(), dy.unsigned_abs());
        match self {
            DistanceMetric::Manhattan => (ax + ay) as f32,
            DistanceMetric::Chebyshev => ax.max(ay) as f32,
            DistanceMetric::Euclidean => ((ax * ax + ay * ay) as f32).sqrt(),
        }
    }
}

/// Distance from every cell to its nearest food source, memoized once since
/// food never moves. Cells are `f32::INFINITY` when the grid has no food.
#[derive(Clone, Debug, PartialEq)]
pub struct FoodDistances {
    pub manhattan: Vec<f32>,
    pub chebyshev: Vec<f32>,
    pub euclidean: Vec<f32>,
}

impl FoodDistances {
    pub fn build(grid: &Grid) -> Self {
        let food: Vec<[i64; 2]> = grid
            .indices_of(CellKind::Food)
            .into_iter()
            .map(|idx| {
                let (x, y) = grid.coords(idx);
                [x as i64, y as i64]
            })
            .collect();
        Self {
            manhattan: chamfer_transform(grid, &food, DistanceMetric::Manhattan),
            chebyshev: chamfer_transform(grid, &food, DistanceMetric::Chebyshev),
            euclidean: nearest_euclidean(grid, food),
        }
    }

    pub fn get(&self, metric: DistanceMetric, idx: usize) -> f32 {
        match metric {
            DistanceMetric::Manhattan => self.manhattan[idx],
            DistanceMetric::Chebyshev => self.chebyshev[idx],
            DistanceMetric::Euclidean => self.euclidean[idx],
        }
    }
}

/// Exact Euclidean nearest-food distance via an R*-tree of food points.
fn nearest_euclidean(grid: &Grid, food: Vec<[i64; 2]>) -> Vec<f32> {
    if food.is_empty() {
        return vec![f32::INFINITY; grid.len()];
    }
    let tree = RTree::bulk_load(food);
    (0..grid.len())
        .map(|idx| {
            let (x, y) = grid.coords(idx);
            let query = [x as i64, y as i64];
            tree.nearest_neighbor(&query)
                .map(|p| DistanceMetric::Euclidean.between(p[0] - query[0], p[1] - query[1]))
                .unwrap_or(f32::INFINITY)
        })
        .collect()
}

/// Two-pass chamfer distance transform. Exact for L1 with the 4-neighbor
/// mask and for L∞ with the 8-neighbor mask on an unobstructed grid.
fn chamfer_transform(grid: &Grid, food: &[[i64; 2]], metric: DistanceMetric) -> Vec<f32> {
    let (w, h) = (grid.width() as i64, grid.height() as i64);
    let mut dist = vec![f32::INFINITY; grid.len()];
    for p in food {
        dist[grid.index(p[0] as usize, p[1] as usize)] = 0.0;
    }
    if food.is_empty() {
        return dist;
    }

    let forward: &[(i64, i64)] = match metric {
        DistanceMetric::Chebyshev => &[(-1, 0), (-1, -1), (0, -1), (1, -1)],
        _ => &[(-1, 0), (0, -1)],
    };
    let relax = |dist: &mut [f32], x: i64, y: i64, mask: &[(i64, i64)]| {
        let idx = (y * w + x) as usize;
        for &(dx, dy) in mask {
            let (nx, ny) = (x + dx, y + dy);
            if nx >= 0 && ny >= 0 && nx < w && ny < h {
                let candidate = dist[(ny * w + nx) as usize] + 1.0;
                if candidate < dist[idx] {
                    dist[idx] = candidate;
                }
            }
        }
    };

    for y in 0..h {
        for x in 0..w {
            relax(dist.as_mut_slice(), x, y, forward);
        }
    }
    let backward: Vec<(i64, i64)> = forward.iter().map(|&(dx, dy)| (-dx, -dy)).collect();
    for y in (0..h).rev() {
        for x in (0..w).rev() {
            relax(dist.as_mut_slice(), x, y, backward.as_slice());
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha12Rng;

    fn brute_force(grid: &Grid, metric: DistanceMetric) -> Vec<f32> {
        let food = grid.indices_of(CellKind::Food);
        (0..grid.len())
            .map(|idx| {
                let (x, y) = grid.coords(idx);
                food.iter()
                    .map(|&f| {
                        let (fx, fy) = grid.coords(f);
                        metric.between(fx as i64 - x as i64, fy as i64 - y as i64)
                    })
                    .fold(f32::INFINITY, f32::min)
            })
            .collect()
    }

    #[test]
    fn memoized_fields_match_full_scan() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let mut grid = Grid::new(23, 17);
        for _ in 0..4 {
            let x = rng.random_range(0..grid.width());
            let y = rng.random_range(0..grid.height());
            grid.set(x, y, CellKind::Food);
        }
        let distances = FoodDistances::build(&grid);
        for metric in [
            DistanceMetric::Manhattan,
            DistanceMetric::Chebyshev,
            DistanceMetric::Euclidean,
        ] {
            let expected = brute_force(&grid, metric);
            for idx in 0..grid.len() {
                assert!(
                    (distances.get(metric, idx) - expected[idx]).abs() < 1e-5,
                    "{metric:?} mismatch at {idx}"
                );
            }
        }
    }

    #[test]
    fn no_food_yields_infinite_distance() {
        let grid = Grid::new(5, 5);
        let distances = FoodDistances::build(&grid);
        assert!(distances.manhattan.iter().all(|d| d.is_infinite()));
        assert!(distances.euclidean.iter().all(|d| d.is_infinite()));
    }
}
