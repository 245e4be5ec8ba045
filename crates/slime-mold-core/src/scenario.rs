use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grid position; `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ObstacleRegion {
    #[default]
    None,
    Rect {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    Cells { cells: Vec<Coord> },
}

impl ObstacleRegion {
    pub fn cells(&self) -> Vec<Coord> {
        match self {
            ObstacleRegion::None => Vec::new(),
            ObstacleRegion::Rect {
                x,
                y,
                width,
                height,
            } => (*y..y.saturating_add(*height))
                .flat_map(|row| {
                    (*x..x.saturating_add(*width)).map(move |col| Coord::new(col, row))
                })
                .collect(),
            ObstacleRegion::Cells { cells } => cells.clone(),
        }
    }
}

/// Initial placement of food, the mold seed and obstacles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub food: Vec<Coord>,
    pub mold_seed: Coord,
    #[serde(default)]
    pub obstacles: ObstacleRegion,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("scenario must place at least one food source")]
    NoFood,
    #[error("{what} at ({}, {}) lies outside the {width}x{height} grid", .at.x, .at.y)]
    OutOfBounds {
        what: &'static str,
        at: Coord,
        width: usize,
        height: usize,
    },
    #[error("obstacle rectangle must have non-zero width and height")]
    EmptyObstacleRect,
    #[error("{what} at ({}, {}) overlaps an obstacle", .at.x, .at.y)]
    OnObstacle { what: &'static str, at: Coord },
    #[error("mold seed at ({}, {}) overlaps a food source", .at.x, .at.y)]
    SeedOnFood { at: Coord },
}

impl Scenario {
    /// Two food sources on the middle row, a seed five rows above the centre
    /// and a 20-cell obstacle band through the centre.
    pub fn classic(width: usize, height: usize) -> Self {
        let mid_row = height / 2;
        let band_start = (width / 2).saturating_sub(10);
        let band_end = (width / 2 + 10).min(width);
        Self {
            food: vec![
                Coord::new(width / 4, mid_row),
                Coord::new(3 * width / 4, mid_row),
            ],
            mold_seed: Coord::new(width / 2, mid_row.saturating_sub(5)),
            obstacles: ObstacleRegion::Rect {
                x: band_start,
                y: mid_row,
                width: band_end - band_start,
                height: 1,
            },
        }
    }

    pub fn validate(&self, width: usize, height: usize) -> Result<(), ScenarioError> {
        let check = |what: &'static str, at: Coord| {
            if at.x < width && at.y < height {
                Ok(())
            } else {
                Err(ScenarioError::OutOfBounds {
                    what,
                    at,
                    width,
                    height,
                })
            }
        };

        if self.food.is_empty() {
            return Err(ScenarioError::NoFood);
        }
        for &food in &self.food {
            check("food", food)?;
        }
        check("mold seed", self.mold_seed)?;

        if let ObstacleRegion::Rect {
            x,
            y,
            width: w,
            height: h,
        } = self.obstacles
        {
            if w == 0 || h == 0 {
                return Err(ScenarioError::EmptyObstacleRect);
            }
            check("obstacle", Coord::new(x, y))?;
            // Saturates past the grid on overflow, so the bounds check rejects it.
            let far = Coord::new(x.saturating_add(w - 1), y.saturating_add(h - 1));
            check("obstacle", far)?;
        }
        let obstacles = self.obstacles.cells();
        for &cell in &obstacles {
            check("obstacle", cell)?;
        }

        if obstacles.contains(&self.mold_seed) {
            return Err(ScenarioError::OnObstacle {
                what: "mold seed",
                at: self.mold_seed,
            });
        }
        if let Some(&food) = self.food.iter().find(|f| obstacles.contains(f)) {
            return Err(ScenarioError::OnObstacle {
                what: "food",
                at: food,
            });
        }
        if self.food.contains(&self.mold_seed) {
            return Err(ScenarioError::SeedOnFood { at: self.mold_seed });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_layout_is_valid() {
        let scenario = Scenario::classic(100, 80);
        assert_eq!(scenario.food, vec![Coord::new(25, 40), Coord::new(75, 40)]);
        assert_eq!(scenario.mold_seed, Coord::new(50, 35));
        assert_eq!(scenario.obstacles.cells().len(), 20);
        assert_eq!(scenario.validate(100, 80), Ok(()));
    }

    #[test]
    fn rejects_food_outside_grid() {
        let scenario = Scenario {
            food: vec![Coord::new(9, 2)],
            mold_seed: Coord::new(1, 1),
            obstacles: ObstacleRegion::None,
        };
        assert!(matches!(
            scenario.validate(9, 9),
            Err(ScenarioError::OutOfBounds { what: "food", .. })
        ));
    }

    #[test]
    fn rejects_obstacle_rect_with_overflowing_extent() {
        let scenario = Scenario {
            food: vec![Coord::new(0, 0)],
            mold_seed: Coord::new(1, 1),
            obstacles: ObstacleRegion::Rect {
                x: 2,
                y: 2,
                width: usize::MAX,
                height: 1,
            },
        };
        assert!(matches!(
            scenario.validate(9, 9),
            Err(ScenarioError::OutOfBounds { what: "obstacle", .. })
        ));
    }

    #[test]
    fn rejects_seed_on_obstacle() {
        let scenario = Scenario {
            food: vec![Coord::new(0, 0)],
            mold_seed: Coord::new(3, 3),
            obstacles: ObstacleRegion::Rect {
                x: 2,
                y: 3,
                width: 4,
                height: 1,
            },
        };
        assert_eq!(
            scenario.validate(9, 9),
            Err(ScenarioError::OnObstacle {
                what: "mold seed",
                at: Coord::new(3, 3)
            })
        );
    }

    #[test]
    fn rejects_rect_past_edge() {
        let scenario = Scenario {
            food: vec![Coord::new(0, 0)],
            mold_seed: Coord::new(1, 1),
            obstacles: ObstacleRegion::Rect {
                x: 5,
                y: 5,
                width: 6,
                height: 1,
            },
        };
        assert!(matches!(
            scenario.validate(9, 9),
            Err(ScenarioError::OutOfBounds { what: "obstacle", .. })
        ));
    }

    #[test]
    fn rejects_missing_food_and_seed_on_food() {
        let mut scenario = Scenario {
            food: Vec::new(),
            mold_seed: Coord::new(1, 1),
            obstacles: ObstacleRegion::None,
        };
        assert_eq!(scenario.validate(5, 5), Err(ScenarioError::NoFood));
        scenario.food.push(Coord::new(1, 1));
        assert!(matches!(
            scenario.validate(5, 5),
            Err(ScenarioError::SeedOnFood { .. })
        ));
    }

    #[test]
    fn obstacle_cells_deserialize_from_json() {
        let json = r#"{"food":[{"x":1,"y":1}],"mold_seed":{"x":3,"y":3},
            "obstacles":{"kind":"cells","cells":[{"x":2,"y":2}]}}"#;
        let scenario: Scenario = serde_json::from_str(json).expect("valid scenario");
        assert_eq!(scenario.obstacles.cells(), vec![Coord::new(2, 2)]);
    }
}
