use serde::{Deserialize, Serialize};

/// What occupies a grid position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CellKind {
    #[default]
    Empty = 0,
    Mold = 1,
    Food = 2,
    Obstacle = 3,
}

impl CellKind {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Food and obstacles are placed once and never change kind.
    pub fn is_fixed(self) -> bool {
        matches!(self, CellKind::Food | CellKind::Obstacle)
    }
}

/// Dense row-major `width × height` matrix of cell kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellKind::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// True when the cell has a full 4-neighborhood inside the grid.
    #[inline]
    pub fn is_interior(&self, x: usize, y: usize) -> bool {
        x > 0 && y > 0 && x + 1 < self.width && y + 1 < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<CellKind> {
        (x < self.width && y < self.height).then(|| self.cells[self.index(x, y)])
    }

    pub fn set(&mut self, x: usize, y: usize, kind: CellKind) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells[idx] = kind;
        }
    }

    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [CellKind] {
        &mut self.cells
    }

    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&k| k == kind).count()
    }

    /// Indices of all cells of `kind`, in row-major order.
    pub fn indices_of(&self, kind: CellKind) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(idx, &k)| (k == kind).then_some(idx))
            .collect()
    }

    /// In-bounds axis-adjacent neighbors as (x, y, index), ordered up, down, left, right.
    pub fn axis_neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        const OFFSETS: [(i64, i64); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
        OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            self.in_bounds(nx, ny).then(|| {
                let (nx, ny) = (nx as usize, ny as usize);
                (nx, ny, self.index(nx, ny))
            })
        })
    }

    pub fn kinds_as_u8(&self) -> Vec<u8> {
        self.cells.iter().map(|k| k.as_u8()).collect()
    }
}
