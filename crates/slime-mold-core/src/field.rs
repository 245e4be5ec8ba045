/// Dense row-major scalar field matching the grid's dimensions.
/// Backs both the chemical attractant and the mold health matrices.

#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl ScalarField {
    pub fn new(width: usize, height: usize, initial_value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![initial_value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[y * self.width + x] = value;
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Raise the value at `idx` to at least `value`.
    pub(crate) fn raise_to(&mut self, idx: usize, value: f32) {
        let slot = &mut self.data[idx];
        *slot = slot.max(value);
    }

    pub fn total(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }

    pub fn all_within(&self, lo: f32, hi: f32) -> bool {
        self.data
            .iter()
            .all(|v| v.is_finite() && (lo..=hi).contains(v))
    }
}
