use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Which growth pass a per-cell stream serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthPass {
    Upkeep = 0,
    Spread = 1,
}

/// Independent random stream for one cell in one pass of one tick.
///
/// Streams are keyed by coordinate rather than visit order, so results are
/// identical whether cells are processed sequentially or in parallel.
pub fn cell_stream(tick_seed: u64, cell_index: usize, pass: GrowthPass) -> ChaCha12Rng {
    let mut rng = ChaCha12Rng::seed_from_u64(tick_seed);
    rng.set_stream(((cell_index as u64) << 1) | pass as u64);
    rng
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn streams_are_reproducible() {
        let a: u64 = cell_stream(9, 41, GrowthPass::Spread).random();
        let b: u64 = cell_stream(9, 41, GrowthPass::Spread).random();
        assert_eq!(a, b);
    }

    #[test]
    fn streams_differ_by_cell_and_pass() {
        let base: u64 = cell_stream(9, 41, GrowthPass::Spread).random();
        let other_cell: u64 = cell_stream(9, 42, GrowthPass::Spread).random();
        let other_pass: u64 = cell_stream(9, 41, GrowthPass::Upkeep).random();
        assert_ne!(base, other_cell);
        assert_ne!(base, other_pass);
    }
}
