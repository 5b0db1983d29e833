//! Deterministic per-task random streams.
//!
//! Every rolling task (a model fit or a prior draw) owns a generator derived
//! from the run's base seed and the task's window start index, so results
//! never depend on which worker ran a task or in which order.
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generator for task `stream` under `seed`.
#[inline]
pub fn stream_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// Seed handed to the fit of the window starting at `start`.
#[inline]
pub fn window_seed(seed: u64, start: usize) -> u64 {
    stream_rng(seed, start as u64).next_u64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Window seeds are reproducible and differ across windows and base seeds.
    //
    // Given
    // -----
    // - Base seeds 0 and 1, starts 0..50.
    //
    // Expect
    // ------
    // - Repeated calls agree; no collisions among the 100 seeds.
    fn window_seeds_are_stable_and_distinct() {
        let mut seen = std::collections::HashSet::new();
        for base in [0_u64, 1] {
            for start in 0..50 {
                let s = window_seed(base, start);
                assert_eq!(s, window_seed(base, start));
                assert!(seen.insert(s), "collision at base {base}, start {start}");
            }
        }
    }
}
