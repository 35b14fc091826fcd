//! Shared fixtures for the AlgoScope scenario tests in `tests/`.

use algoscope_array::{ArrayEngine, ArrayTiming, RandomConfig};
use algoscope_store::{StoreConfig, Visualizer};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Unsorted input used across the sort scenarios.
pub const SORT_INPUT: [i64; 7] = [64, 34, 25, 12, 22, 11, 90];

/// The same input in ascending order.
pub const SORT_OUTPUT: [i64; 7] = [11, 12, 22, 25, 34, 64, 90];

pub const SEARCH_INPUT: [i64; 4] = [5, 3, 8, 1];

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Engine holding `array` with zero-delay stages.
pub fn engine_with(array: &[i64]) -> ArrayEngine {
    ArrayEngine::with_config(ArrayTiming::immediate(), RandomConfig::default())
        .with_array(array.to_vec())
}

/// Store config with a fast tick and immediate array stages.
pub fn fast_config() -> StoreConfig {
    StoreConfig::default()
        .with_base_interval(std::time::Duration::from_millis(10))
        .with_array_timing(ArrayTiming::immediate())
}

/// Fire pending timers until the visualizer wants none, up to `limit`.
/// Returns how many fired.
pub fn drain<V: Visualizer>(visualizer: &mut V, limit: usize) -> usize {
    let mut fired = 0;
    while fired < limit {
        let Some((token, _)) = visualizer.pending_timer() else {
            break;
        };
        visualizer.fire(token);
        fired += 1;
    }
    fired
}
