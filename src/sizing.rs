//! Capacity planning and per-level space allocation.

use std::f64::consts::LN_2;

/// Floor on the byte budget handed to any single level, so that coarse levels
/// never degenerate into uselessly small filters
pub const MIN_LEVEL_BYTES: u64 = 1024;

/// Hash probes per key are clamped to this many
pub const MAX_PROBES: usize = 30;

/// Sizing derived from a byte budget and a target false-positive rate
///
/// This is the standard Bloom-filter optimal-k derivation applied to counter
/// slots instead of bits: one 8-bit counter per byte of budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPlan {
    /// Number of counter slots (= bytes of budget)
    pub counters: u64,
    /// How many distinct keys the filter is expected to hold at the target
    /// false-positive rate
    pub expected_capacity: u64,
    /// Number of hash probes per operation, in `1..=MAX_PROBES`
    pub k: usize,
}

impl FilterPlan {
    /// Plan a filter for `bytes` of budget and a target false-positive
    /// probability in `(0, 1)`.
    pub fn for_budget(bytes: u64, false_positive: f64) -> FilterPlan {
        let counters = bytes;
        // n = m * ln(2) / -ln(p), clamped so the integer division below is
        // defined even for budgets too small to hold a single key
        let expected_capacity =
            (((counters as f64 * LN_2) / -false_positive.ln()) as u64).max(1);
        let slots_per_key = counters / expected_capacity;
        // Round down to keep probing cost low, as LevelDB's bloom code does
        let k = (slots_per_key as f64 * LN_2) as usize;
        FilterPlan {
            counters,
            expected_capacity,
            k: k.clamp(1, MAX_PROBES),
        }
    }
}

/// Partition `total_bytes` across `levels` filters, coarsest first.
///
/// `beta == 1` splits evenly. Otherwise the finest (last) level is sized as
/// `total * (1 - beta) / (1 - beta^levels)` and each coarser level decays by
/// another factor of `beta`, floored at [`MIN_LEVEL_BYTES`]. Finer levels
/// carry more distinct prefixes, so they get the larger share.
pub fn allocate_levels(total_bytes: u64, beta: f64, levels: usize) -> Vec<u64> {
    if beta == 1.0 {
        return vec![total_bytes / levels as u64; levels];
    }
    let finest = total_bytes as f64 * (1.0 - beta) / (1.0 - beta.powi(levels as i32));
    (0..levels)
        .map(|i| {
            let distance = (levels - 1 - i) as i32;
            MIN_LEVEL_BYTES.max((finest * beta.powi(distance)) as u64)
        })
        .collect()
}

/* -------------------- Unit Tests -------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_for_one_kib_at_one_percent() {
        let plan = FilterPlan::for_budget(1024, 0.01);
        assert_eq!(plan.counters, 1024);
        assert_eq!(plan.expected_capacity, 154);
        assert_eq!(plan.k, 4);
    }

    #[test]
    fn plan_for_tiny_budget() {
        let plan = FilterPlan::for_budget(64, 0.01);
        assert_eq!(plan.expected_capacity, 9);
        assert_eq!(plan.k, 4);
    }

    #[test]
    fn k_is_clamped_to_bounds() {
        // Very loose target: fewer slots than keys, k would round to 0
        assert_eq!(FilterPlan::for_budget(1024, 0.9).k, 1);
        // Very tight target: k would exceed the probe cap
        assert_eq!(FilterPlan::for_budget(1024, 1e-14).k, MAX_PROBES);
    }

    #[test]
    fn capacity_is_monotone_in_budget() {
        let mut previous = 0;
        for bytes in (64..=65536).step_by(64) {
            let plan = FilterPlan::for_budget(bytes, 0.01);
            assert!(plan.expected_capacity >= previous);
            previous = plan.expected_capacity;
        }
    }

    #[test]
    fn even_split_when_beta_is_one() {
        let sizes = allocate_levels(16 * 1024, 1.0, 16);
        assert_eq!(sizes, vec![1024; 16]);
    }

    #[test]
    fn geometric_decay_with_floor() {
        let sizes = allocate_levels(8 * 1024 * 1024, 0.5, 16);
        assert_eq!(sizes.len(), 16);
        // Finest level gets the largest share, roughly half the total
        assert!(*sizes.last().unwrap() >= 4 * 1024 * 1024);
        // Sizes never decrease from coarse to fine
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        // Coarsest levels bottom out at the floor rather than vanishing
        assert_eq!(sizes[0], MIN_LEVEL_BYTES);
        for &size in &sizes {
            assert!(size >= MIN_LEVEL_BYTES);
        }
    }

    #[test]
    fn adjacent_levels_decay_by_beta_above_the_floor() {
        let sizes = allocate_levels(8 * 1024 * 1024, 0.5, 16);
        for w in sizes.windows(2) {
            if w[0] > MIN_LEVEL_BYTES {
                // Integer truncation allows off-by-one
                assert!(w[1] / w[0] == 2 || (w[1] + 1) / w[0] == 2);
            }
        }
    }
}
