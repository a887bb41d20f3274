//! # Counting Bloom filter
//!
//! A Bloom filter variant backed by 8-bit saturating counters (one counter
//! per byte) instead of single bits, so that keys can be deleted as well as
//! inserted. Probe positions are derived from two hash words by double
//! hashing, per the analysis of Kirsch and Mitzenmacher (2006).
//!
//! The sizing follows LevelDB's bloom code, applied to counter slots rather
//! than bits: see [`FilterPlan`].

use crate::errors::{Error, Result};
use crate::hash;
use crate::sizing::FilterPlan;

/// Counters saturate here instead of wrapping
const MAX_COUNTER: u8 = u8::MAX;

/// A fixed-size array of saturating counters addressed by `k` hash probes per
/// key
///
/// ### Notes
///
/// - Construction fixes the size; the filter is never resized or rehashed.
/// - A failed insert or delete may have applied some of its probes before the
///   failing one. That degrades accuracy like any other collision, but never
///   wraps a counter, so filter soundness is preserved.
/// - No internal locking: callers interleaving a reader with a writer must
///   synchronize externally.
#[derive(Debug, Clone)]
pub struct CountingBloomFilter {
    counters: Vec<u8>,
    k: usize,
    seed: u32,
    expected_capacity: u64,
    inserted: u64,
}

impl CountingBloomFilter {
    /// Create a filter over `bytes` counters targeting the given
    /// false-positive probability, hashing with seed family member `seed_id`.
    pub fn new(bytes: u64, false_positive: f64, seed_id: u32) -> Result<CountingBloomFilter> {
        if bytes == 0 {
            return Err(Error::InvalidConfig("filter byte budget must be nonzero"));
        }
        let seed = hash::seed_for_id(seed_id)?;
        let plan = FilterPlan::for_budget(bytes, false_positive);
        Ok(CountingBloomFilter {
            counters: vec![0; bytes as usize],
            k: plan.k,
            seed,
            expected_capacity: plan.expected_capacity,
            inserted: 0,
        })
    }

    /// How many keys the filter was planned to hold
    pub fn expected_capacity(&self) -> u64 {
        self.expected_capacity
    }

    /// How many keys are currently counted as inserted
    pub fn inserted_count(&self) -> u64 {
        self.inserted
    }

    /// Backing storage in bytes
    pub fn memory_usage(&self) -> u64 {
        self.counters.len() as u64
    }

    /// Hash probes per operation
    pub fn probe_count(&self) -> usize {
        self.k
    }

    /// Increment the `k` probed counters for `key`.
    ///
    /// Fails with [`Error::CounterSaturated`] if a probed counter is already
    /// at its maximum, and with [`Error::FilterOverloaded`] once the inserted
    /// count passes twice the planned capacity. In the overloaded case the
    /// key HAS been inserted and remains visible to [`may_contain`]; the
    /// error tells the caller the filter should be rebuilt larger.
    ///
    /// [`may_contain`]: CountingBloomFilter::may_contain
    pub fn insert(&mut self, key: u64) -> Result<()> {
        let [mut h, delta, ..] = hash::hash_u64(key, self.seed);
        for _ in 0..self.k {
            let idx = h as usize % self.counters.len();
            let slot = &mut self.counters[idx];
            if *slot == MAX_COUNTER {
                return Err(Error::CounterSaturated);
            }
            *slot += 1;
            h = h.wrapping_add(delta);
        }
        self.inserted += 1;
        if self.inserted > self.expected_capacity * 2 {
            return Err(Error::FilterOverloaded {
                inserted: self.inserted,
                expected: self.expected_capacity,
            });
        }
        Ok(())
    }

    /// Decrement the `k` probed counters for `key`, undoing one insert.
    ///
    /// A probed counter already at zero means the key was never inserted (or
    /// was deleted more times than inserted): the operation stops at that
    /// probe with [`Error::CounterUnderflow`] and never wraps the counter.
    pub fn delete(&mut self, key: u64) -> Result<()> {
        let [mut h, delta, ..] = hash::hash_u64(key, self.seed);
        for _ in 0..self.k {
            let idx = h as usize % self.counters.len();
            let slot = &mut self.counters[idx];
            if *slot == 0 {
                return Err(Error::CounterUnderflow);
            }
            *slot -= 1;
            h = h.wrapping_add(delta);
        }
        self.inserted = self.inserted.saturating_sub(1);
        Ok(())
    }

    /// Could `key` have been inserted? False on any zeroed probe; never a
    /// false negative for a key that was inserted and not deleted.
    pub fn may_contain(&self, key: u64) -> bool {
        if self.counters.len() < 2 {
            return false;
        }
        let [mut h, delta, ..] = hash::hash_u64(key, self.seed);
        for _ in 0..self.k {
            if self.counters[h as usize % self.counters.len()] == 0 {
                return false;
            }
            h = h.wrapping_add(delta);
        }
        true
    }
}

/* -------------------- Unit Tests -------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_budget_is_rejected() {
        assert_eq!(
            CountingBloomFilter::new(0, 0.01, 0).unwrap_err(),
            Error::InvalidConfig("filter byte budget must be nonzero")
        );
    }

    #[test]
    fn bad_seed_id_is_rejected() {
        assert_eq!(
            CountingBloomFilter::new(1024, 0.01, 12).unwrap_err(),
            Error::InvalidSeedId(12)
        );
    }

    #[test]
    fn insert_then_lookup() {
        let mut filter = CountingBloomFilter::new(1024, 0.01, 0).unwrap();
        filter.insert(42).unwrap();
        assert!(filter.may_contain(42));
        assert_eq!(filter.inserted_count(), 1);
    }

    #[test]
    fn degenerate_budget_never_matches() {
        let mut filter = CountingBloomFilter::new(1, 0.01, 0).unwrap();
        filter.insert(42).unwrap();
        assert!(!filter.may_contain(42));
    }

    #[test]
    fn delete_restores_counters_exactly() {
        let mut filter = CountingBloomFilter::new(1024, 0.01, 0).unwrap();
        filter.insert(7).unwrap();
        let baseline = filter.counters.clone();
        filter.insert(99).unwrap();
        filter.delete(99).unwrap();
        assert_eq!(filter.counters, baseline);
        assert_eq!(filter.inserted_count(), 1);
    }

    #[test]
    fn delete_makes_sole_key_invisible() {
        let mut filter = CountingBloomFilter::new(1024, 0.01, 0).unwrap();
        filter.insert(7).unwrap();
        filter.delete(7).unwrap();
        assert!(!filter.may_contain(7));
        assert!(filter.counters.iter().all(|&c| c == 0));
    }

    #[test]
    fn underflow_is_reported_and_harmless() {
        let mut filter = CountingBloomFilter::new(1024, 0.01, 0).unwrap();
        assert_eq!(filter.delete(42).unwrap_err(), Error::CounterUnderflow);
        assert!(filter.counters.iter().all(|&c| c == 0));
        assert_eq!(filter.inserted_count(), 0);
    }

    #[test]
    fn repeated_inserts_saturate_a_counter() {
        let mut filter = CountingBloomFilter::new(1024, 0.01, 0).unwrap();
        let mut failure = None;
        for round in 0..=MAX_COUNTER as u32 {
            if let Err(e) = filter.insert(5) {
                failure = Some((round, e));
                break;
            }
        }
        let (round, error) = failure.expect("a probed counter must saturate within 256 inserts");
        assert_eq!(error, Error::CounterSaturated);
        assert!(round > 0, "the first insert must succeed");
        // Once saturated, the same key keeps failing
        assert_eq!(filter.insert(5).unwrap_err(), Error::CounterSaturated);
    }

    #[test]
    fn overload_fires_past_twice_expected_capacity() {
        let mut filter = CountingBloomFilter::new(64, 0.01, 0).unwrap();
        let capacity = filter.expected_capacity();
        assert_eq!(capacity, 9);
        for key in 0..capacity * 2 {
            filter.insert(key).unwrap();
        }
        let overflow_key = capacity * 2;
        assert_eq!(
            filter.insert(overflow_key).unwrap_err(),
            Error::FilterOverloaded {
                inserted: capacity * 2 + 1,
                expected: capacity,
            }
        );
        // The overloaded insert still took effect
        assert!(filter.may_contain(overflow_key));
        assert_eq!(filter.inserted_count(), capacity * 2 + 1);
    }
}
