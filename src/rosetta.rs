//! # Multi-level range filter
//!
//! This implementation is based on the design in _Rosetta: A Robust
//! Space-Time Optimized Range Filter for Key-Value Stores_, by Luo et. al.
//!
//! One counting Bloom filter is kept per prefix width: level `i` indexes the
//! top `(i + 1) * alpha` bits of every inserted 64-bit key, with the lower
//! bits masked to zero, so each prefix interval is represented by its lower
//! bound. A range query runs branch-and-bound over that prefix hierarchy:
//! cells of the key space fully covered by the query are checked for
//! plausible existence ([`Rosetta::range_query`]), partially covered cells
//! are refined one level finer, and a negative filter probe prunes a whole
//! subtree.

use crate::errors::{Error, Result};
use crate::filter::CountingBloomFilter;
use crate::hash;
use crate::sizing::allocate_levels;

/// A probabilistic index answering "could any stored key fall in
/// `[low, high]`?" with one-sided error: false positives are possible, false
/// negatives are not.
///
/// ### Notes
///
/// - Levels are allocated once at construction and never resized.
/// - All operations are synchronous and bounded by `k × level_count` filter
///   probes; there is no internal locking, so concurrent writers (or a reader
///   overlapping a writer) need external synchronization.
#[derive(Debug, Clone)]
pub struct Rosetta {
    /// Index 0 is the coarsest prefix, the last entry indexes full keys
    levels: Vec<CountingBloomFilter>,
    /// Key bits consumed per level; divides 64
    alpha: u32,
}

impl Rosetta {
    /// Build a filter from a total byte budget, a per-level prefix width
    /// `alpha` (must evenly divide 64), a space-decay ratio `beta` in
    /// `(0, 1]`, and a per-level false-positive target in `(0, 1)`.
    pub fn new(total_bytes: u64, alpha: u32, beta: f64, false_positive: f64) -> Result<Rosetta> {
        if alpha == 0 || 64 % alpha != 0 {
            return Err(Error::InvalidConfig("alpha must evenly divide 64"));
        }
        if !(beta > 0.0 && beta <= 1.0) {
            return Err(Error::InvalidConfig("beta must be in (0, 1]"));
        }
        if !(false_positive > 0.0 && false_positive < 1.0) {
            return Err(Error::InvalidConfig(
                "false positive target must be in (0, 1)",
            ));
        }
        if total_bytes == 0 {
            return Err(Error::InvalidConfig("total byte budget must be nonzero"));
        }
        let level_count = (64 / alpha) as usize;
        let sizes = allocate_levels(total_bytes, beta, level_count);
        let mut levels = Vec::with_capacity(level_count);
        for (i, &bytes) in sizes.iter().enumerate() {
            // The seed family has twelve members; with more than twelve
            // levels ids wrap, which is safe because levels a full family
            // apart index disjoint prefix widths.
            levels.push(CountingBloomFilter::new(
                bytes,
                false_positive,
                i as u32 % hash::SEED_COUNT,
            )?);
        }
        Ok(Rosetta { levels, alpha })
    }

    /// Number of prefix levels (`64 / alpha`)
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Planned key capacity of the finest level
    pub fn expected_capacity(&self) -> u64 {
        self.levels[self.levels.len() - 1].expected_capacity()
    }

    /// Keys currently counted as inserted
    pub fn inserted_count(&self) -> u64 {
        self.levels[self.levels.len() - 1].inserted_count()
    }

    /// Total counter storage across all levels, in bytes
    pub fn memory_usage(&self) -> u64 {
        self.levels.iter().map(|l| l.memory_usage()).sum()
    }

    /// Insert `key`, registering one masked prefix per level.
    ///
    /// Capacity signals from individual levels ([`Error::FilterOverloaded`],
    /// [`Error::CounterSaturated`]) are advisory: every remaining level
    /// still receives the key, and the first signal is reported once the
    /// cascade completes. An overloaded level has applied the key in full
    /// and a saturated counter stays nonzero, so membership and range
    /// queries remain sound; the signal means the filter should be rebuilt
    /// with a larger budget.
    pub fn insert_key(&mut self, key: u64) -> Result<()> {
        let alpha = self.alpha;
        let level_count = self.levels.len();
        let mut mask = 0u64;
        let mut capacity_signal = None;
        for (i, level) in self.levels.iter_mut().enumerate() {
            mask |= Self::prefix_bits(alpha) << ((level_count - i - 1) as u32 * alpha);
            // Stopping here would drop the key from the finer levels,
            // including the finest one that point lookups answer from
            if let Err(e) = level.insert(key & mask) {
                capacity_signal.get_or_insert(e);
            }
        }
        match capacity_signal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Delete `key`, unregistering one masked prefix per level.
    pub fn delete_key(&mut self, key: u64) -> Result<()> {
        let alpha = self.alpha;
        let level_count = self.levels.len();
        let mut mask = 0u64;
        for (i, level) in self.levels.iter_mut().enumerate() {
            mask |= Self::prefix_bits(alpha) << ((level_count - i - 1) as u32 * alpha);
            level.delete(key & mask)?;
        }
        Ok(())
    }

    /// Could `key` itself have been inserted? Probes the finest level only.
    pub fn lookup_key(&self, key: u64) -> bool {
        self.levels[self.levels.len() - 1].may_contain(key)
    }

    /// Could any stored key fall in the closed range `[low, high]`?
    pub fn range_query(&self, low: u64, high: u64) -> bool {
        if low > high {
            return false;
        }
        // The sibling scan's half-open cells cap at u64::MAX, which would
        // leave the topmost key unreachable when the query collapses onto
        // it; probe the finest level directly instead
        if low == u64::MAX {
            return self.lookup_key(u64::MAX);
        }
        self.search(low, high, 0, 0)
    }

    /// An `alpha`-bit mask in the low bits, ready to shift into position
    fn prefix_bits(alpha: u32) -> u64 {
        u64::MAX >> (64 - alpha)
    }

    /// Scan the `2^alpha` sibling cells under `prefix` at `level`, in
    /// increasing address order. Cells are half-open `[cur, next)`: a query
    /// bound exactly at `next` does not overlap the cell.
    fn search(&self, low: u64, high: u64, prefix: u64, level: usize) -> bool {
        let finest = level == self.levels.len() - 1;
        let width_shift = (self.levels.len() - level - 1) as u32 * self.alpha;
        let last = Self::prefix_bits(self.alpha);
        for i in 0..=last {
            let cur = prefix + (i << width_shift);
            // The topmost cell at every level caps at the end of the key
            // space instead of overflowing
            let next = match cur.checked_add(1 << width_shift) {
                Some(n) => n,
                None => u64::MAX,
            };
            if low >= next {
                continue;
            }
            if cur > high {
                break;
            }
            // Fully covered cells cannot be pruned by refining the prefix
            // any further, so probe them directly. A finest-level cell holds
            // the single key `cur`, so any overlap is full coverage there.
            if low <= cur && (next <= high || finest) {
                if self.doubt(cur, level) {
                    return true;
                }
                continue;
            }
            if self.search(low, high, cur, level + 1) {
                return true;
            }
        }
        false
    }

    /// Could a key with prefix `cell_low` plausibly exist at `level`'s
    /// granularity? A negative probe prunes; a positive one must be
    /// confirmed one level finer unless this is already the finest.
    fn doubt(&self, cell_low: u64, level: usize) -> bool {
        if !self.levels[level].may_contain(cell_low) {
            return false;
        }
        if level == self.levels.len() - 1 {
            return true;
        }
        let child_shift = (self.levels.len() - level - 2) as u32 * self.alpha;
        let last = Self::prefix_bits(self.alpha);
        for i in 0..=last {
            if self.doubt(cell_low + (i << child_shift), level + 1) {
                return true;
            }
        }
        false
    }
}

/* -------------------- Unit Tests -------------------- */
