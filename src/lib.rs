//! # Rosetta range filter
//!
//! A compact probabilistic index answering "could any stored key fall in
//! `[low, high]`?" with one-sided error, built to sit in front of
//! range-partitioned storage (an LSM-tree level, say) and prune reads that
//! cannot match. False positives happen at a configurable rate; false
//! negatives never do.
//!
//! The structure layers one counting Bloom filter per prefix width of a
//! 64-bit key and answers range queries by branch-and-bound over that prefix
//! hierarchy, as described in _Rosetta: A Robust Space-Time Optimized Range
//! Filter for Key-Value Stores_ (Luo et. al.). Counting filters (8-bit
//! saturating counters instead of bits) make keys deletable, at the price of
//! reporting [`Error::CounterSaturated`] / [`Error::CounterUnderflow`] when
//! a filter is pushed past its budget.
//!
//! Nothing here locks: every operation is synchronous and bounded, and a
//! filter embedded under concurrent access needs external synchronization
//! (exclusive for [`Rosetta::insert_key`] / [`Rosetta::delete_key`], shared
//! for reads) or copy-on-write per compaction epoch.

mod errors;
mod filter;
mod hash;
mod murmur3;
mod rosetta;
mod sizing;

pub use errors::{Error, Result};
pub use filter::CountingBloomFilter;
pub use hash::{seed_for_id, SEED_COUNT};
pub use murmur3::murmur3_x86_128;
pub use rosetta::Rosetta;
pub use sizing::{allocate_levels, FilterPlan, MAX_PROBES, MIN_LEVEL_BYTES};
