//! Error types for filter construction and mutation.

use thiserror::Error;

/// Possible errors for the range filter and its per-level counting filters
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// An insert probe hit a counter already at its maximum value; the filter
    /// should be rebuilt with a larger budget
    #[error("counter saturated at maximum value, filter over capacity")]
    CounterSaturated,

    /// The number of inserted keys passed twice the planned capacity. The
    /// triggering key was still inserted; accuracy degrades from here on.
    #[error("inserted {inserted} keys, over twice the planned capacity of {expected}")]
    FilterOverloaded { inserted: u64, expected: u64 },

    /// A delete probe hit a counter already at zero: the key was never
    /// inserted, or was deleted more times than it was inserted
    #[error("counter underflow on delete: key was not present")]
    CounterUnderflow,

    /// Hash seed id outside the supported family
    #[error("invalid hash seed id {0}, must be in 0..=11")]
    InvalidSeedId(u32),

    /// Construction parameters rejected
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
