//! Seed selection for the per-level hash functions.
//!
//! Sibling filters at different prefix widths must collide independently, so
//! each one hashes with a different member of a fixed twelve-seed family.

use crate::errors::{Error, Result};
use crate::murmur3::murmur3_x86_128;

/// Fixed seed family, one entry per supported seed id
const SEEDS: [u32; 12] = [
    0xbc9f1d34, 0x34f1d34b, 0x251d34bc, 0x01d34bc9, 0x1934bc9f, 0x934bc9f1,
    0x4bc9f193, 0x51c2578a, 0xda23562f, 0x135254f2, 0xea1e4a48, 0x567925f1,
];

/// Number of seeds in the family
pub const SEED_COUNT: u32 = SEEDS.len() as u32;

/// Resolve a seed id to its seed constant. Ids outside `0..SEED_COUNT` are a
/// caller error.
pub fn seed_for_id(id: u32) -> Result<u32> {
    SEEDS
        .get(id as usize)
        .copied()
        .ok_or(Error::InvalidSeedId(id))
}

/// Hash a key's 8-byte little-endian representation, returning four 32-bit
/// words. The first two are used as `(h0, delta)` for double hashing.
pub(crate) fn hash_u64(key: u64, seed: u32) -> [u32; 4] {
    murmur3_x86_128(&key.to_le_bytes(), seed)
}

/* -------------------- Unit Tests -------------------- */
