//! MurmurHash3 (x86_128 variant).
//!
//! The filter needs the raw 128-bit mixing output as four 32-bit words, not a
//! `Hasher` digest, so the function is implemented in-tree rather than pulled
//! from the `murmur3` package <https://docs.rs/murmur3/latest/murmur3/>. The
//! algorithm follows Austin Appleby's public-domain reference implementation.

const C1: u32 = 0x239b_961b;
const C2: u32 = 0xab0e_9789;
const C3: u32 = 0x38b3_4ae5;
const C4: u32 = 0xa1e3_8b93;

fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Hash `data` with the given seed, returning the four 32-bit state words
/// `[h1, h2, h3, h4]`.
pub fn murmur3_x86_128(data: &[u8], seed: u32) -> [u32; 4] {
    let mut h1 = seed;
    let mut h2 = seed;
    let mut h3 = seed;
    let mut h4 = seed;

    let mut blocks = data.chunks_exact(16);
    for block in blocks.by_ref() {
        let k1 = read_u32(&block[0..4]);
        let k2 = read_u32(&block[4..8]);
        let k3 = read_u32(&block[8..12]);
        let k4 = read_u32(&block[12..16]);

        h1 ^= k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
        h1 = h1
            .rotate_left(19)
            .wrapping_add(h2)
            .wrapping_mul(5)
            .wrapping_add(0x561c_cd1b);
        h2 ^= k2.wrapping_mul(C2).rotate_left(16).wrapping_mul(C3);
        h2 = h2
            .rotate_left(17)
            .wrapping_add(h3)
            .wrapping_mul(5)
            .wrapping_add(0x0bca_a747);
        h3 ^= k3.wrapping_mul(C3).rotate_left(17).wrapping_mul(C4);
        h3 = h3
            .rotate_left(15)
            .wrapping_add(h4)
            .wrapping_mul(5)
            .wrapping_add(0x96cd_1c35);
        h4 ^= k4.wrapping_mul(C4).rotate_left(18).wrapping_mul(C1);
        h4 = h4
            .rotate_left(13)
            .wrapping_add(h1)
            .wrapping_mul(5)
            .wrapping_add(0x32ac_3b17);
    }

    let tail = blocks.remainder();
    let mut k1 = 0u32;
    let mut k2 = 0u32;
    let mut k3 = 0u32;
    let mut k4 = 0u32;
    for (i, &byte) in tail.iter().enumerate() {
        let lane = (byte as u32) << (8 * (i % 4));
        match i / 4 {
            0 => k1 ^= lane,
            1 => k2 ^= lane,
            2 => k3 ^= lane,
            _ => k4 ^= lane,
        }
    }
    if tail.len() > 12 {
        h4 ^= k4.wrapping_mul(C4).rotate_left(18).wrapping_mul(C1);
    }
    if tail.len() > 8 {
        h3 ^= k3.wrapping_mul(C3).rotate_left(17).wrapping_mul(C4);
    }
    if tail.len() > 4 {
        h2 ^= k2.wrapping_mul(C2).rotate_left(16).wrapping_mul(C3);
    }
    if !tail.is_empty() {
        h1 ^= k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
    }

    let len = data.len() as u32;
    h1 ^= len;
    h2 ^= len;
    h3 ^= len;
    h4 ^= len;

    h1 = h1.wrapping_add(h2).wrapping_add(h3).wrapping_add(h4);
    h2 = h2.wrapping_add(h1);
    h3 = h3.wrapping_add(h1);
    h4 = h4.wrapping_add(h1);

    h1 = fmix32(h1);
    h2 = fmix32(h2);
    h3 = fmix32(h3);
    h4 = fmix32(h4);

    h1 = h1.wrapping_add(h2).wrapping_add(h3).wrapping_add(h4);
    h2 = h2.wrapping_add(h1);
    h3 = h3.wrapping_add(h1);
    h4 = h4.wrapping_add(h1);

    [h1, h2, h3, h4]
}

/* -------------------- Unit Tests -------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_seed_zero_is_zero() {
        assert_eq!(murmur3_x86_128(&[], 0), [0, 0, 0, 0]);
    }

    #[test]
    fn deterministic() {
        let a = murmur3_x86_128(&42u64.to_le_bytes(), 0xbc9f1d34);
        let b = murmur3_x86_128(&42u64.to_le_bytes(), 0xbc9f1d34);
        assert_eq!(a, b);
    }

    #[test]
    fn seed_changes_output() {
        let a = murmur3_x86_128(&42u64.to_le_bytes(), 0xbc9f1d34);
        let b = murmur3_x86_128(&42u64.to_le_bytes(), 0x34f1d34b);
        assert_ne!(a, b);
    }

    #[test]
    fn distinct_inputs_differ() {
        let a = murmur3_x86_128(&1u64.to_le_bytes(), 0);
        let b = murmur3_x86_128(&2u64.to_le_bytes(), 0);
        assert_ne!(a, b);
    }

    #[test]
    fn tail_bytes_affect_long_input() {
        // 20 bytes: one full 16-byte block plus a 4-byte tail.
        let data: Vec<u8> = (0u8..20).collect();
        let a = murmur3_x86_128(&data, 7);
        let b = murmur3_x86_128(&data[..16], 7);
        assert_ne!(a, b);
    }
}
