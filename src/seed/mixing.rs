//! Hashing and XOR combination of KeyBlocks.

use crate::error::{KdfError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256, Sha512};

pub const KEY_BLOCK_LEN: usize = 32;

/// 256 bits of secret, salt or seed material.
pub type KeyBlock = [u8; KEY_BLOCK_LEN];

pub fn hash256(data: &[u8]) -> KeyBlock {
    let mut out = [0u8; KEY_BLOCK_LEN];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

pub fn hash512(data: &[u8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(&Sha512::digest(data));
    out
}

/// Hash each raw secret independently. Text goes in as its UTF-8 bytes.
pub fn prepare_secrets<I, S>(raw_inputs: I) -> Vec<KeyBlock>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    raw_inputs
        .into_iter()
        .map(|raw| hash256(raw.as_ref()))
        .collect()
}

/// SHA-256 of the counter as an 8-byte big-endian integer.
pub fn counter_block(counter: u64) -> KeyBlock {
    hash256(&counter.to_be_bytes())
}

/// Byte-wise XOR of at least two 32-byte blocks.
pub fn xor_blocks<B: AsRef<[u8]>>(blocks: &[B]) -> Result<KeyBlock> {
    if blocks.len() < 2 {
        return Err(KdfError::Validation(format!(
            "at least 2 blocks are required, got {}",
            blocks.len()
        )));
    }
    if let Some((i, bad)) = blocks
        .iter()
        .enumerate()
        .find(|(_, b)| b.as_ref().len() != KEY_BLOCK_LEN)
    {
        return Err(KdfError::Validation(format!(
            "block {} must be {} bytes, got {}",
            i,
            KEY_BLOCK_LEN,
            bad.as_ref().len()
        )));
    }

    let mut out = [0u8; KEY_BLOCK_LEN];
    for block in blocks {
        for (o, b) in out.iter_mut().zip(block.as_ref()) {
            *o ^= b;
        }
    }
    Ok(out)
}

/// Midpoint and endpoint step indices picked from the seed's two lowest bytes.
///
/// Reading the seed as a big-endian integer, `a` is its lowest byte and `b` the
/// next one, each raised to at least 1. Equal values bump `a`, so the result
/// always satisfies `1 <= mid < end <= 256`.
pub fn get_mid_end(seed: &KeyBlock) -> (u16, u16) {
    let mut a = u16::from(seed[KEY_BLOCK_LEN - 1]).max(1);
    let b = u16::from(seed[KEY_BLOCK_LEN - 2]).max(1);
    if a == b {
        a += 1;
    }
    (a.min(b), a.max(b))
}

/// A fresh random salt from the operating system RNG.
pub fn generate_salt() -> KeyBlock {
    let mut salt = [0u8; KEY_BLOCK_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xor_simple() {
        let a = [0xAAu8; 32];
        let b = [0x55u8; 32];
        assert_eq!(xor_blocks(&[a, b]).unwrap(), [0xFF; 32]);
    }

    #[test]
    fn test_xor_identity() {
        let a = [0x01u8; 32];
        assert_eq!(xor_blocks(&[a, a]).unwrap(), [0u8; 32]);
    }

    #[test]
    fn test_xor_multiple() {
        let blocks = [[0x0Fu8; 32], [0xF0; 32], [0xFF; 32]];
        assert_eq!(xor_blocks(&blocks).unwrap(), [0u8; 32]);
    }

    #[test]
    fn test_xor_order_independent() {
        let a = hash256(b"a");
        let b = hash256(b"b");
        let c = hash256(b"c");
        let abc = xor_blocks(&[a, b, c]).unwrap();
        assert_eq!(abc, xor_blocks(&[c, a, b]).unwrap());
        assert_eq!(abc, xor_blocks(&[b, c, a]).unwrap());
    }

    #[test]
    fn test_xor_rejects_bad_input() {
        let a = vec![0x01u8; 32];
        let short = b"short".to_vec();
        assert!(matches!(
            xor_blocks(&[a.clone(), short]),
            Err(KdfError::Validation(_))
        ));
        assert!(matches!(xor_blocks(&[a]), Err(KdfError::Validation(_))));
        let none: [Vec<u8>; 0] = [];
        assert!(xor_blocks(&none).is_err());
    }

    #[test]
    fn test_prepare_secrets_order_and_text() {
        let blocks = prepare_secrets(["alice", "bob"]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], hash256(b"alice"));
        assert_eq!(blocks[1], hash256(b"bob"));
        assert_eq!(prepare_secrets([b"alice".to_vec()])[0], blocks[0]);
    }

    #[test]
    fn test_counter_block_is_big_endian() {
        assert_eq!(counter_block(1), hash256(&[0, 0, 0, 0, 0, 0, 0, 1]));
        assert_ne!(counter_block(1), counter_block(2));
    }

    #[test]
    fn test_mid_end_basic() {
        let mut seed = [0u8; 32];
        seed[31] = 40;
        seed[30] = 9;
        assert_eq!(get_mid_end(&seed), (9, 40));
    }

    #[test]
    fn test_mid_end_zero_and_equal() {
        // Both bytes zero: both become 1, then a is bumped.
        assert_eq!(get_mid_end(&[0u8; 32]), (1, 2));
        let mut seed = [0u8; 32];
        seed[31] = 255;
        seed[30] = 255;
        assert_eq!(get_mid_end(&seed), (255, 256));
        seed[31] = 0;
        seed[30] = 1;
        assert_eq!(get_mid_end(&seed), (1, 2));
    }

    #[test]
    fn test_mid_end_ignores_upper_bytes() {
        let mut seed = [0xABu8; 32];
        seed[31] = 3;
        seed[30] = 7;
        let expected = get_mid_end(&seed);
        seed[0] = 0;
        seed[29] = 0x11;
        assert_eq!(get_mid_end(&seed), expected);
    }

    #[test]
    fn test_mid_end_invariant_over_all_low_bytes() {
        let mut seed = [0u8; 32];
        for lo in 0..=255u8 {
            for hi in 0..=255u8 {
                seed[31] = lo;
                seed[30] = hi;
                let (mid, end) = get_mid_end(&seed);
                assert!(mid >= 1 && mid < end, "lo={} hi={}", lo, hi);
            }
        }
    }

    #[test]
    fn test_generate_salt_is_fresh() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
