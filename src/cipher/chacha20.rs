//! ChaCha20 with a 96-bit nonce and a 32-bit block counter.
//!
//! State layout: 4 constant words, 8 key words (little-endian), the block
//! counter, then 3 nonce words. The nonce words are read **big-endian**, which
//! departs from RFC 8439; derived keys depend on it, so it must not change.
//!
//! The block counter never wraps. Any request that would need a block past
//! counter 2^32 − 1 fails with [`KdfError::CounterOverflow`] before a single
//! byte of that request is produced.

use crate::error::{KdfError, Result};

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;
pub const BLOCK_LEN: usize = 64;

/// "expand 32-byte k"
const SIGMA: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];

#[inline(always)]
fn quarter_round(x: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    x[a] = x[a].wrapping_add(x[b]);
    x[d] = (x[d] ^ x[a]).rotate_left(16);
    x[c] = x[c].wrapping_add(x[d]);
    x[b] = (x[b] ^ x[c]).rotate_left(12);
    x[a] = x[a].wrapping_add(x[b]);
    x[d] = (x[d] ^ x[a]).rotate_left(8);
    x[c] = x[c].wrapping_add(x[d]);
    x[b] = (x[b] ^ x[c]).rotate_left(7);
}

fn block(input: &[u32; 16]) -> [u8; BLOCK_LEN] {
    let mut x = *input;
    for _ in 0..10 {
        quarter_round(&mut x, 0, 4, 8, 12);
        quarter_round(&mut x, 1, 5, 9, 13);
        quarter_round(&mut x, 2, 6, 10, 14);
        quarter_round(&mut x, 3, 7, 11, 15);
        quarter_round(&mut x, 0, 5, 10, 15);
        quarter_round(&mut x, 1, 6, 11, 12);
        quarter_round(&mut x, 2, 7, 8, 13);
        quarter_round(&mut x, 3, 4, 9, 14);
    }

    let mut out = [0u8; BLOCK_LEN];
    for (i, chunk) in out.chunks_exact_mut(4).enumerate() {
        chunk.copy_from_slice(&x[i].wrapping_add(input[i]).to_le_bytes());
    }
    out
}

fn word(bytes: &[u8]) -> [u8; 4] {
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

/// An unbounded keystream for one (key, nonce, starting counter) triple.
///
/// Bytes are handed out in order across calls, so `take(10)` followed by
/// `take(100)` yields the same bytes as a single `take(110)`.
#[derive(Clone)]
pub struct Keystream {
    state: [u32; 16],
    /// Counter of the next block to generate; `None` once block 2^32 − 1 was used.
    next_counter: Option<u32>,
    buffer: [u8; BLOCK_LEN],
    used: usize,
}

impl Keystream {
    pub fn new(key: &[u8], nonce: &[u8], counter: u32) -> Result<Self> {
        if key.len() != KEY_LEN {
            return Err(KdfError::Validation(format!(
                "key must be {} bytes, got {}",
                KEY_LEN,
                key.len()
            )));
        }
        if nonce.len() != NONCE_LEN {
            return Err(KdfError::Validation(format!(
                "nonce must be {} bytes, got {}",
                NONCE_LEN,
                nonce.len()
            )));
        }

        let mut state = [0u32; 16];
        state[..4].copy_from_slice(&SIGMA);
        for (slot, chunk) in state[4..12].iter_mut().zip(key.chunks_exact(4)) {
            *slot = u32::from_le_bytes(word(chunk));
        }
        state[12] = counter;
        for (slot, chunk) in state[13..16].iter_mut().zip(nonce.chunks_exact(4)) {
            *slot = u32::from_be_bytes(word(chunk));
        }

        Ok(Self {
            state,
            next_counter: Some(counter),
            buffer: [0u8; BLOCK_LEN],
            used: BLOCK_LEN,
        })
    }

    /// Number of fresh blocks this stream can still generate.
    fn blocks_left(&self) -> u64 {
        match self.next_counter {
            Some(c) => u64::from(u32::MAX - c) + 1,
            None => 0,
        }
    }

    fn refill(&mut self) {
        // Only reachable after `reserve` proved a block is available.
        let Some(counter) = self.next_counter else {
            return;
        };
        self.state[12] = counter;
        self.buffer = block(&self.state);
        self.used = 0;
        self.next_counter = counter.checked_add(1);
    }

    /// Fails unless `len` more bytes can be produced without wrapping.
    fn reserve(&self, len: usize) -> Result<()> {
        let buffered = BLOCK_LEN - self.used;
        let missing = len.saturating_sub(buffered) as u64;
        let blocks = missing.div_ceil(BLOCK_LEN as u64);
        if blocks > self.blocks_left() {
            return Err(KdfError::CounterOverflow {
                start: self.next_counter.unwrap_or(u32::MAX),
                blocks,
            });
        }
        Ok(())
    }

    /// XOR the next `data.len()` keystream bytes into `data`.
    pub fn apply(&mut self, data: &mut [u8]) -> Result<()> {
        self.reserve(data.len())?;
        for byte in data.iter_mut() {
            if self.used == BLOCK_LEN {
                self.refill();
            }
            *byte ^= self.buffer[self.used];
            self.used += 1;
        }
        Ok(())
    }

    pub fn take(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; len];
        self.apply(&mut out)?;
        Ok(out)
    }
}

impl std::fmt::Debug for Keystream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key words stay out of logs.
        f.debug_struct("Keystream")
            .field("next_counter", &self.next_counter)
            .field("buffered", &(BLOCK_LEN - self.used))
            .finish()
    }
}

/// The first `len` keystream bytes for `(key, nonce, counter)`.
pub fn keystream(key: &[u8], nonce: &[u8], counter: u32, len: usize) -> Result<Vec<u8>> {
    Keystream::new(key, nonce, counter)?.take(len)
}

/// XOR `data` with the keystream. The same call decrypts.
pub fn encrypt(data: &[u8], key: &[u8], nonce: &[u8], counter: u32) -> Result<Vec<u8>> {
    let mut out = data.to_vec();
    Keystream::new(key, nonce, counter)?.apply(&mut out)?;
    Ok(out)
}
