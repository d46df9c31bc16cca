//! Universe — the automaton's line of cells
//!
//! Cells are kept one per `bool` rather than packed, which keeps neighbor
//! indexing and edge handling simple. Packing happens only for digests.

use crate::cipher::Keystream;
use crate::error::Result;
use crate::seed::hash512;

/// SHA-512 of a packed universe snapshot.
pub type UniverseDigest = [u8; 64];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    cells: Vec<bool>,
}

impl Universe {
    pub fn zeroed(len: usize) -> Self {
        Self { cells: vec![false; len] }
    }

    pub fn from_bits(cells: Vec<bool>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn count_ones(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_all_zero(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// XOR the low bit of each keystream byte into the matching cell.
    ///
    /// One keystream byte is drawn per cell. On error the universe is untouched.
    pub fn inject(&mut self, key: &[u8], nonce: &[u8], position: u32) -> Result<()> {
        let stream = Keystream::new(key, nonce, position)?.take(self.cells.len())?;
        for (cell, byte) in self.cells.iter_mut().zip(stream) {
            *cell ^= byte & 1 == 1;
        }
        Ok(())
    }

    /// Cells packed MSB-first; a trailing partial byte is zero-padded.
    pub fn pack(&self) -> Vec<u8> {
        self.cells
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &c)| acc | ((c as u8) << (7 - i)))
            })
            .collect()
    }

    pub fn digest(&self) -> UniverseDigest {
        hash512(&self.pack())
    }
}
