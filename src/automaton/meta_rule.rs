//! MetaRule — the automaton's configuration packed into 32 bits
//!
//! Bit layout of the big-endian integer formed by the first 4 seed bytes:
//!
//! ```text
//! 31..28  unused
//! 27..20  core_rule
//! 19..18  neighborhood size − 3
//!     17  boundary (0 = toroidal, 1 = zero-padded)
//!     16  inversion
//!  15..8  modulation
//!   7..0  temporal shift
//! ```

use super::RuleTable;
use crate::seed::KeyBlock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mask applied after every mutation; the top 4 bits never survive it.
const MUTATION_MASK: u32 = 0x0FFF_FFFF;

/// How neighbors beyond either end of the universe are read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boundary {
    /// Indices wrap around modulo the universe length
    Toroidal,
    /// Out-of-range neighbors read as 0
    ZeroPadded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetaRule(u32);

impl MetaRule {
    pub fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    /// The first 4 bytes of the seed.
    pub fn from_seed(seed: &KeyBlock) -> Self {
        Self::from_bytes([seed[0], seed[1], seed[2], seed[3]])
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub fn core_rule(&self) -> u8 {
        (self.0 >> 20) as u8
    }

    /// One of 3, 4, 5 or 6.
    pub fn neighborhood_size(&self) -> usize {
        ((self.0 >> 18) & 0x3) as usize + 3
    }

    pub fn boundary(&self) -> Boundary {
        if (self.0 >> 17) & 1 == 0 {
            Boundary::Toroidal
        } else {
            Boundary::ZeroPadded
        }
    }

    pub fn inversion(&self) -> bool {
        (self.0 >> 16) & 1 == 1
    }

    pub fn modulation(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn temporal(&self) -> u8 {
        self.0 as u8
    }

    pub fn rule_table(&self) -> RuleTable {
        RuleTable::build(self)
    }

    /// Rotate left by one bit, then keep only the low 28 bits.
    pub fn mutate(&mut self) {
        self.0 = self.0.rotate_left(1) & MUTATION_MASK;
    }

    pub fn mutated(mut self) -> Self {
        self.mutate();
        self
    }

    pub fn summary(&self) -> String {
        format!(
            "MetaRule {:08x} | core={:08b} | n={} | boundary={:?} | inversion={} | modulation={:08b} | temporal={:08b}",
            self.0,
            self.core_rule(),
            self.neighborhood_size(),
            self.boundary(),
            self.inversion(),
            self.modulation(),
            self.temporal()
        )
    }
}

impl fmt::Display for MetaRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}
