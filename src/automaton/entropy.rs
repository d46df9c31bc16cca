//! EntropyMonitor — Shannon entropy of a universe and the stagnation test

use super::Universe;
use serde::{Deserialize, Serialize};

/// Binary entropy, in bits per cell, of the fraction of set cells.
pub fn entropy(universe: &Universe) -> f64 {
    if universe.is_empty() {
        return 0.0;
    }
    let p = universe.count_ones() as f64 / universe.len() as f64;
    if p == 0.0 || p == 1.0 {
        return 0.0;
    }
    -p * p.log2() - (1.0 - p) * (1.0 - p).log2()
}

/// Entropy of the whole line: per-cell entropy times the number of cells.
pub fn total_entropy(universe: &Universe) -> f64 {
    entropy(universe) * universe.len() as f64
}

/// Flags generations whose entropy barely moved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntropyMonitor {
    pub threshold: f64,
}

impl Default for EntropyMonitor {
    fn default() -> Self {
        Self { threshold: 0.1 }
    }
}

impl EntropyMonitor {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn is_stagnant(&self, before: f64, after: f64) -> bool {
        (after - before).abs() < self.threshold
    }
}
