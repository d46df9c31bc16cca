//! Key-quality checks: Hamming distances of derived keys against a plain
//! SHA-512 baseline across a range of counters.

use super::{KdfConfig, KeyDerivation};
use crate::error::{KdfError, Result};
use crate::seed::{hash512, KeyBlock};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Number of differing bits between two equal-length byte strings.
pub fn hamming_distance(a: &[u8], b: &[u8]) -> Result<u32> {
    if a.len() != b.len() {
        return Err(KdfError::Validation(format!(
            "hamming distance needs equal lengths, got {} and {}",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepEntry {
    pub counter: u32,
    pub distance: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub entries: Vec<SweepEntry>,
    pub min: u32,
    pub max: u32,
    pub mean: f64,
    pub median: f64,
}

impl SweepReport {
    fn from_entries(entries: Vec<SweepEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(KdfError::Validation("counter range is empty".into()));
        }
        let mut sorted: Vec<u32> = entries.iter().map(|e| e.distance).collect();
        sorted.sort_unstable();
        let n = sorted.len();
        let median = if n % 2 == 1 {
            f64::from(sorted[n / 2])
        } else {
            (f64::from(sorted[n / 2 - 1]) + f64::from(sorted[n / 2])) / 2.0
        };
        let mean = sorted.iter().map(|&d| f64::from(d)).sum::<f64>() / n as f64;
        Ok(Self {
            min: sorted[0],
            max: sorted[n - 1],
            mean,
            median,
            entries,
        })
    }

    pub fn summary(&self) -> String {
        format!(
            "SweepReport | {} counters | min={} max={} mean={:.2} median={:.1}",
            self.entries.len(),
            self.min,
            self.max,
            self.mean,
            self.median
        )
    }
}

/// SHA-512(secrets ‖ salt ‖ counter as 4-byte big-endian).
fn baseline_key(secrets: &[KeyBlock], salt: &[u8], counter: u32) -> [u8; 64] {
    let mut material: Vec<u8> = secrets.iter().flatten().copied().collect();
    material.extend_from_slice(salt);
    material.extend_from_slice(&counter.to_be_bytes());
    hash512(&material)
}

/// Derive a key for every counter in `counters` and measure how far each lands
/// from the plain hash baseline. An unbiased key differs in about 256 of 512 bits.
pub fn counter_sweep(
    secrets: &[KeyBlock],
    salt: &[u8],
    counters: RangeInclusive<u32>,
    config: &KdfConfig,
) -> Result<SweepReport> {
    let kd = KeyDerivation::new(config.clone())?;
    let entries = counters
        .map(|counter| -> Result<SweepEntry> {
            let key = kd.derive(secrets, salt, u64::from(counter))?;
            let distance = hamming_distance(&baseline_key(secrets, salt, counter), &key)?;
            Ok(SweepEntry { counter, distance })
        })
        .collect::<Result<Vec<_>>>()?;
    SweepReport::from_entries(entries)
}
