//! Key derivation — counter blocks, seed mixing, keyed CA evolution and the
//! midpoint/endpoint combination that yields the final 64-byte key.

pub mod config;
pub mod pipeline;
pub mod analysis;

pub use config::KdfConfig;
pub use pipeline::{
    combine_digests, derive_key, DerivedKey, Derivation, KeyDerivation, StepTrace,
};
pub use analysis::{counter_sweep, hamming_distance, SweepEntry, SweepReport};
