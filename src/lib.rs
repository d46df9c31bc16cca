//! CAultron — keyed cellular-automaton key derivation
//!
//! Derives a 64-byte key from secrets, a salt and a counter. The secrets, the
//! salt and a hashed counter are XORed into a 32-byte seed; the seed keys a
//! ChaCha20 keystream that is injected into a one-dimensional cellular
//! automaton whose rule is itself decoded from the seed. SHA-512 digests of the
//! automaton at a seed-chosen midpoint and at the end are combined into the key.
//!
//! ```no_run
//! use caultron::{derive_key, hash256, prepare_secrets, KdfConfig};
//!
//! let secrets = prepare_secrets(["correct horse battery staple"]);
//! let salt = hash256(b"salt1");
//! let key = derive_key(&secrets, &salt, 1, &KdfConfig::default()).unwrap();
//! assert_eq!(key.len(), 64);
//! ```
//!
//! This is not a standardized KDF and makes no constant-time claims.

pub mod error;
pub mod cipher;
pub mod seed;
pub mod automaton;
pub mod kdf;

pub use error::{KdfError, Result};
pub use cipher::{encrypt, keystream, Keystream};
pub use seed::{
    counter_block, generate_salt, get_mid_end, hash256, hash512, prepare_secrets, xor_blocks,
    KeyBlock,
};
pub use automaton::{entropy, evolve, Boundary, EntropyMonitor, MetaRule, RuleTable, Universe};
pub use kdf::{
    combine_digests, counter_sweep, derive_key, hamming_distance, DerivedKey, Derivation,
    KdfConfig, KeyDerivation, SweepReport,
};
