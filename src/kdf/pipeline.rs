//! KeyDerivation — the derivation loop
//!
//! For one counter:
//! 1. seed = secrets ⊕ SHA-256(counter) ⊕ salt
//! 2. (mid, end) from the seed's two lowest bytes, MetaRule from its first 4
//! 3. for each step 1..end: inject keystream, evolve, mutate the MetaRule when
//!    entropy stagnates; digest the universe at step `mid`
//! 4. digest the final universe; key = midpoint ⊕ endpoint (or endpoint if equal)

use super::KdfConfig;
use crate::automaton::{entropy, evolve, EntropyMonitor, MetaRule, Universe, UniverseDigest};
use crate::cipher::NONCE_LEN;
use crate::error::{KdfError, Result};
use crate::seed::{counter_block, get_mid_end, xor_blocks, KeyBlock};
use log::{debug, info, warn};

/// Final 64-byte derivation output.
pub type DerivedKey = [u8; 64];

/// What happened during one loop iteration
#[derive(Debug, Clone, PartialEq)]
pub struct StepTrace {
    pub step: u16,
    /// Entropy after injection, before evolution
    pub entropy_before: f64,
    /// Entropy of the evolved generation
    pub entropy_after: f64,
    /// Whether stagnation mutated the MetaRule at this step
    pub mutated: bool,
    /// MetaRule in force for the next step
    pub meta_rule: MetaRule,
}

/// Full record of one derivation run
#[derive(Debug, Clone)]
pub struct Derivation {
    pub key: DerivedKey,
    pub midpoint: UniverseDigest,
    pub endpoint: UniverseDigest,
    pub mid: u16,
    pub end: u16,
    pub initial_rule: MetaRule,
    pub final_rule: MetaRule,
    pub steps: Vec<StepTrace>,
}

impl Derivation {
    pub fn mutations(&self) -> usize {
        self.steps.iter().filter(|s| s.mutated).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "Derivation | mid={} end={} | steps={} | mutations={} | rule {} -> {}",
            self.mid,
            self.end,
            self.steps.len(),
            self.mutations(),
            self.initial_rule,
            self.final_rule
        )
    }
}

/// Nonce from a text label: its first 12 bytes, zero-padded if shorter.
fn label_nonce(label: &str) -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    let bytes = label.as_bytes();
    let n = bytes.len().min(NONCE_LEN);
    nonce[..n].copy_from_slice(&bytes[..n]);
    nonce
}

/// `endpoint` when both digests agree, otherwise their byte-wise XOR.
pub fn combine_digests(midpoint: &UniverseDigest, endpoint: &UniverseDigest) -> DerivedKey {
    if midpoint == endpoint {
        return *endpoint;
    }
    let mut key = [0u8; 64];
    for ((k, m), e) in key.iter_mut().zip(midpoint).zip(endpoint) {
        *k = m ^ e;
    }
    key
}

/// Derives keys under one validated [`KdfConfig`]
#[derive(Debug, Clone)]
pub struct KeyDerivation {
    config: KdfConfig,
}

impl Default for KeyDerivation {
    fn default() -> Self {
        Self {
            config: KdfConfig::default(),
        }
    }
}

impl KeyDerivation {
    pub fn new(config: KdfConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &KdfConfig {
        &self.config
    }

    pub fn derive(&self, secrets: &[KeyBlock], salt: &[u8], counter: u64) -> Result<DerivedKey> {
        Ok(self.derive_with_trace(secrets, salt, counter)?.key)
    }

    /// The seed for `counter`: every secret, the counter block and the salt XORed.
    pub fn seed(&self, secrets: &[KeyBlock], salt: &[u8], counter: u64) -> Result<KeyBlock> {
        if secrets.is_empty() {
            return Err(KdfError::Validation("at least one secret is required".into()));
        }
        if counter == 0 {
            return Err(KdfError::Validation("counter must be at least 1".into()));
        }
        let counter = counter_block(counter);
        let mut blocks: Vec<&[u8]> = secrets.iter().map(|s| &s[..]).collect();
        blocks.push(&counter);
        blocks.push(salt);
        xor_blocks(blocks.as_slice())
    }

    pub fn derive_with_trace(
        &self,
        secrets: &[KeyBlock],
        salt: &[u8],
        counter: u64,
    ) -> Result<Derivation> {
        let seed = self.seed(secrets, salt, counter)?;
        let (mid, end) = get_mid_end(&seed);
        let position = self.config.keystream_position;
        let monitor = EntropyMonitor::new(self.config.stagnation_threshold);

        let initial_rule = MetaRule::from_seed(&seed);
        let mut rule = initial_rule;
        let mut universe = Universe::zeroed(self.config.universe_size);
        let mut midpoint = None;
        let mut steps = Vec::with_capacity(usize::from(end));

        for step in 1..end {
            let nonce = label_nonce(&format!("cnt={:04}_step={:04}", counter, step));
            universe.inject(&seed, &nonce, position)?;

            let entropy_before = entropy(&universe);
            let next = evolve(&universe, &rule);
            let entropy_after = entropy(&next);

            let mutated = monitor.is_stagnant(entropy_before, entropy_after);
            if mutated {
                rule.mutate();
            }
            universe = next;

            debug!(
                "step {}/{}: entropy {:.4} -> {:.4}{}",
                step,
                end - 1,
                entropy_before,
                entropy_after,
                if mutated { format!(", rule mutated to {}", rule) } else { String::new() }
            );

            if step == mid {
                if universe.is_all_zero() {
                    warn!("Universe collapsed to zero at midpoint step {}, re-injecting", step);
                    universe.inject(&seed, &label_nonce(&format!("mid={:<12}", step)), position)?;
                }
                midpoint = Some(universe.digest());
            }

            steps.push(StepTrace {
                step,
                entropy_before,
                entropy_after,
                mutated,
                meta_rule: rule,
            });
        }

        if universe.is_all_zero() {
            warn!("Universe collapsed to zero at endpoint, re-injecting");
            universe.inject(&seed, &label_nonce(&format!("end={:<12}", counter)), position)?;
        }
        let endpoint = universe.digest();

        // mid < end, so the loop always passes the midpoint.
        let midpoint = midpoint.ok_or_else(|| {
            KdfError::Validation(format!("midpoint step {} was never reached", mid))
        })?;

        let derivation = Derivation {
            key: combine_digests(&midpoint, &endpoint),
            midpoint,
            endpoint,
            mid,
            end,
            initial_rule,
            final_rule: rule,
            steps,
        };
        info!("Derived key for counter {}: {}", counter, derivation.summary());
        Ok(derivation)
    }
}

/// Derive a key with the given configuration.
pub fn derive_key(
    secrets: &[KeyBlock],
    salt: &[u8],
    counter: u64,
    config: &KdfConfig,
) -> Result<DerivedKey> {
    KeyDerivation::new(config.clone())?.derive(secrets, salt, counter)
}
