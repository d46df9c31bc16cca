//! Errors surfaced by the cipher, the automaton and the derivation pipeline.

/// All failures are deterministic and input-driven; nothing here is retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KdfError {
    /// Malformed input, detected before any cryptographic work starts.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The keystream would need the 32-bit block counter to wrap.
    #[error(
        "Keystream counter overflow: {blocks} block(s) from counter {start} would wrap past 2^32"
    )]
    CounterOverflow { start: u32, blocks: u64 },

    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, KdfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_validation() {
        let err = KdfError::Validation("key must be 32 bytes, got 16".into());
        assert_eq!(
            err.to_string(),
            "Validation failed: key must be 32 bytes, got 16"
        );
    }

    #[test]
    fn test_display_overflow() {
        let err = KdfError::CounterOverflow { start: u32::MAX, blocks: 2 };
        assert!(err.to_string().contains("4294967295"));
        assert!(err.to_string().contains("2 block(s)"));
    }
}
