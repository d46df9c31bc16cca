//! StreamCipher — 20-round ChaCha keystream used for encryption and for
//! injecting seed material into the automaton.

pub mod chacha20;

pub use chacha20::{encrypt, keystream, Keystream, BLOCK_LEN, KEY_LEN, NONCE_LEN};
