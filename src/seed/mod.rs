//! SeedMixing — turns secrets, salt and counter into the 32-byte derivation seed
//!
//! Secrets are hashed one by one into KeyBlocks; the seed is the byte-wise XOR
//! of those blocks with the counter block and the salt.

mod mixing;

pub use mixing::{
    counter_block, generate_salt, get_mid_end, hash256, hash512, prepare_secrets, xor_blocks,
    KeyBlock, KEY_BLOCK_LEN,
};
