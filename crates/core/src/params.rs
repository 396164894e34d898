//! VerusHash parameters
//!
//! Sizes shared by the compression cores. Changing any of these changes
//! every digest, so they are fixed by the protocol.

/// Digest width in bytes, identical for every version
pub const DIGEST_SIZE: usize = 32;

/// Working buffer of the chained Haraka-512 absorb (chain value || chunk)
pub const CHAIN_BUFFER_SIZE: usize = 64;

/// Bytes of input absorbed per Haraka-512 call
pub const CHUNK_SIZE: usize = 32;

/// Haraka rounds (v2 parameterization)
pub const HARAKA_ROUNDS: usize = 5;

/// Round constants consumed by one Haraka-512 evaluation
pub const HARAKA_CONSTANTS: usize = 40;

/// CLHash key size in bytes: an 8 KiB mixing window plus one spare
/// Haraka-512 constant set past its end
pub const KEY_SIZE: usize = 1024 * 8 + HARAKA_CONSTANTS * 16;

/// CLHash key size in 128-bit words
pub const KEY_WORDS: usize = KEY_SIZE / 16;

/// Mask selecting a word inside the 8 KiB mixing window
pub const KEY_MASK_WORDS: u64 = ((1024 * 8) - 1) >> 4;

/// Key-length term folded into the CLHash length hash
pub const LENGTH_HASH_KEY_TERM: u64 = 1024;

/// Rounds of the CLHash mixing loop
pub const MIX_ROUNDS: usize = 32;

/// Shortest input any core accepts
pub const MIN_INPUT_LEN: usize = 1;

/// Longest input V1 accepts (its absorb position is a 32-bit counter)
pub const V1_MAX_INPUT_LEN: usize = u32::MAX as usize;

/// Longest input the V2 family accepts (signed 32-bit absorb position)
pub const V2_MAX_INPUT_LEN: usize = i32::MAX as usize;

/// Digest produced by every version
pub type Digest = [u8; DIGEST_SIZE];
