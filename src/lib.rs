//! VerusHash for Verus block headers
//!
//! Wraps the digest engine with the serialized block-header layout used by
//! light wallet servers, so a header can be parsed, re-serialized and hashed
//! with the version that applies at its height.
//!
//! # Example
//!
//! ```rust
//! use verushash::algorithm::{Engine, Version};
//! use verushash::header::BlockHeader;
//!
//! let header = BlockHeader {
//!     version: 4,
//!     time: 1_600_000_000,
//!     solution: vec![0u8; 1344],
//!     ..BlockHeader::default()
//! };
//!
//! let engine = Engine::new();
//! let display = header.display_hash(&engine, Version::V2b1).unwrap();
//! let wire = header.encodable_hash(&engine, Version::V2b1).unwrap();
//! assert_eq!(display.iter().rev().copied().collect::<Vec<_>>(), wire);
//! ```

// Re-export the digest engine
pub use verushash_core as algorithm;

pub mod header;

// Convenience re-exports
pub use algorithm::{Digest, Engine, Error, Variant, Version};
pub use header::{BlockHeader, HeaderError};
