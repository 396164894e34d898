//! # VerusHash Core
//!
//! The proof-of-work digest of the VerusCoin protocol: a fixed 32-byte
//! digest over a serialized block header, in every protocol generation.
//!
//! ## Versions
//!
//! - **V1**: chained Haraka-512 over 32-byte chunks, all round constants zero
//! - **V2**: the V1 chain finished by a CLHash round over an 8832-byte key
//!   and a keyed Haraka-512 (mixer 2.0)
//! - **V2b**: V2 with the corrected round-bit shift (mixer 2.1)
//! - **V2b1**: V2b with the division loop (mixer 2.2)
//!
//! Each version has a forward and a reversed form. The reversed form
//! reverses the produced digest, giving big-endian display order.
//!
//! ## Setup
//!
//! A one-time process-wide setup inspects the CPU and picks the AES-NI +
//! PCLMULQDQ backend when available, the portable backend otherwise. It
//! runs lazily on the first digest call and never runs twice. Both
//! backends produce identical digests.
//!
//! ## Example
//!
//! ```rust
//! use verushash_core::{Engine, Variant, Version};
//!
//! let engine = Engine::new();
//! let digest = engine.hash_v2b1(b"serialized header").unwrap();
//!
//! // reversed variant, as displayed by block explorers
//! let display = engine.hash(Variant::reversed(Version::V2b1), b"serialized header").unwrap();
//!
//! let mut flipped = digest;
//! flipped.reverse();
//! assert_eq!(display, flipped);
//! ```
//!
//! ## Limits
//!
//! Inputs must be non-empty. V1 accepts up to `u32::MAX` bytes, the V2
//! family up to `i32::MAX`. This crate does not compare digests against a
//! difficulty target.

pub mod clhash;
pub mod compression;
mod engine;
mod error;
pub mod ffi;
pub mod haraka;
mod params;
mod primitives;
mod reverse;
mod setup;
mod variant;

pub use compression::{CompressionCore, V1Core, V2Core, core_for};
pub use engine::{
    Engine, default_engine, hash, hash_batch, hash_into, initialize, is_initialized,
};
pub use error::{Error, Result};
pub use params::*;
pub use reverse::reverse;
pub use setup::{Backend, BackendPolicy, Setup};
pub use variant::{ByteOrder, Variant, Version};

#[cfg(test)]
mod tests;
