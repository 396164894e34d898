//! Error types for the digest engine.

use thiserror::Error;

use crate::setup::{Backend, BackendPolicy};
use crate::variant::Version;

/// Failures surfaced by the engine. Nothing is retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input outside the accepted length range of the selected core.
    #[error("invalid input length for {version}: {len} bytes, accepted {min}..={max}")]
    InvalidInputLength {
        version: Version,
        len: usize,
        min: usize,
        max: usize,
    },

    /// Setup could not produce a backend the engine's policy admits.
    #[error("no eligible compression backend: policy {required} rejected {available}")]
    NoEligibleBackend {
        required: BackendPolicy,
        available: Backend,
    },

    /// A backend that cannot run on this CPU was requested explicitly.
    #[error("compression backend {0} is not supported on this CPU")]
    UnsupportedBackend(Backend),

    /// A variant name outside the closed set.
    #[error("unsupported variant: {0}")]
    UnsupportedVariant(String),

    /// A numeric variant code outside the closed set.
    #[error("unsupported variant code: {0}")]
    UnsupportedVariantCode(u32),
}

pub type Result<T> = core::result::Result<T, Error>;
