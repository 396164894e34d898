//! Process-wide one-time setup
//!
//! Inspects the CPU once, picks the fastest backend for the primitives and
//! materializes the tables every core reads. The result lives in a
//! `OnceLock`: concurrent first callers block until it is fully built,
//! later callers read it without locking.

use core::fmt;
use std::sync::OnceLock;

use tracing::debug;

use crate::error::{Error, Result};
use crate::haraka::ROUND_CONSTANTS;
use crate::params::{CHAIN_BUFFER_SIZE, HARAKA_CONSTANTS, LENGTH_HASH_KEY_TERM};
use crate::primitives::clmul;

#[cfg(target_arch = "x86_64")]
cpufeatures::new!(cpuid_accel, "aes", "pclmulqdq");

static SETUP: OnceLock<Setup> = OnceLock::new();

/// Implementation of the AES round and carry-less multiply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Table-driven software, available everywhere
    Portable,
    /// x86_64 AES-NI + PCLMULQDQ intrinsics
    AesNi,
}

impl Backend {
    /// Fastest backend the running CPU supports
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if cpuid_accel::get() {
                return Backend::AesNi;
            }
        }
        Backend::Portable
    }

    /// Whether this backend can run on the current CPU
    pub fn is_supported(self) -> bool {
        match self {
            Backend::Portable => true,
            Backend::AesNi => Backend::detect() == Backend::AesNi,
        }
    }

    pub fn is_accelerated(self) -> bool {
        self != Backend::Portable
    }

    pub const fn name(self) -> &'static str {
        match self {
            Backend::Portable => "portable",
            Backend::AesNi => "aes-ni",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which backends an engine is willing to run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendPolicy {
    /// Whatever setup selected
    #[default]
    BestAvailable,
    /// Refuse to hash unless hardware acceleration was selected
    RequireAccelerated,
}

impl BackendPolicy {
    pub fn admit(self, backend: Backend) -> Result<()> {
        match self {
            BackendPolicy::RequireAccelerated if !backend.is_accelerated() => {
                Err(Error::NoEligibleBackend {
                    required: self,
                    available: backend,
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for BackendPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendPolicy::BestAvailable => f.write_str("best-available"),
            BackendPolicy::RequireAccelerated => f.write_str("require-accelerated"),
        }
    }
}

/// Immutable state shared by every core after setup.
#[derive(Debug)]
pub struct Setup {
    backend: Backend,
    round_constants: [u128; HARAKA_CONSTANTS],
    length_hash: u128,
}

impl Setup {
    /// The process-wide setup, built on first use
    pub fn global() -> &'static Setup {
        SETUP.get_or_init(|| {
            let backend = Backend::detect();
            debug!(%backend, "selected compression backend");
            Setup::build(backend)
        })
    }

    /// A setup pinned to `backend`, for comparing backends side by side
    pub fn for_backend(backend: Backend) -> Result<Setup> {
        if !backend.is_supported() {
            return Err(Error::UnsupportedBackend(backend));
        }
        Ok(Setup::build(backend))
    }

    fn build(backend: Backend) -> Setup {
        Setup {
            backend,
            round_constants: ROUND_CONSTANTS,
            length_hash: clmul(backend, CHAIN_BUFFER_SIZE as u64, LENGTH_HASH_KEY_TERM),
        }
    }

    /// Whether the global setup has been performed
    pub fn is_global_initialized() -> bool {
        SETUP.get().is_some()
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn round_constants(&self) -> &[u128; HARAKA_CONSTANTS] {
        &self.round_constants
    }

    pub fn length_hash(&self) -> u128 {
        self.length_hash
    }
}
