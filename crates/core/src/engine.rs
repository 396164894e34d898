//! Digest engine
//!
//! Every public digest operation funnels into [`Engine::hash_into`]: ensure
//! setup, check the input length against the core, run the core, reverse
//! the output for the reversed variants. The eight named operations are
//! aliases of [`Engine::hash`] with a fixed [`Variant`].

use std::sync::OnceLock;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{trace, warn};

use crate::compression::core_for;
use crate::error::{Error, Result};
use crate::params::{DIGEST_SIZE, Digest};
use crate::reverse::reverse;
use crate::setup::{Backend, BackendPolicy, Setup};
use crate::variant::{ByteOrder, Variant, Version};

static DEFAULT_ENGINE: Engine = Engine::new();

/// VerusHash engine
///
/// Starts uninitialized. The first digest call (or [`Engine::initialize`])
/// performs the process-wide setup and, if the engine's policy admits the
/// selected backend, marks the engine initialized for good. An engine whose
/// policy rejects the backend stays uninitialized and every digest call
/// fails with [`Error::NoEligibleBackend`]. The rejection is logged once and
/// remembered.
#[derive(Debug, Default)]
pub struct Engine {
    policy: BackendPolicy,
    setup: OnceLock<&'static Setup>,
    rejected: OnceLock<Error>,
}

impl Engine {
    /// Engine that runs on whatever backend setup selects
    pub const fn new() -> Self {
        Self::with_policy(BackendPolicy::BestAvailable)
    }

    pub const fn with_policy(policy: BackendPolicy) -> Self {
        Self {
            policy,
            setup: OnceLock::new(),
            rejected: OnceLock::new(),
        }
    }

    pub fn policy(&self) -> BackendPolicy {
        self.policy
    }

    /// Perform setup if it has not happened yet. Safe to call any number
    /// of times from any number of threads.
    pub fn initialize(&self) -> Result<&'static Setup> {
        if let Some(setup) = self.setup.get() {
            return Ok(setup);
        }
        if let Some(err) = self.rejected.get() {
            return Err(err.clone());
        }

        let setup = Setup::global();
        if let Err(err) = self.policy.admit(setup.backend()) {
            if self.rejected.set(err.clone()).is_ok() {
                warn!(
                    policy = %self.policy,
                    backend = %setup.backend(),
                    "engine refused the selected backend"
                );
            }
            return Err(err);
        }

        Ok(self.setup.get_or_init(|| setup))
    }

    pub fn is_initialized(&self) -> bool {
        self.setup.get().is_some()
    }

    /// Why this engine refused to initialize, if it did
    pub fn rejection(&self) -> Option<&Error> {
        self.rejected.get()
    }

    /// Backend in use, once initialized
    pub fn backend(&self) -> Option<Backend> {
        self.setup.get().map(|setup| setup.backend())
    }

    /// Digest `input` into caller storage without allocating.
    ///
    /// `out` is left untouched on error.
    pub fn hash_into(&self, variant: Variant, input: &[u8], out: &mut Digest) -> Result<()> {
        let setup = self.initialize()?;

        let core = core_for(variant.version);
        let accepted = core.accepted_len();
        if !accepted.contains(&input.len()) {
            return Err(Error::InvalidInputLength {
                version: variant.version,
                len: input.len(),
                min: *accepted.start(),
                max: *accepted.end(),
            });
        }

        *out = core.compress(setup, input);
        if variant.order == ByteOrder::Reversed {
            reverse(out);
        }
        Ok(())
    }

    pub fn hash(&self, variant: Variant, input: &[u8]) -> Result<Digest> {
        let mut out = [0u8; DIGEST_SIZE];
        self.hash_into(variant, input, &mut out)?;
        Ok(out)
    }

    pub fn hash_v1(&self, input: &[u8]) -> Result<Digest> {
        self.hash(Variant::forward(Version::V1), input)
    }

    pub fn hash_v1_reverse(&self, input: &[u8]) -> Result<Digest> {
        self.hash(Variant::reversed(Version::V1), input)
    }

    pub fn hash_v2(&self, input: &[u8]) -> Result<Digest> {
        self.hash(Variant::forward(Version::V2), input)
    }

    pub fn hash_v2_reverse(&self, input: &[u8]) -> Result<Digest> {
        self.hash(Variant::reversed(Version::V2), input)
    }

    pub fn hash_v2b(&self, input: &[u8]) -> Result<Digest> {
        self.hash(Variant::forward(Version::V2b), input)
    }

    pub fn hash_v2b_reverse(&self, input: &[u8]) -> Result<Digest> {
        self.hash(Variant::reversed(Version::V2b), input)
    }

    pub fn hash_v2b1(&self, input: &[u8]) -> Result<Digest> {
        self.hash(Variant::forward(Version::V2b1), input)
    }

    pub fn hash_v2b1_reverse(&self, input: &[u8]) -> Result<Digest> {
        self.hash(Variant::reversed(Version::V2b1), input)
    }

    /// Digest many candidates with the same variant.
    ///
    /// Results keep the order of `inputs`. With the `parallel` feature the
    /// work is spread over the rayon pool. The first failing input fails
    /// the whole batch.
    pub fn hash_batch<T>(&self, variant: Variant, inputs: &[T]) -> Result<Vec<Digest>>
    where
        T: AsRef<[u8]> + Sync,
    {
        self.initialize()?;
        trace!(count = inputs.len(), %variant, "hashing batch");

        #[cfg(feature = "parallel")]
        let digests = inputs
            .par_iter()
            .map(|input| self.hash(variant, input.as_ref()))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let digests = inputs
            .iter()
            .map(|input| self.hash(variant, input.as_ref()))
            .collect();

        digests
    }
}

/// The process-wide engine behind the free functions
pub fn default_engine() -> &'static Engine {
    &DEFAULT_ENGINE
}

/// Perform setup on the default engine
pub fn initialize() -> Result<()> {
    DEFAULT_ENGINE.initialize().map(|_| ())
}

pub fn is_initialized() -> bool {
    DEFAULT_ENGINE.is_initialized()
}

/// Digest `input` with the default engine
pub fn hash(variant: Variant, input: &[u8]) -> Result<Digest> {
    DEFAULT_ENGINE.hash(variant, input)
}

pub fn hash_into(variant: Variant, input: &[u8], out: &mut Digest) -> Result<()> {
    DEFAULT_ENGINE.hash_into(variant, input, out)
}

pub fn hash_batch<T>(variant: Variant, inputs: &[T]) -> Result<Vec<Digest>>
where
    T: AsRef<[u8]> + Sync,
{
    DEFAULT_ENGINE.hash_batch(variant, inputs)
}
