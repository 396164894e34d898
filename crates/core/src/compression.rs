//! Compression cores
//!
//! Each version is a fixed-width function from an input buffer to a 32-byte
//! digest. All of them share the chained Haraka-512 absorb: a 64-byte buffer
//! whose lower half carries the running state and whose upper half receives
//! the next 32 bytes of input. V1 chains with all-zero round constants and
//! stops there. The V2 family chains with the standard constants and
//! finishes with a CLHash round over a freshly expanded key and a keyed
//! Haraka-512.

use core::ops::RangeInclusive;

use crate::clhash::{Key, Revision, clhash, expand_key};
use crate::haraka::{ZERO_ROUND_CONSTANTS, haraka512};
use crate::params::*;
use crate::setup::{Backend, Setup};
use crate::variant::Version;

/// A fixed-width, stateless digest function.
///
/// Implementations never keep state between calls and never mutate the
/// input, so a single instance may be shared across threads.
pub trait CompressionCore: Sync {
    fn version(&self) -> Version;

    /// Input lengths this core is defined for
    fn accepted_len(&self) -> RangeInclusive<usize>;

    /// Digest `input`. The caller has already checked its length.
    fn compress(&self, setup: &Setup, input: &[u8]) -> Digest;
}

static V1: V1Core = V1Core;
static V2: V2Core = V2Core::new(Version::V2, Revision::Initial);
static V2B: V2Core = V2Core::new(Version::V2b, Revision::WideShift);
static V2B1: V2Core = V2Core::new(Version::V2b1, Revision::DivisionLoop);

/// The core implementing `version`
pub fn core_for(version: Version) -> &'static dyn CompressionCore {
    match version {
        Version::V1 => &V1,
        Version::V2 => &V2,
        Version::V2b => &V2B,
        Version::V2b1 => &V2B1,
    }
}

/// Chained Haraka-512 state
struct Chain<'a> {
    backend: Backend,
    /// Round constants of the chaining Haraka-512
    rc: &'a [u128],
    buf: [u8; CHAIN_BUFFER_SIZE],
    /// Bytes of unabsorbed tail sitting in the upper half
    pos: usize,
}

impl<'a> Chain<'a> {
    fn new(backend: Backend, rc: &'a [u128]) -> Self {
        Self {
            backend,
            rc,
            buf: [0u8; CHAIN_BUFFER_SIZE],
            pos: 0,
        }
    }

    /// Compress every full chunk of `input`, leave the tail in the upper half
    fn absorb(&mut self, input: &[u8]) {
        let mut chunks = input.chunks_exact(CHUNK_SIZE);
        for chunk in &mut chunks {
            self.buf[CHUNK_SIZE..].copy_from_slice(chunk);
            self.compress();
        }

        let tail = chunks.remainder();
        self.buf[CHUNK_SIZE..CHUNK_SIZE + tail.len()].copy_from_slice(tail);
        self.pos = tail.len();
    }

    fn compress(&mut self) {
        let out = haraka512(self.backend, self.rc, &self.buf);
        self.buf[..DIGEST_SIZE].copy_from_slice(&out);
    }

    /// Fill the upper half from `pos` to the end with repeats of `pattern`
    fn fill_extra(&mut self, pattern: &[u8]) {
        let mut pos = self.pos;
        while pos < CHUNK_SIZE {
            let len = pattern.len().min(CHUNK_SIZE - pos);
            self.buf[CHUNK_SIZE + pos..CHUNK_SIZE + pos + len].copy_from_slice(&pattern[..len]);
            pos += len;
        }
    }

    fn state(&self) -> Digest {
        let mut out = [0u8; DIGEST_SIZE];
        out.copy_from_slice(&self.buf[..DIGEST_SIZE]);
        out
    }
}

/// Original VerusHash: chained Haraka-512 with zero round constants, the
/// last chunk zero-padded.
#[derive(Debug, Clone, Copy)]
pub struct V1Core;

impl CompressionCore for V1Core {
    fn version(&self) -> Version {
        Version::V1
    }

    fn accepted_len(&self) -> RangeInclusive<usize> {
        MIN_INPUT_LEN..=V1_MAX_INPUT_LEN
    }

    fn compress(&self, setup: &Setup, input: &[u8]) -> Digest {
        let mut chain = Chain::new(setup.backend(), &ZERO_ROUND_CONSTANTS);
        chain.absorb(input);

        if chain.pos > 0 {
            chain.buf[CHUNK_SIZE + chain.pos..].fill(0);
            chain.compress();
        }

        chain.state()
    }
}

/// VerusHash 2.x: chained absorb, then CLHash and a keyed Haraka-512.
#[derive(Debug, Clone, Copy)]
pub struct V2Core {
    version: Version,
    revision: Revision,
}

impl V2Core {
    pub const fn new(version: Version, revision: Revision) -> Self {
        Self { version, revision }
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    fn finalize(&self, setup: &Setup, chain: &mut Chain<'_>) -> Digest {
        let backend = setup.backend();

        // no input-controlled zero run reaches the mixer
        let mut head = [0u8; 16];
        head.copy_from_slice(&chain.buf[..16]);
        chain.fill_extra(&head);

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&chain.buf[..32]);
        let mut key: Key = [0u128; KEY_WORDS];
        expand_key(backend, setup.round_constants(), &seed, &mut key);

        let intermediate = clhash(
            backend,
            self.revision,
            &mut key,
            &chain.buf,
            setup.length_hash(),
        );

        chain.fill_extra(&intermediate.to_le_bytes());

        // the mixer mutated the key; the final round reads the mutated window
        let offset = (intermediate & KEY_MASK_WORDS) as usize;
        haraka512(backend, &key[offset..offset + HARAKA_CONSTANTS], &chain.buf)
    }
}

impl CompressionCore for V2Core {
    fn version(&self) -> Version {
        self.version
    }

    fn accepted_len(&self) -> RangeInclusive<usize> {
        MIN_INPUT_LEN..=V2_MAX_INPUT_LEN
    }

    fn compress(&self, setup: &Setup, input: &[u8]) -> Digest {
        let mut chain = Chain::new(setup.backend(), setup.round_constants());
        chain.absorb(input);
        self.finalize(setup, &mut chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haraka::ROUND_CONSTANTS;

    fn portable() -> Setup {
        Setup::for_backend(Backend::Portable).unwrap()
    }

    #[test]
    fn test_core_for_maps_versions() {
        for version in Version::ALL {
            assert_eq!(core_for(version).version(), version);
        }
        assert_eq!(V2.revision(), Revision::Initial);
        assert_eq!(V2B.revision(), Revision::WideShift);
        assert_eq!(V2B1.revision(), Revision::DivisionLoop);
    }

    #[test]
    fn test_accepted_lengths() {
        assert_eq!(core_for(Version::V1).accepted_len(), 1..=u32::MAX as usize);
        for version in [Version::V2, Version::V2b, Version::V2b1] {
            assert_eq!(core_for(version).accepted_len(), 1..=i32::MAX as usize);
        }
    }

    #[test]
    fn test_v1_single_chunk_is_one_haraka512() {
        let setup = portable();
        let input: Vec<u8> = (0..32u8).collect();

        let mut block = [0u8; 64];
        block[32..].copy_from_slice(&input);
        let expected = haraka512(Backend::Portable, &ZERO_ROUND_CONSTANTS, &block);

        assert_eq!(V1Core.compress(&setup, &input), expected);
    }

    #[test]
    fn test_v1_chains_with_zero_round_constants() {
        let setup = portable();
        let input: Vec<u8> = (0..32u8).collect();
        let digest = V1Core.compress(&setup, &input);

        assert_eq!(digest[..4], [0x10, 0xad, 0x9a, 0x56]);

        let mut block = [0u8; 64];
        block[32..].copy_from_slice(&input);
        assert_ne!(digest, haraka512(Backend::Portable, &ROUND_CONSTANTS, &block));
    }

    #[test]
    fn test_v1_chains_chunks() {
        let setup = portable();
        let input: Vec<u8> = (0..64u8).collect();

        let mut block = [0u8; 64];
        block[32..].copy_from_slice(&input[..32]);
        let first = haraka512(Backend::Portable, &ZERO_ROUND_CONSTANTS, &block);
        block[..32].copy_from_slice(&first);
        block[32..].copy_from_slice(&input[32..]);
        let expected = haraka512(Backend::Portable, &ZERO_ROUND_CONSTANTS, &block);

        assert_eq!(V1Core.compress(&setup, &input), expected);
    }

    #[test]
    fn test_v1_zero_pads_tail() {
        let setup = portable();
        let short = b"verus";
        let mut padded = [0u8; 32];
        padded[..short.len()].copy_from_slice(short);

        assert_eq!(
            V1Core.compress(&setup, short),
            V1Core.compress(&setup, &padded)
        );
    }

    #[test]
    fn test_v2_does_not_zero_pad_tail() {
        let setup = portable();
        let short = b"verus";
        let mut padded = [0u8; 32];
        padded[..short.len()].copy_from_slice(short);

        let core = core_for(Version::V2b1);
        assert_ne!(core.compress(&setup, short), core.compress(&setup, &padded));
    }

    #[test]
    fn test_fill_extra_repeats_pattern() {
        let mut chain = Chain::new(Backend::Portable, &ROUND_CONSTANTS);
        chain.buf[32..35].copy_from_slice(b"abc");
        chain.pos = 3;
        chain.fill_extra(&[1, 2, 3, 4, 5, 6, 7, 8]);

        assert_eq!(&chain.buf[32..35], b"abc");
        assert_eq!(&chain.buf[35..43], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&chain.buf[59..64], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_fill_extra_full_chunk_overwrites_upper_half() {
        let mut chain = Chain::new(Backend::Portable, &ROUND_CONSTANTS);
        chain.buf[32..].fill(0xee);
        chain.fill_extra(&[9u8; 16]);
        assert_eq!(&chain.buf[32..], &[9u8; 32]);
    }

    #[test]
    fn test_cores_deterministic() {
        let setup = portable();
        let input = b"The quick brown fox jumps over the lazy dog, twice over";
        for version in Version::ALL {
            let core = core_for(version);
            assert_eq!(core.compress(&setup, input), core.compress(&setup, input));
        }
    }
}
