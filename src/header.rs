//! Serialized block headers
//!
//! Layout, all little endian:
//!
//! ```text
//! version (4) | prev hash (32) | merkle root (32) | final sapling root (32)
//! | time (4) | nBits (4) | nonce (32) | CompactSize length | solution
//! ```
//!
//! Hashes are kept in internal (wire) byte order. Display order is the
//! reverse.

use thiserror::Error;

use crate::algorithm::{self, Digest, Engine, Variant, Version};

/// Serialized size of everything before the solution
pub const HEADER_SIZE_WITHOUT_SOLUTION: usize = 140;

/// Solution size on mainnet and testnet
pub const MAINNET_SOLUTION_SIZE: usize = 1344;

/// Largest CompactSize value accepted when parsing
pub const MAX_COMPACT_SIZE: u64 = 0x0200_0000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("could not read {0}")]
    Truncated(&'static str),

    #[error("non-canonical CompactSize encoding")]
    NonCanonicalCompactSize,

    #[error("CompactSize {0} exceeds the maximum of {max}", max = MAX_COMPACT_SIZE)]
    CompactSizeTooLarge(u64),

    #[error(transparent)]
    Hash(#[from] algorithm::Error),
}

pub type Result<T> = std::result::Result<T, HeaderError>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockHeader {
    pub version: i32,
    pub prev_hash: [u8; 32],
    pub merkle_root: [u8; 32],
    pub final_sapling_root: [u8; 32],
    pub time: u32,
    pub bits: [u8; 4],
    pub nonce: [u8; 32],
    pub solution: Vec<u8>,
}

/// Forward-only cursor over a byte slice
struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8]> {
        if self.buf.len() < len {
            return Err(HeaderError::Truncated(field));
        }
        let (head, rest) = self.buf.split_at(len);
        self.buf = rest;
        Ok(head)
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    fn compact_size(&mut self, field: &'static str) -> Result<u64> {
        let [prefix] = self.array::<1>(field)?;
        let (value, min) = match prefix {
            0..=252 => return Ok(prefix as u64),
            253 => (u16::from_le_bytes(self.array(field)?) as u64, 253),
            254 => (u32::from_le_bytes(self.array(field)?) as u64, 0x1_0000),
            255 => (u64::from_le_bytes(self.array(field)?), 0x1_0000_0000),
        };
        if value < min {
            return Err(HeaderError::NonCanonicalCompactSize);
        }
        Ok(value)
    }
}

/// Number of bytes needed to store `len` bytes behind a CompactSize prefix
pub fn compact_prefixed_len(len: usize) -> usize {
    let prefix = match len as u64 {
        0..=252 => 1,
        253..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    };
    prefix + len
}

pub fn write_compact_size(out: &mut Vec<u8>, len: usize) {
    let len = len as u64;
    match len {
        0..=252 => out.push(len as u8),
        253..=0xffff => {
            out.push(253);
            out.extend_from_slice(&(len as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(254);
            out.extend_from_slice(&(len as u32).to_le_bytes());
        }
        _ => {
            out.push(255);
            out.extend_from_slice(&len.to_le_bytes());
        }
    }
}

impl BlockHeader {
    /// Parse a header from the front of `input`, returning it with the
    /// unread remainder. `input` is left untouched on error.
    pub fn parse(input: &[u8]) -> Result<(BlockHeader, &[u8])> {
        let mut r = Reader { buf: input };

        let version = i32::from_le_bytes(r.array("header version")?);
        let prev_hash = r.array("previous block hash")?;
        let merkle_root = r.array("merkle root")?;
        let final_sapling_root = r.array("final sapling root")?;
        let time = u32::from_le_bytes(r.array("timestamp")?);
        let bits = r.array("nBits")?;
        let nonce = r.array("nonce")?;

        let solution_len = r.compact_size("solution length")?;
        if solution_len > MAX_COMPACT_SIZE {
            return Err(HeaderError::CompactSizeTooLarge(solution_len));
        }
        let solution = r.take(solution_len as usize, "solution")?.to_vec();

        let header = BlockHeader {
            version,
            prev_hash,
            merkle_root,
            final_sapling_root,
            time,
            bits,
            nonce,
            solution,
        };
        Ok((header, r.buf))
    }

    /// Serialized size in bytes
    pub fn size(&self) -> usize {
        HEADER_SIZE_WITHOUT_SOLUTION + compact_prefixed_len(self.solution.len())
    }

    pub fn marshal(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.prev_hash);
        out.extend_from_slice(&self.merkle_root);
        out.extend_from_slice(&self.final_sapling_root);
        out.extend_from_slice(&self.time.to_le_bytes());
        out.extend_from_slice(&self.bits);
        out.extend_from_slice(&self.nonce);
        write_compact_size(&mut out, self.solution.len());
        out.extend_from_slice(&self.solution);
        out
    }

    /// Block hash in big-endian display order
    pub fn display_hash(&self, engine: &Engine, version: Version) -> Result<Digest> {
        Ok(engine.hash(Variant::reversed(version), &self.marshal())?)
    }

    /// Block hash in little-endian wire order
    pub fn encodable_hash(&self, engine: &Engine, version: Version) -> Result<Digest> {
        Ok(engine.hash(Variant::forward(version), &self.marshal())?)
    }

    /// Previous block hash in display order
    pub fn display_prev_hash(&self) -> [u8; 32] {
        let mut out = self.prev_hash;
        algorithm::reverse(&mut out);
        out
    }
}
