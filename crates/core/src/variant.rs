//! The closed set of digest variants: a version crossed with a byte order.

use core::fmt;
use core::str::FromStr;

use crate::error::Error;

/// Protocol generation of the hash. Chain height decides which one is
/// canonical for a given header; the engine never infers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Version {
    V1,
    V2,
    V2b,
    V2b1,
}

impl Version {
    /// Every version, oldest first
    pub const ALL: [Version; 4] = [Version::V1, Version::V2, Version::V2b, Version::V2b1];

    pub const fn name(self) -> &'static str {
        match self {
            Version::V1 => "v1",
            Version::V2 => "v2",
            Version::V2b => "v2b",
            Version::V2b1 => "v2b1",
        }
    }

    const fn index(self) -> u32 {
        match self {
            Version::V1 => 0,
            Version::V2 => 1,
            Version::V2b => 2,
            Version::V2b1 => 3,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Version::V1),
            "v2" | "2" => Ok(Version::V2),
            "v2b" | "2b" => Ok(Version::V2b),
            "v2b1" | "2b1" => Ok(Version::V2b1),
            _ => Err(Error::UnsupportedVariant(s.to_string())),
        }
    }
}

/// Byte order of the returned digest relative to the core's native output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// As produced by the core (little-endian wire order)
    #[default]
    Forward,
    /// Reversed after hashing (big-endian display order)
    Reversed,
}

/// A version together with the output byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variant {
    pub version: Version,
    pub order: ByteOrder,
}

impl Variant {
    /// All eight variants, in C ABI code order
    pub const ALL: [Variant; 8] = [
        Variant::forward(Version::V1),
        Variant::reversed(Version::V1),
        Variant::forward(Version::V2),
        Variant::reversed(Version::V2),
        Variant::forward(Version::V2b),
        Variant::reversed(Version::V2b),
        Variant::forward(Version::V2b1),
        Variant::reversed(Version::V2b1),
    ];

    pub const fn new(version: Version, order: ByteOrder) -> Self {
        Self { version, order }
    }

    pub const fn forward(version: Version) -> Self {
        Self::new(version, ByteOrder::Forward)
    }

    pub const fn reversed(version: Version) -> Self {
        Self::new(version, ByteOrder::Reversed)
    }

    /// Numeric code used across the C ABI: `version * 2 + reversed`
    pub const fn code(self) -> u32 {
        let reversed = match self.order {
            ByteOrder::Forward => 0,
            ByteOrder::Reversed => 1,
        };
        self.version.index() * 2 + reversed
    }

    pub fn from_code(code: u32) -> Result<Self, Error> {
        Variant::ALL
            .get(code as usize)
            .copied()
            .ok_or(Error::UnsupportedVariantCode(code))
    }
}

impl From<Version> for Variant {
    fn from(version: Version) -> Self {
        Variant::forward(version)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order {
            ByteOrder::Forward => write!(f, "{}", self.version),
            ByteOrder::Reversed => write!(f, "{}_reverse", self.version),
        }
    }
}

/// Accepts `v2b1`, `v2b1_reverse` and `v2b1-reverse`.
impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let (version, order) = match lower
            .strip_suffix("_reverse")
            .or_else(|| lower.strip_suffix("-reverse"))
        {
            Some(version) => (version, ByteOrder::Reversed),
            None => (lower.as_str(), ByteOrder::Forward),
        };
        let version = version
            .parse::<Version>()
            .map_err(|_| Error::UnsupportedVariant(s.to_string()))?;
        Ok(Variant::new(version, order))
    }
}
