pub mod encoder;
pub mod error;
pub mod external;
pub mod fel_info;
pub mod media_info;
pub mod normalizer;
pub mod output;
pub mod report;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

pub use encoder::{Encoder, MasteringPrimaries, SynthesisConfig};
pub use error::FelDataError;
pub use normalizer::{
    L1Policy, LightLevelSource, MetadataSummary, NormalizerConfig, ProfilePolicy,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DoviProfile {
    pub major: u8,
    pub minor: Option<u8>,
}

/// `min`/`max` describe the mastering display, `avg` is the L1 average luminance
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Level1 {
    pub min: f64,
    pub max: f64,
    pub avg: Option<f64>,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Level6 {
    pub max_cll: u16,
    pub max_fall: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneRecord {
    pub profile: DoviProfile,
    pub fel_present: bool,
    pub l1: Option<Level1>,
    pub l6: Option<Level6>,
    /// MaxCLL/MaxFALL computed from the L1 metadata, floored to whole nits
    pub content_light_level: Option<Level6>,
}

impl DoviProfile {
    pub const fn new(major: u8, minor: Option<u8>) -> Self {
        Self { major, minor }
    }
}

impl FromStr for DoviProfile {
    type Err = FelDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FelDataError::malformed(format!("invalid profile `{s}`"));

        let (major, minor) = match s.trim().split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (s.trim(), None),
        };

        let major = major.parse::<u8>().map_err(|_| invalid())?;
        let minor = minor
            .map(|m| m.parse::<u8>().map_err(|_| invalid()))
            .transpose()?;

        Ok(Self { major, minor })
    }
}

impl fmt::Display for DoviProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minor {
            Some(minor) => write!(f, "{}.{}", self.major, minor),
            None => write!(f, "{}", self.major),
        }
    }
}

impl Level6 {
    pub fn from_nits(max_cll: f64, max_fall: f64) -> Self {
        Self {
            max_cll: max_cll.floor() as u16,
            max_fall: max_fall.floor() as u16,
        }
    }

    pub fn max(self, other: Self) -> Self {
        Self {
            max_cll: self.max_cll.max(other.max_cll),
            max_fall: self.max_fall.max(other.max_fall),
        }
    }
}
