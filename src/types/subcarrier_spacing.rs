//! 5G NR sub-carrier spacing and numerology

use crate::{FronthaulError, Result};
use serde::{Deserialize, Serialize};

/// Sub-carrier spacing supported by the generator.
///
/// Deserializes from the plain kHz integer (`15`, `30`, `60`); any other value is a
/// configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SubcarrierSpacing {
    Khz15,
    Khz30,
    Khz60,
}

impl SubcarrierSpacing {
    /// Numerology index μ.
    pub fn numerology(self) -> u32 {
        match self {
            SubcarrierSpacing::Khz15 => 0,
            SubcarrierSpacing::Khz30 => 1,
            SubcarrierSpacing::Khz60 => 2,
        }
    }

    /// Slots per 1 ms subframe, `2^μ`.
    pub fn slots_per_subframe(self) -> u32 {
        1 << self.numerology()
    }

    /// Spacing in kHz.
    pub fn khz(self) -> u32 {
        match self {
            SubcarrierSpacing::Khz15 => 15,
            SubcarrierSpacing::Khz30 => 30,
            SubcarrierSpacing::Khz60 => 60,
        }
    }
}

impl TryFrom<u32> for SubcarrierSpacing {
    type Error = FronthaulError;

    fn try_from(khz: u32) -> Result<Self> {
        match khz {
            15 => Ok(SubcarrierSpacing::Khz15),
            30 => Ok(SubcarrierSpacing::Khz30),
            60 => Ok(SubcarrierSpacing::Khz60),
            other => Err(FronthaulError::UnsupportedSubcarrierSpacing { khz: other }),
        }
    }
}

impl From<SubcarrierSpacing> for u32 {
    fn from(scs: SubcarrierSpacing) -> Self {
        scs.khz()
    }
}
