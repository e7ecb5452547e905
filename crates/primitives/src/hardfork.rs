//! Hardfork identifiers.
#![allow(missing_docs)]
#![allow(non_camel_case_types)]

use core::{fmt, str::FromStr};

pub use SpecId::*;

/// Specification IDs and their activation on mainnet.
///
/// Forks after the merge activate by timestamp, see [`ForkSchedule::mainnet`].
///
/// [`ForkSchedule::mainnet`]: crate::ForkSchedule::mainnet
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, enumn::N)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecId {
    FRONTIER = 0,         // Frontier               0
    FRONTIER_THAWING = 1, // Frontier Thawing       200000
    HOMESTEAD = 2,        // Homestead              1150000
    DAO_FORK = 3,         // DAO Fork               1920000
    TANGERINE = 4,        // Tangerine Whistle      2463000
    SPURIOUS_DRAGON = 5,  // Spurious Dragon        2675000
    BYZANTIUM = 6,        // Byzantium              4370000
    CONSTANTINOPLE = 7,   // Constantinople         7280000 is overwritten with PETERSBURG
    PETERSBURG = 8,       // Petersburg             7280000
    ISTANBUL = 9,         // Istanbul               9069000
    MUIR_GLACIER = 10,    // Muir Glacier           9200000
    BERLIN = 11,          // Berlin                 12244000
    LONDON = 12,          // London                 12965000
    ARROW_GLACIER = 13,   // Arrow Glacier          13773000
    GRAY_GLACIER = 14,    // Gray Glacier           15050000
    MERGE = 15,           // Paris/Merge            15537394
    SHANGHAI = 16,        // Shanghai               (Timestamp: 1681338455)
    #[default]
    LATEST = u8::MAX,
}

impl SpecId {
    /// Returns the `SpecId` for the given `u8`.
    #[inline]
    pub fn try_from_u8(spec_id: u8) -> Option<Self> {
        Self::n(spec_id)
    }

    /// Returns `true` if `other` is active in this hardfork.
    #[inline]
    pub const fn is_enabled_in(self, other: Self) -> bool {
        self as u8 >= other as u8
    }

    /// Returns the display name of the hardfork.
    pub const fn name(self) -> &'static str {
        match self {
            FRONTIER => id::FRONTIER,
            FRONTIER_THAWING => id::FRONTIER_THAWING,
            HOMESTEAD => id::HOMESTEAD,
            DAO_FORK => id::DAO_FORK,
            TANGERINE => id::TANGERINE,
            SPURIOUS_DRAGON => id::SPURIOUS_DRAGON,
            BYZANTIUM => id::BYZANTIUM,
            CONSTANTINOPLE => id::CONSTANTINOPLE,
            PETERSBURG => id::PETERSBURG,
            ISTANBUL => id::ISTANBUL,
            MUIR_GLACIER => id::MUIR_GLACIER,
            BERLIN => id::BERLIN,
            LONDON => id::LONDON,
            ARROW_GLACIER => id::ARROW_GLACIER,
            GRAY_GLACIER => id::GRAY_GLACIER,
            MERGE => id::MERGE,
            SHANGHAI => id::SHANGHAI,
            LATEST => id::LATEST,
        }
    }
}

/// String identifiers for hardforks.
pub mod id {
    pub const FRONTIER: &str = "Frontier";
    pub const FRONTIER_THAWING: &str = "Frontier Thawing";
    pub const HOMESTEAD: &str = "Homestead";
    pub const DAO_FORK: &str = "DAO Fork";
    pub const TANGERINE: &str = "Tangerine";
    pub const SPURIOUS_DRAGON: &str = "Spurious";
    pub const BYZANTIUM: &str = "Byzantium";
    pub const CONSTANTINOPLE: &str = "Constantinople";
    pub const PETERSBURG: &str = "Petersburg";
    pub const ISTANBUL: &str = "Istanbul";
    pub const MUIR_GLACIER: &str = "MuirGlacier";
    pub const BERLIN: &str = "Berlin";
    pub const LONDON: &str = "London";
    pub const ARROW_GLACIER: &str = "Arrow Glacier";
    pub const GRAY_GLACIER: &str = "Gray Glacier";
    pub const MERGE: &str = "Merge";
    pub const SHANGHAI: &str = "Shanghai";
    pub const LATEST: &str = "Latest";
}

/// Error returned when parsing an unknown hardfork name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown hardfork name")]
pub struct UnknownHardfork;

impl FromStr for SpecId {
    type Err = UnknownHardfork;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(match name {
            id::FRONTIER => Self::FRONTIER,
            id::FRONTIER_THAWING => Self::FRONTIER_THAWING,
            id::HOMESTEAD => Self::HOMESTEAD,
            id::DAO_FORK => Self::DAO_FORK,
            id::TANGERINE => Self::TANGERINE,
            id::SPURIOUS_DRAGON => Self::SPURIOUS_DRAGON,
            id::BYZANTIUM => Self::BYZANTIUM,
            id::CONSTANTINOPLE => Self::CONSTANTINOPLE,
            id::PETERSBURG => Self::PETERSBURG,
            id::ISTANBUL => Self::ISTANBUL,
            id::MUIR_GLACIER => Self::MUIR_GLACIER,
            id::BERLIN => Self::BERLIN,
            id::LONDON => Self::LONDON,
            id::ARROW_GLACIER => Self::ARROW_GLACIER,
            id::GRAY_GLACIER => Self::GRAY_GLACIER,
            id::MERGE => Self::MERGE,
            id::SHANGHAI => Self::SHANGHAI,
            id::LATEST => Self::LATEST,
            _ => return Err(UnknownHardfork),
        })
    }
}

impl From<SpecId> for &'static str {
    fn from(spec_id: SpecId) -> Self {
        spec_id.name()
    }
}

impl fmt::Display for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_activation() {
        assert!(BERLIN.is_enabled_in(ISTANBUL));
        assert!(!PETERSBURG.is_enabled_in(ISTANBUL));
        assert!(LATEST.is_enabled_in(SHANGHAI));
        assert!(FRONTIER.is_enabled_in(FRONTIER));
    }

    #[test]
    fn names_roundtrip() {
        for n in 0..=u8::MAX {
            if let Some(spec) = SpecId::try_from_u8(n) {
                assert_eq!(spec.name().parse::<SpecId>(), Ok(spec));
            }
        }
        assert_eq!("Istanbul".parse::<SpecId>(), Ok(ISTANBUL));
        assert_eq!("Paris".parse::<SpecId>(), Err(UnknownHardfork));
    }
}
