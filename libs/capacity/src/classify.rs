//! Load tiers for display.
//!
//! One rule is used by every view. Tiers never gate validation.

use std::fmt;

use serde::Serialize;

use crate::MAX_TOTAL_CAPACITY;

/// Highest total still shown as [`Tier::Normal`].
pub const NORMAL_MAX: i32 = 50;

/// Highest total still shown as [`Tier::Warning`].
pub const WARNING_MAX: i32 = 80;

/// Display severity of an engineer's total capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Normal,
    Warning,
    Overloaded,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Overloaded => "overloaded",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a total percentage to its tier.
pub fn classify(total: i32) -> Tier {
    if total <= NORMAL_MAX {
        Tier::Normal
    } else if total <= WARNING_MAX {
        Tier::Warning
    } else {
        Tier::Overloaded
    }
}

/// Fill of a capacity bar, in percent. Overbooked totals render full.
pub fn bar_fill(total: i32) -> u8 {
    // Clamped to 0..=100, so the cast is lossless.
    total.clamp(0, MAX_TOTAL_CAPACITY) as u8
}
