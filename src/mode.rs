use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::payout::{fixed_odds_payout, flex_payout, MIN_FLEX_PICKS};

/// How a slip pays out.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WagerMode {
    /// Every pick has to hit, fixed multiplier.
    #[default]
    PowerPlay,

    /// Pays on a sliding scale with up to two missed picks.
    Flex,
}

impl WagerMode {
    /// The multiplier a slip of `pick_count` picks settles at in this mode.
    /// Flex slips settle at the perfect tier.
    /// ```
    /// use pickem::mode::WagerMode;
    ///
    /// assert_eq!(WagerMode::PowerPlay.multiplier(4), 10.0);
    /// assert_eq!(WagerMode::Flex.multiplier(4), 6.0);
    /// ```
    pub fn multiplier(&self, pick_count: usize) -> f64 {
        let n = i32::try_from(pick_count).unwrap_or(i32::MAX);

        match self {
            WagerMode::PowerPlay => fixed_odds_payout(n),
            WagerMode::Flex => flex_payout(n, 0),
        }
    }

    /// Returns the other mode.
    /// Moving into Flex is refused while the slip has fewer than 3 picks,
    /// moving back to PowerPlay always works.
    pub fn toggled(&self, pick_count: usize) -> Result<WagerMode> {
        match self {
            WagerMode::PowerPlay if pick_count < MIN_FLEX_PICKS => {
                Err(Error::FlexUnavailable { picks: pick_count })
            }
            WagerMode::PowerPlay => Ok(WagerMode::Flex),
            WagerMode::Flex => Ok(WagerMode::PowerPlay),
        }
    }

    pub fn is_flex(&self) -> bool {
        matches!(self, WagerMode::Flex)
    }
}

impl fmt::Display for WagerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WagerMode::PowerPlay => write!(f, "PowerPlay"),
            WagerMode::Flex => write!(f, "Flex"),
        }
    }
}

impl FromStr for WagerMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "powerplay" | "power-play" | "power_play" | "pp" => Ok(WagerMode::PowerPlay),
            "flex" => Ok(WagerMode::Flex),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}
