use std::fmt;
use std::str::FromStr;

use comfy_table::Table;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::payout::{PayoutSummary, MAX_PICKS};
use crate::props::Prop;

/// Which side of a prop's line a pick takes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Over,
    Under,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Over => write!(f, "OVER"),
            Side::Under => write!(f, "UNDER"),
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "over" | "o" => Ok(Side::Over),
            "under" | "u" => Ok(Side::Under),
            _ => Err(Error::UnknownSide(s.to_string())),
        }
    }
}

/// A prop plus the side the user took on it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pick {
    #[serde(flatten)]
    pub prop: Prop,

    #[serde(rename = "pick")]
    pub side: Side,
}

impl Pick {
    pub fn new(prop: Prop, side: Side) -> Self {
        Self { prop, side }
    }
}

impl fmt::Display for Pick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} (Line: {}): {}",
            self.prop.player, self.prop.stat, self.prop.line, self.side
        )
    }
}

/// The picks a user is putting together, never more than 8 of them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(try_from = "Vec<Pick>", into = "Vec<Pick>")]
pub struct PickSlip {
    picks: Vec<Pick>,
}

impl PickSlip {
    pub fn new() -> Self {
        Self {
            picks: Vec::with_capacity(MAX_PICKS),
        }
    }

    /// Adds a pick to the slip.
    /// A full slip, the opposite side of a line already on the slip, or the same pick twice
    /// are all refused and leave the slip untouched.
    pub fn add(&mut self, pick: Pick) -> Result<()> {
        if self.is_full() {
            return Err(Error::SlipFull);
        }

        if let Some(existing) = self.picks.iter().find(|p| p.prop.same_line(&pick.prop)) {
            let Prop { player, stat, line } = pick.prop;

            return Err(if existing.side != pick.side {
                Error::OppositePick { player, stat, line }
            } else {
                Error::DuplicatePick { player, stat, line }
            });
        }

        debug!(pick = %pick, picks = self.picks.len() + 1, "added pick");
        self.picks.push(pick);

        Ok(())
    }

    /// Removes the pick at `index`, zero-based.
    pub fn remove(&mut self, index: usize) -> Result<Pick> {
        if index >= self.picks.len() {
            return Err(Error::PickIndexOutOfRange {
                index,
                len: self.picks.len(),
            });
        }

        let removed = self.picks.remove(index);
        debug!(pick = %removed, picks = self.picks.len(), "removed pick");

        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.picks.clear();
    }

    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.picks.len() >= MAX_PICKS
    }

    /// Every multiplier on offer for the slip as it stands.
    pub fn payouts(&self) -> PayoutSummary {
        PayoutSummary::for_picks(self.len())
    }

    /// Returns a table visualization of the picks
    pub fn table(&self) -> String {
        let mut table = Table::new();

        table.set_header(vec!["#", "Player", "Stat", "Line", "Pick"]);

        for (index, pick) in self.picks.iter().enumerate() {
            table.add_row(vec![
                (index + 1).to_string(),
                pick.prop.player.clone(),
                pick.prop.stat.clone(),
                pick.prop.line.clone(),
                pick.side.to_string(),
            ]);
        }

        table.to_string()
    }
}

impl TryFrom<Vec<Pick>> for PickSlip {
    type Error = Error;

    fn try_from(picks: Vec<Pick>) -> Result<Self> {
        let mut slip = PickSlip::new();
        for pick in picks {
            slip.add(pick)?;
        }
        Ok(slip)
    }
}

impl From<PickSlip> for Vec<Pick> {
    fn from(slip: PickSlip) -> Self {
        slip.picks
    }
}
