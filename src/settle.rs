use chrono::{DateTime, Local, Utc};
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::mode::WagerMode;
use crate::payout::{format_multiplier, MIN_FLEX_PICKS};
use crate::slip::PickSlip;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::Win)
    }
}

/// Decides whether a submitted slip won.
/// Nothing here has settlement authority, a verified results feed would implement this.
pub trait OutcomeSource {
    fn decide(&mut self, slip: &PickSlip) -> Outcome;
}

/// A fair coin flip per slip. Placeholder until there's a real results feed.
#[derive(Debug, Clone)]
pub struct CoinFlip<R> {
    rng: R,
}

impl<R: Rng> CoinFlip<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for CoinFlip<ThreadRng> {
    fn default() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> OutcomeSource for CoinFlip<R> {
    fn decide(&mut self, _slip: &PickSlip) -> Outcome {
        [Outcome::Win, Outcome::Loss]
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Outcome::Loss)
    }
}

/// Checks that `bet` is a positive amount the balance can cover.
pub fn validate_bet(bet: f64, balance: f64) -> Result<()> {
    if !bet.is_finite() || bet <= 0.0 {
        return Err(Error::InvalidBet(bet));
    }

    if bet > balance {
        return Err(Error::InsufficientBalance { bet, balance });
    }

    Ok(())
}

/// The result of settling one slip.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settlement {
    pub outcome: Outcome,
    pub mode: WagerMode,
    pub picks: usize,
    pub bet: f64,
    pub multiplier: f64,

    /// What a win pays back, bet included. Zero on a loss.
    pub payout: f64,

    /// Net change to the balance.
    pub profit: f64,
    pub balance_after: f64,
    pub settled_at: DateTime<Utc>,
}

impl Settlement {
    pub fn is_win(&self) -> bool {
        self.outcome.is_win()
    }

    /// A short human-readable result card.
    pub fn summary(&self) -> String {
        let when = self.settled_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");

        let mut lines = vec![
            format!("Pick Slip - {when}"),
            if self.is_win() { "WIN!" } else { "LOSS" }.to_string(),
            format!("Bet: ${:.2}", self.bet),
            format!("Mode: {}", self.mode),
            format!("Multiplier: {}", format_multiplier(self.multiplier)),
        ];

        if self.is_win() {
            lines.push(format!(
                "Payout: ${:.2} (profit: ${:.2})",
                self.payout, self.profit
            ));
        } else {
            lines.push("Better luck next time!".to_string());
        }

        lines.push(format!("New balance: ${:.2}", self.balance_after));

        lines.join("\n")
    }
}

/// Settles `slip` for `bet` out of `balance`, letting `source` decide the outcome.
/// A win pays `bet * multiplier` back, a loss forfeits the bet.
/// Flex needs at least [`MIN_FLEX_PICKS`] picks, the same gate as [`WagerMode::toggled`].
pub fn settle(
    slip: &PickSlip,
    mode: WagerMode,
    bet: f64,
    balance: f64,
    source: &mut impl OutcomeSource,
) -> Result<Settlement> {
    if slip.is_empty() {
        return Err(Error::EmptySlip);
    }

    // a slip can drop below the Flex minimum after the mode was toggled
    if mode.is_flex() && slip.len() < MIN_FLEX_PICKS {
        return Err(Error::FlexUnavailable { picks: slip.len() });
    }

    validate_bet(bet, balance)?;

    let multiplier = mode.multiplier(slip.len());
    let outcome = source.decide(slip);

    let (payout, profit) = match outcome {
        Outcome::Win => {
            let winnings = bet * multiplier;
            (winnings, winnings - bet)
        }
        Outcome::Loss => (0.0, -bet),
    };

    let settlement = Settlement {
        outcome,
        mode,
        picks: slip.len(),
        bet,
        multiplier,
        payout,
        profit,
        balance_after: balance + profit,
        settled_at: Utc::now(),
    };

    info!(
        outcome = ?settlement.outcome,
        mode = %mode,
        picks = settlement.picks,
        bet,
        multiplier,
        payout,
        balance = settlement.balance_after,
        "settled pick slip"
    );

    Ok(settlement)
}
