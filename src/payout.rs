use comfy_table::Table;

/// The most picks a single slip can carry.
pub const MAX_PICKS: usize = 8;

/// Flex needs at least this many picks before any tier pays.
pub const MIN_FLEX_PICKS: usize = 3;

/// The two-miss Flex tier only exists from this many picks upwards.
pub const MIN_TWO_MISS_PICKS: usize = 6;

/// The deepest Flex tier, in missed picks.
pub const MAX_FLEX_MISSES: i32 = 2;

// index is the pick count, index 0 is never paid
const POWER_PLAY_PAYOUTS: [f64; 9] = [0.0, 1.5, 3.0, 6.0, 10.0, 20.0, 35.0, 65.0, 120.0];

// FLEX_PAYOUTS[misses][n - 3], zero where the tier doesn't exist
const FLEX_PAYOUTS: [[f64; 6]; 3] = [
    [3.0, 6.0, 10.0, 25.0, 40.0, 80.0],
    [1.0, 1.5, 2.5, 2.6, 2.75, 3.0],
    [0.0, 0.0, 0.0, 0.25, 0.5, 1.0],
];

/// Returns the PowerPlay multiplier for a slip where every pick has to hit.
/// Anything outside of 1 to 8 picks pays nothing.
/// ```
/// use pickem::payout::fixed_odds_payout;
///
/// assert_eq!(fixed_odds_payout(1), 1.5);
/// assert_eq!(fixed_odds_payout(5), 20.0);
/// assert_eq!(fixed_odds_payout(8), 120.0);
/// assert_eq!(fixed_odds_payout(0), 0.0);
/// assert_eq!(fixed_odds_payout(9), 0.0);
/// assert_eq!(fixed_odds_payout(-1), 0.0);
/// ```
#[inline]
pub fn fixed_odds_payout(pick_count: i32) -> f64 {
    match usize::try_from(pick_count) {
        Ok(n @ 1..=MAX_PICKS) => POWER_PLAY_PAYOUTS[n],
        _ => 0.0,
    }
}

/// Returns the Flex multiplier for `pick_count` picks with `allowed_misses` of them wrong.
/// Combinations without a tier pay nothing, two misses need at least 6 picks.
/// ```
/// use pickem::payout::flex_payout;
///
/// assert_eq!(flex_payout(3, 0), 3.0);
/// assert_eq!(flex_payout(8, 0), 80.0);
/// assert_eq!(flex_payout(7, 1), 2.75);
/// assert_eq!(flex_payout(6, 2), 0.25);
/// assert_eq!(flex_payout(5, 2), 0.0);
/// assert_eq!(flex_payout(8, 3), 0.0);
/// assert_eq!(flex_payout(2, 0), 0.0);
/// ```
#[inline]
pub fn flex_payout(pick_count: i32, allowed_misses: i32) -> f64 {
    let (Ok(n), Ok(misses)) = (usize::try_from(pick_count), usize::try_from(allowed_misses)) else {
        return 0.0;
    };

    if !(MIN_FLEX_PICKS..=MAX_PICKS).contains(&n) {
        return 0.0;
    }

    FLEX_PAYOUTS
        .get(misses)
        .map(|tier| tier[n - MIN_FLEX_PICKS])
        .unwrap_or(0.0)
}

/// Renders a multiplier the way it is shown next to a slip.
/// ```
/// use pickem::payout::format_multiplier;
///
/// assert_eq!(format_multiplier(3.0), "3x");
/// assert_eq!(format_multiplier(2.75), "2.75x");
/// assert_eq!(format_multiplier(0.25), "0.25x");
/// assert_eq!(format_multiplier(0.0), "0x");
/// ```
pub fn format_multiplier(multiplier: f64) -> String {
    format!("{multiplier}x")
}

/// Every multiplier on offer for a given number of picks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayoutSummary {
    pub picks: usize,
    pub power_play: f64,
    pub flex_perfect: f64,
    pub flex_one_miss: f64,

    /// None below 6 picks, where the tier isn't offered at all.
    pub flex_two_miss: Option<f64>,
}

impl PayoutSummary {
    pub fn for_picks(picks: usize) -> Self {
        let n = i32::try_from(picks).unwrap_or(i32::MAX);

        Self {
            picks,
            power_play: fixed_odds_payout(n),
            flex_perfect: flex_payout(n, 0),
            flex_one_miss: flex_payout(n, 1),
            flex_two_miss: (picks >= MIN_TWO_MISS_PICKS).then(|| flex_payout(n, 2)),
        }
    }

    /// Whether any Flex tier pays for this many picks.
    pub fn flex_available(&self) -> bool {
        self.picks >= MIN_FLEX_PICKS
    }

    pub fn lines(&self, flex: bool) -> Vec<String> {
        if !flex {
            return vec![format!(
                "PowerPlay payout for {} picks: {}",
                self.picks,
                format_multiplier(self.power_play)
            )];
        }

        let mut lines = vec![
            format!(
                "Flex payout for {} picks: {}",
                self.picks,
                format_multiplier(self.flex_perfect)
            ),
            format!("- If 1 loss: {}", format_multiplier(self.flex_one_miss)),
        ];

        if let Some(two_miss) = self.flex_two_miss {
            lines.push(format!("- If 2 losses: {}", format_multiplier(two_miss)));
        }

        lines
    }
}

/// Returns a table of every tier for 1 through 8 picks.
/// Cells where a tier isn't offered are left blank.
pub fn payout_table() -> String {
    let mut table = Table::new();

    table.set_header(vec!["Picks", "PowerPlay", "Flex", "Flex (1 miss)", "Flex (2 misses)"]);

    for picks in 1..=MAX_PICKS {
        let summary = PayoutSummary::for_picks(picks);

        let flex_cell = |value: f64| {
            if summary.flex_available() {
                format_multiplier(value)
            } else {
                String::new()
            }
        };

        table.add_row(vec![
            picks.to_string(),
            format_multiplier(summary.power_play),
            flex_cell(summary.flex_perfect),
            flex_cell(summary.flex_one_miss),
            summary
                .flex_two_miss
                .map(format_multiplier)
                .unwrap_or_default(),
        ]);
    }

    table.to_string()
}
