//! Derived player metrics.
//!
//! Pure functions used by the aggregator:
//! - Win rate as a one-decimal percentage
//! - Achievement labels from placements
//! - The synthetic earnings estimate

use serde::{Deserialize, Serialize};

/// Placements at or above this earn an achievement label.
pub const ACHIEVEMENT_CUTOFF: u32 = 3;

/// Win rate as a percentage rounded to one decimal, in [0, 100].
/// Zero when there are no tournaments.
pub fn calculate_win_rate(wins: u32, tournaments: u32) -> f64 {
    if tournaments == 0 {
        return 0.0;
    }
    let pct = wins.min(tournaments) as f64 / tournaments as f64 * 100.0;
    round_to_tenth(pct)
}

/// Round to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// "<game> Champion" for a win, "<game> Top 3" for 2nd/3rd, nothing below.
pub fn achievement_label(game: &str, placement: u32) -> Option<String> {
    match placement {
        1 => Some(format!("{} Champion", game)),
        p if p > 1 && p <= ACHIEVEMENT_CUTOFF => Some(format!("{} Top 3", game)),
        _ => None,
    }
}

/// Constants for the earnings estimate.
///
/// start.gg does not expose prize payouts through the standings we query,
/// so this is a made-up linear score. Anything shown to users must label
/// it as an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsModel {
    #[serde(default = "default_per_win")]
    pub per_win: u64,

    #[serde(default = "default_per_tournament")]
    pub per_tournament: u64,
}

fn default_per_win() -> u64 {
    5000
}

fn default_per_tournament() -> u64 {
    250
}

impl Default for EarningsModel {
    fn default() -> Self {
        Self {
            per_win: default_per_win(),
            per_tournament: default_per_tournament(),
        }
    }
}

impl EarningsModel {
    /// Saturates at `u64::MAX` rather than overflowing on large constants.
    pub fn estimate(&self, wins: u32, tournaments: u32) -> u64 {
        self.per_win
            .saturating_mul(wins as u64)
            .saturating_add(self.per_tournament.saturating_mul(tournaments as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_win_rate() {
        assert_eq!(calculate_win_rate(2, 2), 100.0);
        assert_eq!(calculate_win_rate(0, 1), 0.0);
        assert_eq!(calculate_win_rate(2, 3), 66.7);
        assert_eq!(calculate_win_rate(1, 3), 33.3);
    }

    #[test]
    fn test_calculate_win_rate_no_tournaments() {
        assert_eq!(calculate_win_rate(0, 0), 0.0);
        assert_eq!(calculate_win_rate(3, 0), 0.0);
    }

    #[test]
    fn test_calculate_win_rate_never_exceeds_100() {
        assert_eq!(calculate_win_rate(5, 3), 100.0);
    }

    #[test]
    fn test_achievement_label() {
        assert_eq!(
            achievement_label("Tekken 8", 1).as_deref(),
            Some("Tekken 8 Champion")
        );
        assert_eq!(
            achievement_label("Tekken 8", 2).as_deref(),
            Some("Tekken 8 Top 3")
        );
        assert_eq!(
            achievement_label("Tekken 8", 3).as_deref(),
            Some("Tekken 8 Top 3")
        );
        assert_eq!(achievement_label("Tekken 8", 4), None);
        assert_eq!(achievement_label("Tekken 8", 0), None);
    }

    #[test]
    fn test_earnings_estimate() {
        let model = EarningsModel::default();
        assert_eq!(model.estimate(0, 0), 0);
        assert_eq!(model.estimate(2, 3), 10_750);

        let flat = EarningsModel {
            per_win: 100,
            per_tournament: 0,
        };
        assert_eq!(flat.estimate(4, 10), 400);
    }

    #[test]
    fn test_earnings_estimate_saturates() {
        let huge = EarningsModel {
            per_win: u64::MAX / 2,
            per_tournament: 250,
        };
        assert_eq!(huge.estimate(3, 0), u64::MAX);
        assert_eq!(huge.estimate(1, 0), u64::MAX / 2);

        let huge = EarningsModel {
            per_win: u64::MAX,
            per_tournament: u64::MAX,
        };
        assert_eq!(huge.estimate(1, 1), u64::MAX);
    }
}
