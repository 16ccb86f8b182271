use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability of each tournament win-count bucket. Values are taken as given;
/// the three need not sum to 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WinDistribution {
    pub zero_wins: f64,
    pub one_win: f64,
    pub two_plus_wins: f64,
}

impl WinDistribution {
    pub fn new(zero_wins: f64, one_win: f64, two_plus_wins: f64) -> Self {
        Self { zero_wins, one_win, two_plus_wins }
    }

    pub fn probability(&self, bucket: WinBucket) -> f64 {
        match bucket {
            WinBucket::Zero => self.zero_wins,
            WinBucket::One => self.one_win,
            WinBucket::TwoPlus => self.two_plus_wins,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WinBucket {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2+")]
    TwoPlus,
}

impl WinBucket {
    /// Highest bucket first. Equal probabilities resolve to the earliest
    /// bucket in this order.
    pub const BY_PRECEDENCE: [WinBucket; 3] = [WinBucket::TwoPlus, WinBucket::One, WinBucket::Zero];

    pub fn label(&self) -> &'static str {
        match self {
            WinBucket::Zero => "0",
            WinBucket::One => "1",
            WinBucket::TwoPlus => "2+",
        }
    }

    /// Integer wins this bucket counts as.
    pub fn wins(&self) -> u8 {
        match self {
            WinBucket::Zero => 0,
            WinBucket::One => 1,
            WinBucket::TwoPlus => 2,
        }
    }
}

impl fmt::Display for WinBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The single most likely win bucket for a team.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedOutcome {
    pub bucket: WinBucket,
    pub wins: u8,
    /// Probability of `bucket` alone.
    pub probability: f64,
}

impl ExpectedOutcome {
    pub fn band(&self) -> ConfidenceBand {
        confidence_band(self.probability)
    }
}

/// Pick the bucket with the highest probability. Ties go to the higher
/// bucket (2+ over 1 over 0).
pub fn expected_outcome(dist: &WinDistribution) -> ExpectedOutcome {
    let mut best = WinBucket::TwoPlus;
    for bucket in WinBucket::BY_PRECEDENCE.into_iter().skip(1) {
        // Strictly greater only, so an earlier bucket keeps a tie.
        if dist.probability(bucket) > dist.probability(best) {
            best = bucket;
        }
    }
    // A NaN in the preferred bucket never compares greater; fall back to
    // the first finite winner instead of reporting NaN.
    if dist.probability(best).is_nan() {
        best = WinBucket::BY_PRECEDENCE
            .into_iter()
            .filter(|b| !dist.probability(*b).is_nan())
            .fold(None, |acc: Option<WinBucket>, b| match acc {
                Some(a) if dist.probability(a) >= dist.probability(b) => Some(a),
                _ => Some(b),
            })
            .unwrap_or(WinBucket::Zero);
    }
    ExpectedOutcome { bucket: best, wins: best.wins(), probability: dist.probability(best) }
}

// ---------------------------------------------------------------------------
// Confidence banding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    Green,
    Yellow,
    Red,
}

impl ConfidenceBand {
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceBand::Green => "green",
            ConfidenceBand::Yellow => "yellow",
            ConfidenceBand::Red => "red",
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Band a probability in `[0, 1]`. Lower edges are inclusive: 70 % is green,
/// 50 % is yellow.
pub fn confidence_band(probability: f64) -> ConfidenceBand {
    let percent = probability * 100.0;
    if percent >= 70.0 {
        ConfidenceBand::Green
    } else if percent >= 50.0 {
        ConfidenceBand::Yellow
    } else {
        ConfidenceBand::Red
    }
}

/// "62.5%"
pub fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_way_tie_resolves_to_highest_bucket() {
        let outcome = expected_outcome(&WinDistribution::new(0.4, 0.4, 0.4));
        assert_eq!(outcome.bucket.label(), "2+");
        assert_eq!(outcome.wins, 2);
        assert_eq!(outcome.probability, 0.4);
    }

    #[test]
    fn tie_between_zero_and_one_resolves_to_one() {
        let outcome = expected_outcome(&WinDistribution::new(0.4, 0.4, 0.1));
        assert_eq!(outcome.bucket.label(), "1");
        assert_eq!(outcome.wins, 1);
    }

    #[test]
    fn clear_maximum_wins() {
        let outcome = expected_outcome(&WinDistribution::new(0.6, 0.3, 0.1));
        assert_eq!(outcome.bucket, WinBucket::Zero);
        assert_eq!(outcome.probability, 0.6);
    }

    #[test]
    fn probability_is_the_chosen_bucket_not_a_sum() {
        let outcome = expected_outcome(&WinDistribution::new(0.2, 0.3, 0.5));
        assert_eq!(outcome.probability, 0.5);
    }

    #[test]
    fn resolver_is_idempotent() {
        let dist = WinDistribution::new(0.25, 0.35, 0.35);
        let first = expected_outcome(&dist);
        let second = expected_outcome(&dist);
        assert_eq!(first, second);
        assert_eq!(first.bucket, WinBucket::TwoPlus);
    }

    #[test]
    fn nan_bucket_is_never_chosen() {
        let outcome = expected_outcome(&WinDistribution::new(0.3, 0.2, f64::NAN));
        assert_eq!(outcome.bucket, WinBucket::Zero);
        assert_eq!(outcome.probability, 0.3);
    }

    #[test]
    fn banding_boundaries() {
        assert_eq!(confidence_band(0.70), ConfidenceBand::Green);
        assert_eq!(confidence_band(0.699999), ConfidenceBand::Yellow);
        assert_eq!(confidence_band(0.50), ConfidenceBand::Yellow);
        assert_eq!(confidence_band(0.4999), ConfidenceBand::Red);
        assert_eq!(confidence_band(1.0), ConfidenceBand::Green);
        assert_eq!(confidence_band(0.0), ConfidenceBand::Red);
    }

    #[test]
    fn bucket_serializes_as_label() {
        assert_eq!(serde_json::to_string(&WinBucket::TwoPlus).unwrap(), "\"2+\"");
        assert_eq!(serde_json::to_string(&ConfidenceBand::Yellow).unwrap(), "\"yellow\"");
    }

    #[test]
    fn percent_formatting() {
        assert_eq!(format_percent(0.625), "62.5%");
    }
}
