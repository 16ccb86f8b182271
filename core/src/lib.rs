pub mod bracket;
pub mod client;
pub mod config;
pub mod error;
pub mod outcome;
pub mod play_in;
pub mod pool;
pub mod predictions;
pub mod rounds;
pub mod seeds;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use bracket::{Bracket, BracketView, SeedLookup};
pub use client::{AnalysisApi, ApiError, ApiResult, TeamSource};
pub use config::{BracketConfig, ResultsRecord};
pub use error::{ConfigError, PoolError, ResultsIssue};
pub use outcome::{ConfidenceBand, ExpectedOutcome, WinBucket, WinDistribution};
pub use pool::{Pool, PoolAggregate, PoolStats};
pub use predictions::PredictionsFile;
pub use seeds::{SeedTable, SeedTier};

// ---------------------------------------------------------------------------
// Bracket domain types
// ---------------------------------------------------------------------------

/// One quarter of the bracket. Ordering follows the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegionName {
    East,
    West,
    South,
    Midwest,
}

impl RegionName {
    pub const ALL: [RegionName; 4] = [
        RegionName::East,
        RegionName::West,
        RegionName::South,
        RegionName::Midwest,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RegionName::East => "East",
            RegionName::West => "West",
            RegionName::South => "South",
            RegionName::Midwest => "Midwest",
        }
    }
}

impl fmt::Display for RegionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RegionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegionName::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown region {s:?}"))
    }
}

/// Navigation axis over the tournament. Ordered from earliest to latest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoundKind {
    FirstFour, // Play-in games
    #[default]
    First, // Round of 64
    Second, // Round of 32
    Sweet16,
    Elite8,
    FinalFour, // National semifinals
    Championship,
}

impl RoundKind {
    /// The four rounds projected inside a single region.
    pub const REGIONAL: [RoundKind; 4] = [
        RoundKind::First,
        RoundKind::Second,
        RoundKind::Sweet16,
        RoundKind::Elite8,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RoundKind::FirstFour => "First Four",
            RoundKind::First => "Round of 64",
            RoundKind::Second => "Round of 32",
            RoundKind::Sweet16 => "Sweet 16",
            RoundKind::Elite8 => "Elite 8",
            RoundKind::FinalFour => "Final Four",
            RoundKind::Championship => "Championship",
        }
    }

    /// Team slots in this round for one region (First Four and the national
    /// rounds count the whole field).
    pub fn slot_count(&self) -> usize {
        match self {
            RoundKind::FirstFour => 8,
            RoundKind::First => 16,
            RoundKind::Second => 8,
            RoundKind::Sweet16 => 4,
            RoundKind::Elite8 => 2,
            RoundKind::FinalFour => 4,
            RoundKind::Championship => 2,
        }
    }

    pub fn is_final_four(&self) -> bool {
        matches!(self, RoundKind::FinalFour | RoundKind::Championship)
    }

    pub fn prev(self) -> Option<Self> {
        match self {
            RoundKind::FirstFour => None,
            RoundKind::First => Some(RoundKind::FirstFour),
            RoundKind::Second => Some(RoundKind::First),
            RoundKind::Sweet16 => Some(RoundKind::Second),
            RoundKind::Elite8 => Some(RoundKind::Sweet16),
            RoundKind::FinalFour => Some(RoundKind::Elite8),
            RoundKind::Championship => Some(RoundKind::FinalFour),
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            RoundKind::FirstFour => Some(RoundKind::First),
            RoundKind::First => Some(RoundKind::Second),
            RoundKind::Second => Some(RoundKind::Sweet16),
            RoundKind::Sweet16 => Some(RoundKind::Elite8),
            RoundKind::Elite8 => Some(RoundKind::FinalFour),
            RoundKind::FinalFour => Some(RoundKind::Championship),
            RoundKind::Championship => None,
        }
    }
}

/// A team as listed in a seed table or roster: `{ seed, name }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub seed: u8,
    pub name: String,
}

impl TeamEntry {
    pub fn new(seed: u8, name: impl Into<String>) -> Self {
        Self { seed, name: name.into() }
    }
}

/// A single bracket slot. `seed = None` means the seed is resolved by name
/// (or unknown); an empty `name` is an unfilled ("TBD") slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSlot {
    pub seed: Option<u8>,
    pub name: String,
    /// True when this team won the game the slot belongs to.
    pub advanced: bool,
}

impl TeamSlot {
    /// Unfilled slot with no seed.
    pub fn tbd() -> Self {
        Self::default()
    }

    pub fn is_filled(&self) -> bool {
        !self.name.is_empty()
    }

    /// "(1) Duke", "(-) TBD" etc.
    pub fn label(&self) -> String {
        let seed_no = self.seed.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
        let team = if self.is_filled() { self.name.as_str() } else { "TBD" };
        format!("({seed_no}) {team}")
    }
}

/// One projected round of a region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Round {
    pub kind: RoundKind,
    pub slots: Vec<TeamSlot>,
}

/// Optional data that drives structure. Used for results so every projection
/// path handles "no results yet" explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Resolution<T> {
    #[default]
    Unresolved,
    Resolved(T),
}

impl<T> Resolution<T> {
    pub fn as_ref(&self) -> Resolution<&T> {
        match self {
            Resolution::Unresolved => Resolution::Unresolved,
            Resolution::Resolved(value) => Resolution::Resolved(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Unresolved => Resolution::Unresolved,
            Resolution::Resolved(value) => Resolution::Resolved(f(value)),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Option<U>) -> Resolution<U> {
        match self {
            Resolution::Unresolved => Resolution::Unresolved,
            Resolution::Resolved(value) => f(value).into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

impl<T> From<Option<T>> for Resolution<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Resolution::Resolved(v),
            None => Resolution::Unresolved,
        }
    }
}

// ---------------------------------------------------------------------------
// External team records: shapes served by the analysis service
// ---------------------------------------------------------------------------

/// Key statistics for one player on a team profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub position: String, // "G", "F", "C", "G/F", "F/C"
    pub height: String,   // 6'11"
    pub avg_minutes: f64,
    pub avg_points: f64,
    pub free_throw_pct: f64,
}

/// Per-game team averages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub avg_height: String,
    pub two_point_pct: f64,
    pub three_point_pct: f64,
    pub blocks: f64,
    pub offensive_rebounds: f64,
    pub defensive_rebounds: f64,
    pub turnovers: f64,
    pub steals: f64,
    pub fouls: f64,
}

/// A historically similar team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarTeam {
    pub name: String,
    pub year: u16,
    pub tournament_wins: u8,
    pub similarity: f64,
}

/// Full analysis profile for one tournament team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAnalysis {
    pub name: String,
    pub seed: u8,
    pub wins: u16,
    pub losses: u16,
    #[serde(default)]
    pub conference: String,
    pub win_probability_distribution: WinDistribution,
    #[serde(default)]
    pub top_players: Vec<PlayerProfile>,
    #[serde(default)]
    pub team_stats: Option<TeamStats>,
    #[serde(default)]
    pub similar_teams: Vec<SimilarTeam>,
    #[serde(default)]
    pub profile_summary: String,
}

impl TeamAnalysis {
    pub fn summary(&self) -> PoolTeamSummary {
        PoolTeamSummary {
            name: self.name.clone(),
            seed: self.seed,
            conference: self.conference.clone(),
            win_probability_distribution: self.win_probability_distribution,
        }
    }
}

/// The subset of a team analysis needed to fill a pool slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolTeamSummary {
    pub name: String,
    pub seed: u8,
    #[serde(default)]
    pub conference: String,
    pub win_probability_distribution: WinDistribution,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_kind_navigation() {
        assert_eq!(RoundKind::First.next(), Some(RoundKind::Second));
        assert_eq!(RoundKind::Championship.next(), None);
        assert_eq!(RoundKind::FirstFour.prev(), None);
        assert!(RoundKind::FinalFour.is_final_four());
        assert!(!RoundKind::Elite8.is_final_four());
    }

    #[test]
    fn regional_rounds_halve_in_size() {
        let sizes: Vec<usize> = RoundKind::REGIONAL.iter().map(|r| r.slot_count()).collect();
        assert_eq!(sizes, vec![16, 8, 4, 2]);
    }

    #[test]
    fn region_names_parse_case_insensitively() {
        assert_eq!("midwest".parse::<RegionName>(), Ok(RegionName::Midwest));
        assert_eq!(" South ".parse::<RegionName>(), Ok(RegionName::South));
        assert!("North".parse::<RegionName>().is_err());
    }

    #[test]
    fn tbd_slot_label() {
        assert_eq!(TeamSlot::tbd().label(), "(-) TBD");
        let slot = TeamSlot { seed: Some(1), name: "Duke".into(), advanced: false };
        assert_eq!(slot.label(), "(1) Duke");
    }

    #[test]
    fn resolution_from_option() {
        assert_eq!(Resolution::from(Some(3)), Resolution::Resolved(3));
        assert_eq!(Resolution::<u8>::from(None), Resolution::Unresolved);
        assert!(!Resolution::<u8>::Unresolved.is_resolved());
    }

    #[test]
    fn analysis_summary_keeps_slot_fields() {
        let analysis = TeamAnalysis {
            name: "Duke".into(),
            seed: 1,
            wins: 35,
            losses: 4,
            conference: "ACC".into(),
            win_probability_distribution: WinDistribution::new(0.1, 0.2, 0.7),
            top_players: vec![],
            team_stats: None,
            similar_teams: vec![],
            profile_summary: String::new(),
        };
        let summary = analysis.summary();
        assert_eq!(summary.name, "Duke");
        assert_eq!(summary.seed, 1);
        assert_eq!(summary.conference, "ACC");
        assert_eq!(summary.win_probability_distribution.two_plus_wins, 0.7);
    }
}
