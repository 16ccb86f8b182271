use crate::error::ConfigError;
use crate::play_in::PlayInGame;
use crate::{RegionName, TeamEntry};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const EMBEDDED_BRACKET_YEAR: u16 = 2025;
const EMBEDDED_BRACKET_JSON: &str = include_str!("../data/2025_bracket.json");

// ---------------------------------------------------------------------------
// Results record: externally supplied, possibly partial mid-tournament
// ---------------------------------------------------------------------------

/// Winners by round for one region. Lists are positional: `r32[i]` won
/// first-round game `i` in bracket order, and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionResults {
    #[serde(default)]
    pub r32: Vec<String>,
    #[serde(default)]
    pub s16: Vec<String>,
    #[serde(default)]
    pub e8: Vec<String>,
    #[serde(default)]
    pub f4: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semifinal {
    #[serde(default)]
    pub team_a: String,
    #[serde(default)]
    pub team_b: String,
    #[serde(default)]
    pub winner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalFourResults {
    #[serde(default)]
    pub semi1: Semifinal,
    #[serde(default)]
    pub semi2: Semifinal,
    #[serde(default)]
    pub champion: Option<String>,
}

/// Tournament results keyed the way they are published: one entry per region
/// plus the national layer and the First Four winners.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsRecord {
    #[serde(default)]
    pub final_four: Option<FinalFourResults>,
    /// Play-in game id -> winner name.
    #[serde(default)]
    pub first_four: BTreeMap<String, String>,
    #[serde(flatten)]
    pub regions: BTreeMap<RegionName, RegionResults>,
}

impl ResultsRecord {
    pub fn region(&self, region: RegionName) -> Option<&RegionResults> {
        self.regions.get(&region)
    }
}

// ---------------------------------------------------------------------------
// Bracket configuration
// ---------------------------------------------------------------------------

/// Everything needed to build a bracket: seed lists, play-in games and
/// optional results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketConfig {
    #[serde(default)]
    pub year: Option<u16>,
    pub regions: BTreeMap<RegionName, Vec<TeamEntry>>,
    #[serde(default)]
    pub first_four: Vec<PlayInGame>,
    #[serde(default)]
    pub results: Option<ResultsRecord>,
}

impl BracketConfig {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a configuration file. A missing `year` is taken from the file
    /// name, then from the current season.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_json(&content)?;
        if config.year.is_none() {
            let year = infer_year_from_path(&path.to_string_lossy())
                .unwrap_or_else(|| season_tournament_year(Utc::now()) as u16);
            config.year = Some(year);
        }
        Ok(config)
    }

    /// The built-in 2025 field, First Four and final results.
    pub fn embedded() -> Result<Self, ConfigError> {
        let mut config = Self::from_json(EMBEDDED_BRACKET_JSON)?;
        config.year.get_or_insert(EMBEDDED_BRACKET_YEAR);
        Ok(config)
    }
}

fn infer_year_from_path(path: &str) -> Option<u16> {
    path.split(|c: char| !c.is_ascii_digit())
        .find_map(|token| {
            if token.len() == 4 {
                token.parse::<u16>().ok()
            } else {
                None
            }
        })
        .filter(|y| (2000..=2100).contains(y))
}

/// Tournament year for a moment in the season. In Nov/Dec the next
/// tournament is in the following calendar year.
pub fn season_tournament_year(now: DateTime<Utc>) -> i32 {
    if now.month() >= 11 { now.year() + 1 } else { now.year() }
}
