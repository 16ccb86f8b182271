//! Wire types for a season predictions file, and their mapping to the
//! analysis records the pool works with.
use crate::client::{ApiError, ApiResult, TeamSource};
use crate::outcome::WinDistribution;
use crate::{PlayerProfile, PoolTeamSummary, TeamAnalysis, TeamEntry, TeamStats};
use log::{debug, info};
use serde::Deserialize;
use std::path::Path;

/// Players listed on a team profile.
const TOP_PLAYER_COUNT: usize = 5;

#[derive(Deserialize, Default, Debug, Clone)]
pub struct RawTeam {
    pub name: String,
    #[serde(default)]
    pub tournament_seed: Option<u8>,
    #[serde(default)]
    pub conference: String,
    #[serde(default)]
    pub wins: u16,
    #[serde(default)]
    pub losses: u16,
    /// Roster average, total inches.
    #[serde(default)]
    pub avg_height: f64,
    #[serde(default)]
    pub players: Option<Vec<RawPlayer>>,
    #[serde(default)]
    pub profile_summary: String,
    #[serde(default)]
    pub win_probability_distribution: RawDistribution,
}

/// Bucket probabilities keyed "0", "1" and "2+". Missing keys read as 0.
#[derive(Deserialize, Default, Debug, Clone, Copy)]
pub struct RawDistribution {
    #[serde(rename = "0", default)]
    pub zero: f64,
    #[serde(rename = "1", default)]
    pub one: f64,
    #[serde(rename = "2+", default)]
    pub two_plus: f64,
}

/// Season totals for one player.
#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct RawPlayer {
    pub name: String,
    /// 0 = G, 1 = G/F, 2 = F, 3 = F/C, 4 = C
    pub position: u8,
    /// Total inches.
    pub height: u32,
    pub games: u32,
    pub minutes: f64,
    pub points: f64,
    pub free_throws_made: f64,
    pub free_throws_attempted: f64,
    pub two_point_field_goals_made: f64,
    pub two_point_field_goals_attempted: f64,
    pub three_point_field_goals_made: f64,
    pub three_point_field_goals_attempted: f64,
    pub blocks: f64,
    pub offensive_rebounds: f64,
    pub defensive_rebounds: f64,
    pub turnovers: f64,
    pub steals: f64,
    pub fouls: f64,
}

/// A season predictions file held in memory.
#[derive(Debug, Clone, Default)]
pub struct PredictionsFile {
    teams: Vec<RawTeam>,
}

impl PredictionsFile {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let teams: Vec<RawTeam> = serde_json::from_str(content)?;
        Ok(Self { teams })
    }

    pub fn load(path: &Path) -> ApiResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ApiError::NotFound(format!("could not read {}: {e}", path.display())))?;
        let file = Self::from_json(&content)
            .map_err(|e| ApiError::Other(format!("invalid predictions json at {}: {e}", path.display())))?;
        info!("loaded {} teams from {}", file.teams.len(), path.display());
        Ok(file)
    }

    /// Case-insensitive lookup by display name.
    pub fn find(&self, name: &str) -> Option<&RawTeam> {
        let needle = name.to_lowercase();
        let found = self.teams.iter().find(|t| t.name.to_lowercase() == needle);
        if found.is_none() {
            debug!("{name:?} not in predictions");
        }
        found
    }

    /// Seeded teams only, by seed then name.
    pub fn roster(&self) -> Vec<TeamEntry> {
        let mut roster: Vec<TeamEntry> = self
            .teams
            .iter()
            .filter_map(|t| t.tournament_seed.map(|seed| TeamEntry::new(seed, t.name.clone())))
            .collect();
        roster.sort_by(|a, b| a.seed.cmp(&b.seed).then_with(|| a.name.cmp(&b.name)));
        roster
    }
}

impl TeamSource for PredictionsFile {
    async fn roster(&self) -> ApiResult<Vec<TeamEntry>> {
        Ok(PredictionsFile::roster(self))
    }

    async fn analysis(&self, name: &str) -> ApiResult<TeamAnalysis> {
        self.find(name)
            .map(map_team_analysis)
            .ok_or_else(|| ApiError::NotFound(format!("no analysis for {name}")))
    }

    async fn pool_summaries(&self, names: &[String]) -> ApiResult<Vec<PoolTeamSummary>> {
        Ok(names
            .iter()
            .filter_map(|name| self.find(name))
            .map(map_pool_summary)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Mapping: raw predictions -> analysis records
// ---------------------------------------------------------------------------

pub fn map_distribution(raw: &RawDistribution) -> WinDistribution {
    WinDistribution::new(raw.zero, raw.one, raw.two_plus)
}

pub fn map_pool_summary(team: &RawTeam) -> PoolTeamSummary {
    PoolTeamSummary {
        name: team.name.clone(),
        seed: team.tournament_seed.unwrap_or(0),
        conference: team.conference.clone(),
        win_probability_distribution: map_distribution(&team.win_probability_distribution),
    }
}

/// Full profile. Historical similar teams are not part of a predictions
/// file, so that list is empty.
pub fn map_team_analysis(team: &RawTeam) -> TeamAnalysis {
    let players = team.players.as_deref().unwrap_or_default();
    let mut by_minutes: Vec<&RawPlayer> = players.iter().collect();
    by_minutes.sort_by(|a, b| b.minutes.total_cmp(&a.minutes));

    TeamAnalysis {
        name: team.name.clone(),
        seed: team.tournament_seed.unwrap_or(0),
        wins: team.wins,
        losses: team.losses,
        conference: team.conference.clone(),
        win_probability_distribution: map_distribution(&team.win_probability_distribution),
        top_players: by_minutes.into_iter().take(TOP_PLAYER_COUNT).map(map_player).collect(),
        team_stats: Some(map_team_stats(team, players)),
        similar_teams: Vec::new(),
        profile_summary: team.profile_summary.clone(),
    }
}

fn map_player(player: &RawPlayer) -> PlayerProfile {
    PlayerProfile {
        name: player.name.clone(),
        position: position_label(player.position).to_string(),
        height: format_height(player.height),
        avg_minutes: per_game(player.minutes, player.games, 1),
        avg_points: per_game(player.points, player.games, 1),
        free_throw_pct: percentage(player.free_throws_made, player.free_throws_attempted, 1),
    }
}

fn map_team_stats(team: &RawTeam, players: &[RawPlayer]) -> TeamStats {
    let games = u32::from(team.wins) + u32::from(team.losses);
    let total = |stat: fn(&RawPlayer) -> f64| players.iter().map(stat).sum::<f64>();

    TeamStats {
        avg_height: format_height(team.avg_height.round().max(0.0) as u32),
        two_point_pct: percentage(
            total(|p| p.two_point_field_goals_made),
            total(|p| p.two_point_field_goals_attempted),
            2,
        ),
        three_point_pct: percentage(
            total(|p| p.three_point_field_goals_made),
            total(|p| p.three_point_field_goals_attempted),
            2,
        ),
        blocks: per_game(total(|p| p.blocks), games, 2),
        offensive_rebounds: per_game(total(|p| p.offensive_rebounds), games, 2),
        defensive_rebounds: per_game(total(|p| p.defensive_rebounds), games, 2),
        turnovers: per_game(total(|p| p.turnovers), games, 2),
        steals: per_game(total(|p| p.steals), games, 2),
        fouls: per_game(total(|p| p.fouls), games, 2),
    }
}

pub fn position_label(code: u8) -> &'static str {
    match code {
        0 => "G",
        1 => "G/F",
        2 => "F",
        3 => "F/C",
        4 => "C",
        _ => "?",
    }
}

/// 79 -> 6'7"
pub fn format_height(total_inches: u32) -> String {
    format!("{}'{}\"", total_inches / 12, total_inches % 12)
}

fn per_game(total: f64, games: u32, places: i32) -> f64 {
    if games == 0 {
        return 0.0;
    }
    round_to(total / f64::from(games), places)
}

fn percentage(made: f64, attempted: f64, places: i32) -> f64 {
    if attempted <= 0.0 {
        return 0.0;
    }
    round_to(made / attempted * 100.0, places)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
