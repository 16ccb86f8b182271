use crate::error::PoolError;
use crate::outcome::{ConfidenceBand, ExpectedOutcome, WinDistribution, expected_outcome, format_percent};
use crate::seeds::SeedTier;
use crate::{PoolTeamSummary, TeamAnalysis, TeamEntry};
use log::debug;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Slots in a pool.
pub const POOL_SIZE: usize = 8;

/// Teams shown side by side in a comparison.
pub const MAX_COMPARE: usize = 4;

/// Anything with a name, a seed and a win distribution can be pooled.
pub trait Entrant {
    fn name(&self) -> &str;
    fn seed(&self) -> u8;
    fn distribution(&self) -> &WinDistribution;

    fn outcome(&self) -> ExpectedOutcome {
        expected_outcome(self.distribution())
    }
}

impl Entrant for PoolTeamSummary {
    fn name(&self) -> &str {
        &self.name
    }

    fn seed(&self) -> u8 {
        self.seed
    }

    fn distribution(&self) -> &WinDistribution {
        &self.win_probability_distribution
    }
}

impl Entrant for TeamAnalysis {
    fn name(&self) -> &str {
        &self.name
    }

    fn seed(&self) -> u8 {
        self.seed
    }

    fn distribution(&self) -> &WinDistribution {
        &self.win_probability_distribution
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoolStats {
    pub total_wins: u32,
    pub avg_probability: f64,
    pub team_count: usize,
}

impl PoolStats {
    /// "5+": the bucket totals count 2+ as 2, so the sum is a floor.
    pub fn total_label(&self) -> String {
        format!("{}+", self.total_wins)
    }
}

/// Pool statistics, or the explicit marker for a pool with no teams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PoolAggregate {
    NoData,
    Stats(PoolStats),
}

impl PoolAggregate {
    pub fn stats(&self) -> Option<&PoolStats> {
        match self {
            PoolAggregate::NoData => None,
            PoolAggregate::Stats(stats) => Some(stats),
        }
    }
}

impl fmt::Display for PoolAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolAggregate::NoData => write!(f, "no teams selected"),
            PoolAggregate::Stats(s) => write!(
                f,
                "{} expected wins, {} average confidence ({} teams)",
                s.total_label(),
                format_percent(s.avg_probability),
                s.team_count
            ),
        }
    }
}

/// Sum expected wins and average the chosen-bucket probability across `teams`.
pub fn aggregate<'a, T: Entrant + 'a>(teams: impl IntoIterator<Item = &'a T>) -> PoolAggregate {
    let (count, total_wins, total_prob) = teams.into_iter().fold((0usize, 0u32, 0.0f64), |(n, w, p), team| {
        let outcome = team.outcome();
        (n + 1, w + u32::from(outcome.wins), p + outcome.probability)
    });

    if count == 0 {
        return PoolAggregate::NoData;
    }
    PoolAggregate::Stats(PoolStats {
        total_wins,
        avg_probability: total_prob / count as f64,
        team_count: count,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierGroup {
    pub tier: SeedTier,
    /// Member names in pool order.
    pub teams: Vec<String>,
    pub stats: PoolStats,
}

/// Per-tier statistics in tier order. Tiers with no members are left out.
pub fn tier_breakdown<T: Entrant>(teams: &[T]) -> Vec<TierGroup> {
    SeedTier::ALL
        .into_iter()
        .filter_map(|tier| {
            let members: Vec<&T> = teams.iter().filter(|t| SeedTier::from_seed(t.seed()) == tier).collect();
            match aggregate(members.iter().copied()) {
                PoolAggregate::NoData => None,
                PoolAggregate::Stats(stats) => Some(TierGroup {
                    tier,
                    teams: members.iter().map(|t| t.name().to_string()).collect(),
                    stats,
                }),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTeam {
    pub name: String,
    pub seed: u8,
    pub outcome: ExpectedOutcome,
    pub band: ConfidenceBand,
}

/// Teams by expected wins, most first. Equal wins keep their input order.
pub fn rank<T: Entrant>(teams: &[T]) -> Vec<RankedTeam> {
    let mut ranked: Vec<RankedTeam> = teams
        .iter()
        .map(|t| {
            let outcome = t.outcome();
            RankedTeam { name: t.name().to_string(), seed: t.seed(), outcome, band: outcome.band() }
        })
        .collect();
    ranked.sort_by(|a, b| b.outcome.wins.cmp(&a.outcome.wins));
    ranked
}

// ---------------------------------------------------------------------------
// Pool slots
// ---------------------------------------------------------------------------

/// Eight ordered slots, each empty or holding one team. A name can fill at
/// most one slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pool {
    slots: [Option<PoolTeamSummary>; POOL_SIZE],
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[Option<PoolTeamSummary>] {
        &self.slots
    }

    /// Put `team` into `slot`, returning whatever was there.
    pub fn assign(&mut self, slot: usize, team: PoolTeamSummary) -> Result<Option<PoolTeamSummary>, PoolError> {
        if slot >= POOL_SIZE {
            return Err(PoolError::SlotOutOfRange { slot, size: POOL_SIZE });
        }
        if let Some(other) = self.slot_of(&team.name)
            && other != slot
        {
            return Err(PoolError::AlreadyAssigned { name: team.name, slot: other });
        }
        debug!("pool slot {} <- {}", slot + 1, team.name);
        Ok(self.slots[slot].replace(team))
    }

    /// Put `team` into the first empty slot.
    pub fn push(&mut self, team: PoolTeamSummary) -> Result<usize, PoolError> {
        let slot = self.slots.iter().position(Option::is_none).ok_or(PoolError::PoolFull)?;
        self.assign(slot, team)?;
        Ok(slot)
    }

    pub fn remove(&mut self, slot: usize) -> Result<Option<PoolTeamSummary>, PoolError> {
        let cell = self
            .slots
            .get_mut(slot)
            .ok_or(PoolError::SlotOutOfRange { slot, size: POOL_SIZE })?;
        Ok(cell.take())
    }

    fn slot_of(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|t| t.name == name))
    }

    /// Filled slots in slot order.
    pub fn filled(&self) -> Vec<&PoolTeamSummary> {
        self.slots.iter().flatten().collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn assigned_names(&self) -> HashSet<&str> {
        self.slots.iter().flatten().map(|t| t.name.as_str()).collect()
    }

    /// Roster teams that can still be picked: not already in a slot and, for
    /// a non-blank query, containing it case-insensitively.
    pub fn available<'r>(&self, roster: &'r [TeamEntry], query: &str) -> Vec<&'r TeamEntry> {
        let assigned = self.assigned_names();
        let query = query.trim().to_lowercase();
        roster
            .iter()
            .filter(|t| !assigned.contains(t.name.as_str()))
            .filter(|t| query.is_empty() || t.name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn aggregate(&self) -> PoolAggregate {
        aggregate(self.filled())
    }

    pub fn tier_breakdown(&self) -> Vec<TierGroup> {
        tier_breakdown(&self.filled())
    }

    pub fn rank(&self) -> Vec<RankedTeam> {
        rank(&self.filled())
    }
}

impl<T: Entrant + ?Sized> Entrant for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn seed(&self) -> u8 {
        (**self).seed()
    }

    fn distribution(&self) -> &WinDistribution {
        (**self).distribution()
    }
}
