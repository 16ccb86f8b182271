use crate::{RegionName, RoundKind};
use serde::Serialize;
use std::fmt;

/// Bracket configuration that cannot be used. These are data bugs in the
/// loaded configuration and are reported at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    WrongSlotCount { region: RegionName, count: usize },
    SeedOutOfRange { region: RegionName, seed: u8 },
    DuplicateSeed { region: RegionName, seed: u8 },
    MissingRegion(RegionName),
    BadDestination { game_id: String, destination: String },
    DuplicateDestination { destination: String, first: String, second: String },
    DuplicatePlayInId(String),
    PlayInSeedMismatch { game_id: String, team: String, seed: u8, destination: String },
    Parse(String),
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::WrongSlotCount { region, count } => {
                write!(f, "{region} seed table has {count} teams, expected 16")
            }
            ConfigError::SeedOutOfRange { region, seed } => {
                write!(f, "{region} seed table has seed {seed} outside 1..=16")
            }
            ConfigError::DuplicateSeed { region, seed } => {
                write!(f, "{region} seed table lists seed {seed} more than once")
            }
            ConfigError::MissingRegion(region) => write!(f, "no seed table for region {region}"),
            ConfigError::BadDestination { game_id, destination } => {
                write!(f, "play-in game {game_id}: cannot parse destination {destination:?}")
            }
            ConfigError::DuplicateDestination { destination, first, second } => write!(
                f,
                "play-in games {first} and {second} both feed destination {destination}"
            ),
            ConfigError::DuplicatePlayInId(id) => write!(f, "play-in game id {id} used twice"),
            ConfigError::PlayInSeedMismatch { game_id, team, seed, destination } => write!(
                f,
                "play-in game {game_id}: {team} is seeded {seed} but feeds {destination}"
            ),
            ConfigError::Parse(msg) => write!(f, "invalid bracket configuration: {msg}"),
            ConfigError::Io(msg) => write!(f, "could not read bracket configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A results record that contradicts the bracket it is projected onto.
/// Projection still succeeds; these are reported by validation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ResultsIssue {
    /// A round of 32 name that is not one of the region's 16 teams.
    UnknownTeam { region: RegionName, name: String },
    /// A winner listed in `round` that did not play in the round before it.
    NotInPreviousRound { region: RegionName, round: RoundKind, name: String },
    TooManyWinners { region: RegionName, round: RoundKind, count: usize, slots: usize },
    SemifinalWinnerNotPlaying { semifinal: u8, winner: String },
    ChampionNotSemifinalWinner { champion: String },
    UnknownPlayInGame { game_id: String },
    PlayInWinnerNotParticipant { game_id: String, winner: String },
}

impl fmt::Display for ResultsIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultsIssue::UnknownTeam { region, name } => {
                write!(f, "{region}: {name:?} is not seeded in the region")
            }
            ResultsIssue::NotInPreviousRound { region, round, name } => write!(
                f,
                "{region} {}: {name:?} did not play in the previous round",
                round.label()
            ),
            ResultsIssue::TooManyWinners { region, round, count, slots } => write!(
                f,
                "{region} {}: {count} winners listed for {slots} slots",
                round.label()
            ),
            ResultsIssue::SemifinalWinnerNotPlaying { semifinal, winner } => {
                write!(f, "semifinal {semifinal}: winner {winner:?} is not one of its teams")
            }
            ResultsIssue::ChampionNotSemifinalWinner { champion } => {
                write!(f, "champion {champion:?} did not win a semifinal")
            }
            ResultsIssue::UnknownPlayInGame { game_id } => {
                write!(f, "First Four result for unknown game {game_id}")
            }
            ResultsIssue::PlayInWinnerNotParticipant { game_id, winner } => {
                write!(f, "First Four {game_id}: winner {winner:?} did not play")
            }
        }
    }
}

/// Misuse of a pool's fixed slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    SlotOutOfRange { slot: usize, size: usize },
    AlreadyAssigned { name: String, slot: usize },
    PoolFull,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::SlotOutOfRange { slot, size } => {
                write!(f, "slot {} does not exist (pool has {size})", slot + 1)
            }
            PoolError::AlreadyAssigned { name, slot } => {
                write!(f, "{name} is already in slot {}", slot + 1)
            }
            PoolError::PoolFull => write!(f, "every pool slot is filled"),
        }
    }
}

impl std::error::Error for PoolError {}
