use crate::config::ResultsRecord;
use crate::error::ConfigError;
use crate::seeds::SeedTable;
use crate::{RegionName, Resolution, TeamEntry};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Name written into a destination slot whose play-in game has no winner yet.
/// It is the unfilled-slot marker, so the slot shows as TBD with its seed.
pub const PENDING_OCCUPANT: &str = "";

/// A play-in game as configured. The winner takes the `destination` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayInGame {
    pub id: String,
    pub team_a: TeamEntry,
    pub team_b: TeamEntry,
    /// "<Region> <seed>", e.g. "South 16".
    pub destination: String,
}

/// A `(region, seed)` bracket slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Destination {
    pub region: RegionName,
    pub seed: u8,
}

impl FromStr for Destination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (region, seed) = s
            .trim()
            .rsplit_once(' ')
            .ok_or_else(|| format!("expected \"<Region> <seed>\", got {s:?}"))?;
        let region = region.parse::<RegionName>()?;
        let seed = seed
            .parse::<u8>()
            .ok()
            .filter(|n| (1..=16).contains(n))
            .ok_or_else(|| format!("bad seed in {s:?}"))?;
        Ok(Self { region, seed })
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.region, self.seed)
    }
}

/// What a play-in game means for its destination slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Occupant {
    Decided { winner: String, eliminated: String },
    Pending,
}

impl Occupant {
    pub fn slot_name(&self) -> &str {
        match self {
            Occupant::Decided { winner, .. } => winner,
            Occupant::Pending => PENDING_OCCUPANT,
        }
    }

    pub fn winner(&self) -> Option<&str> {
        match self {
            Occupant::Decided { winner, .. } => Some(winner),
            Occupant::Pending => None,
        }
    }
}

/// A play-in participant. Both teams of every game stay addressable, won or lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant<'a> {
    pub team: &'a TeamEntry,
    pub game_id: &'a str,
    pub destination: Destination,
    pub eliminated: bool,
}

/// Validated play-in layer. Each destination is fed by exactly one game.
#[derive(Debug, Clone, Default)]
pub struct PlayInResolver {
    games: Vec<(PlayInGame, Destination)>,
}

impl PlayInResolver {
    pub fn new(games: Vec<PlayInGame>) -> Result<Self, ConfigError> {
        let mut by_destination: HashMap<Destination, String> = HashMap::new();
        let mut resolved: Vec<(PlayInGame, Destination)> = Vec::with_capacity(games.len());

        for game in games {
            let destination = game.destination.parse::<Destination>().map_err(|_| {
                ConfigError::BadDestination {
                    game_id: game.id.clone(),
                    destination: game.destination.clone(),
                }
            })?;

            if resolved.iter().any(|(g, _)| g.id == game.id) {
                return Err(ConfigError::DuplicatePlayInId(game.id));
            }

            if let Some(first) = by_destination.get(&destination) {
                return Err(ConfigError::DuplicateDestination {
                    destination: destination.to_string(),
                    first: first.clone(),
                    second: game.id,
                });
            }

            for team in [&game.team_a, &game.team_b] {
                if team.seed != destination.seed {
                    return Err(ConfigError::PlayInSeedMismatch {
                        game_id: game.id.clone(),
                        team: team.name.clone(),
                        seed: team.seed,
                        destination: destination.to_string(),
                    });
                }
            }

            by_destination.insert(destination, game.id.clone());
            resolved.push((game, destination));
        }

        Ok(Self { games: resolved })
    }

    pub fn games(&self) -> impl Iterator<Item = (&PlayInGame, Destination)> {
        self.games.iter().map(|(g, d)| (g, *d))
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// The occupant of each game's destination slot, in configuration order.
    pub fn outcomes(&self, results: Resolution<&ResultsRecord>) -> Vec<(&PlayInGame, Destination, Occupant)> {
        self.games
            .iter()
            .map(|(game, destination)| (game, *destination, occupant(game, results)))
            .collect()
    }

    /// Every participant of every game, including eliminated ones.
    pub fn participants(&self, results: Resolution<&ResultsRecord>) -> Vec<Participant<'_>> {
        self.games
            .iter()
            .flat_map(|(game, destination)| {
                let winner = occupant(game, results).winner().map(str::to_owned);
                [&game.team_a, &game.team_b].into_iter().map(move |team| Participant {
                    team,
                    game_id: game.id.as_str(),
                    destination: *destination,
                    eliminated: winner.as_deref().is_some_and(|w| w != team.name),
                })
            })
            .collect()
    }

    /// Seed of a play-in participant, whether or not it won.
    pub fn participant_seed(&self, name: &str) -> Option<u8> {
        self.games
            .iter()
            .flat_map(|(g, _)| [&g.team_a, &g.team_b])
            .find(|t| t.name == name)
            .map(|t| t.seed)
    }

    /// Write each destination's occupant into the matching seed table.
    /// Tables are rebuilt, never patched in place.
    pub fn apply(&self, tables: &[SeedTable], results: Resolution<&ResultsRecord>) -> Vec<SeedTable> {
        let outcomes = self.outcomes(results);
        tables
            .iter()
            .map(|table| {
                outcomes
                    .iter()
                    .filter(|(_, d, _)| d.region == table.region())
                    .fold(table.clone(), |acc, (game, d, occupant)| {
                        debug!("play-in {} fills {d} with {:?}", game.id, occupant.slot_name());
                        acc.with_occupant(d.seed, occupant.slot_name())
                    })
            })
            .collect()
    }
}

fn occupant(game: &PlayInGame, results: Resolution<&ResultsRecord>) -> Occupant {
    let Resolution::Resolved(results) = results else {
        return Occupant::Pending;
    };
    let Some(winner) = results.first_four.get(&game.id) else {
        return Occupant::Pending;
    };

    if *winner == game.team_a.name {
        Occupant::Decided { winner: winner.clone(), eliminated: game.team_b.name.clone() }
    } else if *winner == game.team_b.name {
        Occupant::Decided { winner: winner.clone(), eliminated: game.team_a.name.clone() }
    } else {
        warn!("play-in {}: winner {winner:?} is not one of its teams", game.id);
        Occupant::Pending
    }
}
