use crate::config::RegionResults;
use crate::seeds::SeedTable;
use crate::{RegionName, Resolution, Round, RoundKind, TeamSlot};
use log::{debug, warn};
use serde::Serialize;

/// The four projected rounds of one region, Round of 64 through Elite 8.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRounds {
    pub region: RegionName,
    pub rounds: Vec<Round>,
}

impl RegionRounds {
    pub fn round(&self, kind: RoundKind) -> Option<&Round> {
        self.rounds.iter().find(|r| r.kind == kind)
    }

    /// Regional champion, if the Elite 8 has been decided.
    pub fn champion(&self) -> Option<&TeamSlot> {
        self.round(RoundKind::Elite8)?.slots.iter().find(|s| s.advanced)
    }
}

/// Project a region's rounds from its resolved seed table and optional results.
///
/// Later rounds carry names only; their seeds are looked up by name against
/// the 16 first-round teams. A name that is not in the table keeps a `None`
/// seed. Without results every later round is a run of TBD slots.
pub fn project_region(table: &SeedTable, results: Resolution<&RegionResults>) -> RegionRounds {
    let region = table.region();
    let rounds = match results {
        Resolution::Unresolved => {
            debug!("{region}: no results, later rounds are placeholders");
            let mut rounds = vec![Round { kind: RoundKind::First, slots: table.slots() }];
            rounds.extend(RoundKind::REGIONAL[1..].iter().map(|&kind| Round {
                kind,
                slots: vec![TeamSlot::tbd(); kind.slot_count()],
            }));
            rounds
        }
        Resolution::Resolved(results) => {
            let winners: [&[String]; 3] = [&results.r32, &results.s16, &results.e8];

            let first = table
                .slots()
                .into_iter()
                .map(|slot| flag(slot, |name| winners[0].iter().any(|w| w == name)))
                .collect();
            let mut rounds = vec![Round { kind: RoundKind::First, slots: first }];

            for (i, &kind) in RoundKind::REGIONAL[1..].iter().enumerate() {
                let names = winners[i];
                let size = kind.slot_count();
                if names.len() > size {
                    warn!(
                        "{region} {}: {} results listed for {size} slots, extra ignored",
                        kind.label(),
                        names.len()
                    );
                }

                let slots = (0..size)
                    .map(|pos| {
                        let name = names.get(pos).map(String::as_str).unwrap_or("");
                        let slot = TeamSlot { seed: resolve_seed(table, name), name: name.to_string(), advanced: false };
                        match winners.get(i + 1) {
                            Some(next) => flag(slot, |n| next.iter().any(|w| w == n)),
                            None => flag(slot, |n| results.f4.as_deref() == Some(n)),
                        }
                    })
                    .collect();
                rounds.push(Round { kind, slots });
            }
            rounds
        }
    };

    RegionRounds { region, rounds }
}

fn flag(mut slot: TeamSlot, advanced: impl Fn(&str) -> bool) -> TeamSlot {
    slot.advanced = slot.is_filled() && advanced(&slot.name);
    slot
}

fn resolve_seed(table: &SeedTable, name: &str) -> Option<u8> {
    if name.is_empty() {
        return None;
    }
    let seed = table.seed_of(name);
    if seed.is_none() {
        warn!("{}: {name:?} is not one of the region's teams", table.region());
    }
    seed
}
