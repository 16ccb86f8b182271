use crate::config::{BracketConfig, FinalFourResults, RegionResults, ResultsRecord, Semifinal};
use crate::error::{ConfigError, ResultsIssue};
use crate::play_in::{Destination, PlayInResolver};
use crate::rounds::{RegionRounds, project_region};
use crate::seeds::SeedTable;
use crate::{RegionName, Resolution, RoundKind, TeamSlot};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashMap;

/// Regions whose champions meet in each national semifinal.
pub const SEMIFINAL_PAIRS: [(RegionName, RegionName); 2] = [
    (RegionName::East, RegionName::Midwest),
    (RegionName::West, RegionName::South),
];

// ---------------------------------------------------------------------------
// Seed lookup
// ---------------------------------------------------------------------------

/// Name -> (region, seed) for every team in the field, including both teams
/// of every play-in game. Built once per bracket and never patched.
#[derive(Debug, Clone, Default)]
pub struct SeedLookup {
    by_name: HashMap<String, (RegionName, u8)>,
}

impl SeedLookup {
    pub fn build(tables: &[SeedTable], play_in: &PlayInResolver) -> Self {
        let mut by_name = HashMap::new();
        let seeded = tables
            .iter()
            .flat_map(|t| t.entries().iter().map(move |e| (e.name.as_str(), t.region(), e.seed)));
        let play_in_teams = play_in.games().flat_map(|(game, d)| {
            [&game.team_a, &game.team_b].map(|team| (team.name.as_str(), d.region, team.seed))
        });

        for (name, region, seed) in seeded.chain(play_in_teams) {
            if name.is_empty() {
                continue;
            }
            match by_name.get(name) {
                Some(&(r, s)) if (r, s) != (region, seed) => {
                    warn!("{name:?} listed as {r} {s} and {region} {seed}, keeping the first");
                }
                Some(_) => {}
                None => {
                    by_name.insert(name.to_string(), (region, seed));
                }
            }
        }

        Self { by_name }
    }

    pub fn seed(&self, name: &str) -> Option<u8> {
        self.by_name.get(name).map(|&(_, seed)| seed)
    }

    pub fn region(&self, name: &str) -> Option<RegionName> {
        self.by_name.get(name).map(|&(region, _)| region)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// A name-keyed slot with its seed resolved. Blank names stay TBD.
    fn slot(&self, name: &str, advanced: bool) -> TeamSlot {
        if name.is_empty() {
            return TeamSlot::tbd();
        }
        let seed = self.seed(name);
        if seed.is_none() {
            warn!("no seed for {name:?}");
        }
        TeamSlot { seed, name: name.to_string(), advanced }
    }
}

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// One First Four game: both teams, the winner flagged as advanced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayInView {
    pub id: String,
    pub destination: Destination,
    pub teams: [TeamSlot; 2],
}

/// The national layer: two semifinals, the title game and the champion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NationalView {
    pub semifinals: [[TeamSlot; 2]; 2],
    pub championship: [TeamSlot; 2],
    pub champion: TeamSlot,
}

/// Everything a renderer needs, as plain data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketView {
    pub year: Option<u16>,
    pub first_four: Vec<PlayInView>,
    pub regions: Vec<RegionRounds>,
    pub national: NationalView,
}

impl BracketView {
    pub fn region(&self, region: RegionName) -> Option<&RegionRounds> {
        self.regions.iter().find(|r| r.region == region)
    }
}

// ---------------------------------------------------------------------------
// Bracket
// ---------------------------------------------------------------------------

/// A validated bracket: four seed tables with play-in occupants written in,
/// the play-in layer, optional results and the shared seed lookup.
#[derive(Debug, Clone)]
pub struct Bracket {
    year: Option<u16>,
    tables: Vec<SeedTable>,
    play_in: PlayInResolver,
    results: Option<ResultsRecord>,
    lookup: SeedLookup,
}

impl Bracket {
    pub fn from_config(config: BracketConfig) -> Result<Self, ConfigError> {
        let BracketConfig { year, mut regions, first_four, results } = config;

        let seeded = RegionName::ALL
            .into_iter()
            .map(|region| {
                let entries = regions.remove(&region).ok_or(ConfigError::MissingRegion(region))?;
                SeedTable::new(region, entries)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let play_in = PlayInResolver::new(first_four)?;
        let tables = play_in.apply(&seeded, results.as_ref().into());
        let lookup = SeedLookup::build(&tables, &play_in);

        info!(
            "bracket {}: {} teams, {} play-in games, results {}",
            year.map(|y| y.to_string()).unwrap_or_else(|| "(no year)".into()),
            lookup.len(),
            play_in.games().count(),
            if results.is_some() { "loaded" } else { "pending" }
        );

        Ok(Self { year, tables, play_in, results, lookup })
    }

    pub fn year(&self) -> Option<u16> {
        self.year
    }

    /// Seed tables after play-in resolution, in region display order.
    pub fn tables(&self) -> &[SeedTable] {
        &self.tables
    }

    pub fn table(&self, region: RegionName) -> Option<&SeedTable> {
        self.tables.iter().find(|t| t.region() == region)
    }

    pub fn play_in(&self) -> &PlayInResolver {
        &self.play_in
    }

    pub fn seed_lookup(&self) -> &SeedLookup {
        &self.lookup
    }

    pub fn results(&self) -> Resolution<&ResultsRecord> {
        self.results.as_ref().into()
    }

    fn region_results(&self, region: RegionName) -> Resolution<&RegionResults> {
        self.results().and_then(|r| r.region(region))
    }

    fn final_four(&self) -> Resolution<&FinalFourResults> {
        self.results().and_then(|r| r.final_four.as_ref())
    }

    pub fn project(&self, region: RegionName) -> Option<RegionRounds> {
        self.table(region).map(|t| project_region(t, self.region_results(region)))
    }

    pub fn view(&self) -> BracketView {
        let regions: Vec<RegionRounds> = self
            .tables
            .iter()
            .map(|t| project_region(t, self.region_results(t.region())))
            .collect();

        let first_four = self
            .play_in
            .outcomes(self.results())
            .into_iter()
            .map(|(game, destination, occupant)| {
                let winner = occupant.winner();
                PlayInView {
                    id: game.id.clone(),
                    destination,
                    teams: [&game.team_a, &game.team_b].map(|team| TeamSlot {
                        seed: Some(team.seed),
                        name: team.name.clone(),
                        advanced: winner == Some(team.name.as_str()),
                    }),
                }
            })
            .collect();

        BracketView { year: self.year, first_four, national: self.national(&regions), regions }
    }

    fn national(&self, regions: &[RegionRounds]) -> NationalView {
        let Resolution::Resolved(ff) = self.final_four() else {
            debug!("no national results, Final Four shows placeholders");
            return NationalView::default();
        };

        let region_champion = |region: RegionName| {
            regions
                .iter()
                .find(|r| r.region == region)
                .and_then(RegionRounds::champion)
                .map(|s| s.name.clone())
                .unwrap_or_default()
        };

        let semifinals = [(&ff.semi1, SEMIFINAL_PAIRS[0]), (&ff.semi2, SEMIFINAL_PAIRS[1])].map(
            |(semi, (region_a, region_b))| {
                let team_a = pick(&semi.team_a, || region_champion(region_a));
                let team_b = pick(&semi.team_b, || region_champion(region_b));
                let won = |name: &str| !name.is_empty() && semi.winner.as_deref() == Some(name);
                [self.lookup.slot(&team_a, won(&team_a)), self.lookup.slot(&team_b, won(&team_b))]
            },
        );

        let champion = ff.champion.as_deref().unwrap_or("");
        let championship = [&ff.semi1, &ff.semi2].map(|semi: &Semifinal| {
            let name = semi.winner.as_deref().unwrap_or("");
            self.lookup.slot(name, !name.is_empty() && name == champion)
        });

        NationalView {
            semifinals,
            championship,
            champion: self.lookup.slot(champion, !champion.is_empty()),
        }
    }

    /// Check the results record against the bracket. An unresolved record has
    /// nothing to contradict.
    pub fn validate_results(&self) -> Vec<ResultsIssue> {
        let Resolution::Resolved(results) = self.results() else {
            return Vec::new();
        };
        let mut issues = Vec::new();

        for table in &self.tables {
            let region = table.region();
            let Some(rr) = results.region(region) else { continue };

            let f4: Vec<String> = rr.f4.iter().cloned().collect();
            // Winners listed per round and the slots they fill: 8, 4, 2, 1.
            let rounds: [(RoundKind, &[String]); 4] = [
                (RoundKind::Second, rr.r32.as_slice()),
                (RoundKind::Sweet16, rr.s16.as_slice()),
                (RoundKind::Elite8, rr.e8.as_slice()),
                (RoundKind::FinalFour, f4.as_slice()),
            ];

            for (i, (round, winners)) in rounds.iter().enumerate() {
                let slots = RoundKind::Second.slot_count() >> i;
                if winners.len() > slots {
                    issues.push(ResultsIssue::TooManyWinners {
                        region,
                        round: *round,
                        count: winners.len(),
                        slots,
                    });
                }
                for name in winners.iter().filter(|n| !n.is_empty()) {
                    let played = match i {
                        0 => table.contains(name),
                        _ => rounds[i - 1].1.contains(name),
                    };
                    if played {
                        continue;
                    }
                    issues.push(match i {
                        0 => ResultsIssue::UnknownTeam { region, name: name.clone() },
                        _ => ResultsIssue::NotInPreviousRound { region, round: *round, name: name.clone() },
                    });
                }
            }
        }

        if let Some(ff) = &results.final_four {
            for (n, semi) in [(1u8, &ff.semi1), (2, &ff.semi2)] {
                if let Some(winner) = &semi.winner
                    && *winner != semi.team_a
                    && *winner != semi.team_b
                {
                    issues.push(ResultsIssue::SemifinalWinnerNotPlaying { semifinal: n, winner: winner.clone() });
                }
            }
            if let Some(champion) = &ff.champion
                && ff.semi1.winner.as_ref() != Some(champion)
                && ff.semi2.winner.as_ref() != Some(champion)
            {
                issues.push(ResultsIssue::ChampionNotSemifinalWinner { champion: champion.clone() });
            }
        }

        for (game_id, winner) in &results.first_four {
            match self.play_in.games().find(|(g, _)| g.id == *game_id) {
                None => issues.push(ResultsIssue::UnknownPlayInGame { game_id: game_id.clone() }),
                Some((game, _)) if *winner != game.team_a.name && *winner != game.team_b.name => {
                    issues.push(ResultsIssue::PlayInWinnerNotParticipant {
                        game_id: game_id.clone(),
                        winner: winner.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        issues
    }
}

fn pick(name: &str, fallback: impl FnOnce() -> String) -> String {
    if name.is_empty() { fallback() } else { name.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play_in::{PENDING_OCCUPANT, PlayInGame};
    use crate::seeds::tests::ascending_entries;
    use crate::TeamEntry;
    use std::collections::BTreeMap;

    fn config() -> BracketConfig {
        BracketConfig {
            year: Some(2030),
            regions: RegionName::ALL.into_iter().map(|r| (r, ascending_entries(r))).collect(),
            first_four: vec![PlayInGame {
                id: "ff-south-16".into(),
                team_a: TeamEntry::new(16, "Play-in A"),
                team_b: TeamEntry::new(16, "Play-in B"),
                destination: "South 16".into(),
            }],
            results: None,
        }
    }

    fn with_results(results: ResultsRecord) -> Bracket {
        let mut config = config();
        config.results = Some(results);
        Bracket::from_config(config).unwrap()
    }

    #[test]
    fn missing_region_fails_fast() {
        let mut config = config();
        config.regions.remove(&RegionName::West);
        assert_eq!(
            Bracket::from_config(config).unwrap_err(),
            ConfigError::MissingRegion(RegionName::West)
        );
    }

    #[test]
    fn no_results_degrades_to_placeholders() {
        let bracket = Bracket::from_config(config()).unwrap();
        let view = bracket.view();

        assert_eq!(view.regions.len(), 4);
        for region in &view.regions {
            assert!(region.rounds[1..].iter().flat_map(|r| &r.slots).all(|s| !s.is_filled()));
        }
        assert_eq!(view.national, NationalView::default());
        assert!(!view.national.champion.advanced);
        assert!(view.first_four[0].teams.iter().all(|t| !t.advanced));
        assert_eq!(bracket.table(RegionName::South).unwrap().name_at(16), Some(PENDING_OCCUPANT));
        assert!(bracket.validate_results().is_empty());
    }

    #[test]
    fn play_in_winner_takes_slot_and_both_teams_resolve() {
        let bracket = with_results(ResultsRecord {
            first_four: BTreeMap::from([("ff-south-16".to_string(), "Play-in A".to_string())]),
            ..Default::default()
        });

        assert_eq!(bracket.table(RegionName::South).unwrap().name_at(16), Some("Play-in A"));
        assert_eq!(bracket.seed_lookup().seed("Play-in B"), Some(16));
        assert_eq!(bracket.seed_lookup().region("Play-in B"), Some(RegionName::South));

        let view = bracket.view();
        let game = &view.first_four[0];
        assert_eq!(game.destination.to_string(), "South 16");
        assert!(game.teams[0].advanced);
        assert!(!game.teams[1].advanced);
    }

    #[test]
    fn national_layer_resolves_seeds_by_name() {
        let final_four = FinalFourResults {
            semi1: Semifinal {
                team_a: "East 1".into(),
                team_b: "Midwest 2".into(),
                winner: Some("Midwest 2".into()),
            },
            semi2: Semifinal { team_a: "West 3".into(), team_b: "South 4".into(), winner: None },
            champion: None,
        };
        let bracket = with_results(ResultsRecord { final_four: Some(final_four), ..Default::default() });
        let national = bracket.view().national;

        let [a, b] = &national.semifinals[0];
        assert_eq!((a.seed, a.advanced), (Some(1), false));
        assert_eq!((b.seed, b.advanced), (Some(2), true));
        assert!(national.semifinals[1].iter().all(|s| s.is_filled() && !s.advanced));

        assert_eq!(national.championship[0].name, "Midwest 2");
        assert!(!national.championship[0].advanced);
        assert!(!national.championship[1].is_filled());
        assert_eq!(national.champion, TeamSlot::tbd());
    }

    #[test]
    fn blank_semifinal_team_falls_back_to_region_champion() {
        let mut results = ResultsRecord { final_four: Some(FinalFourResults::default()), ..Default::default() };
        results.regions.insert(
            RegionName::East,
            RegionResults { e8: vec!["East 1".into(), "East 2".into()], f4: Some("East 1".into()), ..Default::default() },
        );
        let national = with_results(results).view().national;
        assert_eq!(national.semifinals[0][0].name, "East 1");
        assert_eq!(national.semifinals[0][0].seed, Some(1));
        assert!(!national.semifinals[0][1].is_filled());
    }

    #[test]
    fn embedded_2025_bracket_projects_cleanly() {
        let bracket = Bracket::from_config(BracketConfig::embedded().unwrap()).unwrap();
        assert!(bracket.validate_results().is_empty());

        let view = bracket.view();
        assert_eq!(view.year, Some(2025));
        for region in &view.regions {
            let sizes: Vec<usize> = region.rounds.iter().map(|r| r.slots.len()).collect();
            assert_eq!(sizes, vec![16, 8, 4, 2]);
            assert!(region.rounds.iter().flat_map(|r| &r.slots).all(|s| s.seed.is_some()));
        }

        let national = &view.national;
        assert_eq!(national.champion.name, "Florida");
        assert_eq!(national.champion.seed, Some(1));
        assert!(national.champion.advanced);
        assert!(national.championship.iter().any(|s| s.name == "Florida" && s.advanced));
        assert!(national.championship.iter().any(|s| s.name == "Houston" && !s.advanced));

        // First Four losers stay addressable.
        for loser in ["St. Francis (PA)", "American University", "San Diego State", "Texas"] {
            assert!(bracket.seed_lookup().seed(loser).is_some(), "{loser} should resolve");
        }
        assert_eq!(bracket.seed_lookup().seed("Texas"), Some(11));
    }

    #[test]
    fn validation_reports_subset_violations() {
        let mut results = ResultsRecord::default();
        results.regions.insert(
            RegionName::East,
            RegionResults {
                r32: vec!["East 1".into(), "Nobody".into()],
                s16: vec!["East 9".into()],
                e8: vec![],
                f4: None,
            },
        );
        results.final_four = Some(FinalFourResults {
            semi1: Semifinal { team_a: "East 1".into(), team_b: "Midwest 1".into(), winner: Some("West 1".into()) },
            semi2: Semifinal::default(),
            champion: Some("South 1".into()),
        });
        results.first_four.insert("ff-south-16".into(), "Play-in C".into());
        results.first_four.insert("ff-nowhere".into(), "Someone".into());

        let issues = with_results(results).validate_results();
        assert!(issues.contains(&ResultsIssue::UnknownTeam { region: RegionName::East, name: "Nobody".into() }));
        assert!(issues.contains(&ResultsIssue::NotInPreviousRound {
            region: RegionName::East,
            round: RoundKind::Sweet16,
            name: "East 9".into(),
        }));
        assert!(issues.contains(&ResultsIssue::SemifinalWinnerNotPlaying { semifinal: 1, winner: "West 1".into() }));
        assert!(issues.contains(&ResultsIssue::ChampionNotSemifinalWinner { champion: "South 1".into() }));
        assert!(issues.contains(&ResultsIssue::UnknownPlayInGame { game_id: "ff-nowhere".into() }));
        assert!(issues.contains(&ResultsIssue::PlayInWinnerNotParticipant {
            game_id: "ff-south-16".into(),
            winner: "Play-in C".into(),
        }));
        assert_eq!(issues.len(), 6);
    }

    #[test]
    fn overlong_round_is_reported() {
        let mut results = ResultsRecord::default();
        results.regions.insert(
            RegionName::West,
            RegionResults { e8: vec!["West 1".into(); 3], ..Default::default() },
        );
        let issues = with_results(results).validate_results();
        assert!(issues.contains(&ResultsIssue::TooManyWinners {
            region: RegionName::West,
            round: RoundKind::Elite8,
            count: 3,
            slots: 2,
        }));
    }
}
