use crate::state::app_settings::AppSettings;
use anyhow::{Context, bail};
use log::{info, warn};
use mmpool_core::client::fetch_analyses;
use mmpool_core::pool::{Entrant, MAX_COMPARE, RankedTeam, TierGroup};
use mmpool_core::{
    ApiResult, Bracket, BracketConfig, BracketView, ConfidenceBand, ExpectedOutcome, Pool, PoolAggregate,
    PoolTeamSummary, RegionName, ResultsIssue, TeamAnalysis, TeamEntry, TeamSource, WinDistribution,
};
use serde::Serialize;

pub struct App {
    pub settings: AppSettings,
    pub bracket: Bracket,
}

impl App {
    pub fn new(settings: AppSettings) -> anyhow::Result<Self> {
        let config = match &settings.bracket_path {
            Some(path) => BracketConfig::load(path)
                .with_context(|| format!("failed to load bracket from {}", path.display()))?,
            None => BracketConfig::embedded().context("embedded bracket is invalid")?,
        };
        let bracket = Bracket::from_config(config)?;
        Ok(Self::with_bracket(settings, bracket))
    }

    pub fn with_bracket(settings: AppSettings, bracket: Bracket) -> Self {
        Self { settings, bracket }
    }

    // -----------------------------------------------------------------------
    // Bracket commands
    // -----------------------------------------------------------------------

    /// The projected bracket, optionally narrowed to one region and the play-in
    /// games feeding it.
    pub fn bracket_view(&self, region: Option<RegionName>) -> BracketView {
        let mut view = self.bracket.view();
        if let Some(region) = region {
            view.regions.retain(|r| r.region == region);
            view.first_four.retain(|g| g.destination.region == region);
        }
        view
    }

    pub fn validate(&self) -> ValidationReport {
        let issues = self.bracket.validate_results();
        if issues.is_empty() {
            info!("results are consistent");
        } else {
            warn!("{} results issues", issues.len());
        }
        ValidationReport {
            year: self.bracket.year(),
            results_supplied: self.bracket.results().is_resolved(),
            play_in_games: self.bracket.play_in().games().count(),
            teams_indexed: self.bracket.seed_lookup().len(),
            issues,
        }
    }

    // -----------------------------------------------------------------------
    // Pool commands
    // -----------------------------------------------------------------------

    /// Roster teams still open for picking. Teams named in `exclude` are
    /// treated as already sitting in the pool.
    pub async fn teams<S: TeamSource>(
        &self,
        source: &S,
        search: Option<&str>,
        exclude: &[String],
    ) -> ApiResult<RosterReport> {
        let roster = source.roster().await?;
        let mut pool = Pool::new();
        if !exclude.is_empty() {
            for team in source.pool_summaries(exclude).await? {
                if let Err(e) = pool.push(team) {
                    warn!("not excluded: {e}");
                }
            }
        }

        let teams = pool
            .available(&roster, search.unwrap_or_default())
            .into_iter()
            .cloned()
            .collect();
        Ok(RosterReport {
            search: search.map(str::to_string),
            excluded: pool.filled().iter().map(|t| t.name.clone()).collect(),
            teams,
        })
    }

    pub async fn outcome<S: TeamSource>(&self, source: &S, name: &str) -> ApiResult<OutcomeReport> {
        let analysis = source.analysis(name).await?;
        let outcome = analysis.outcome();
        Ok(OutcomeReport {
            region: self.bracket.seed_lookup().region(&analysis.name),
            name: analysis.name,
            seed: analysis.seed,
            distribution: analysis.win_probability_distribution,
            outcome,
            band: outcome.band(),
        })
    }

    pub async fn pool<S: TeamSource>(&self, source: &S, names: &[String]) -> anyhow::Result<PoolReport> {
        let summaries = source.pool_summaries(names).await?;
        let mut pool = Pool::new();
        for team in summaries {
            pool.push(team)?;
        }
        Ok(self.pool_report(&pool, names))
    }

    fn pool_report(&self, pool: &Pool, requested: &[String]) -> PoolReport {
        let lookup = self.bracket.seed_lookup();
        let slots = pool
            .slots()
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|team| PoolSlot::new(i + 1, team, lookup.region(&team.name))))
            .collect();

        let filled = pool.filled();
        let missing: Vec<String> = requested
            .iter()
            .filter(|name| !filled.iter().any(|t| t.name.eq_ignore_ascii_case(name)))
            .cloned()
            .collect();
        for name in &missing {
            warn!("{name} has no pool data");
        }

        PoolReport {
            slots,
            missing,
            ranked: pool.rank(),
            aggregate: pool.aggregate(),
            tiers: pool.tier_breakdown(),
        }
    }

    pub async fn compare<S: TeamSource>(&self, source: &S, names: &[String]) -> anyhow::Result<CompareReport> {
        if names.len() > MAX_COMPARE {
            bail!("at most {MAX_COMPARE} teams can be compared, got {}", names.len());
        }

        let mut report = CompareReport::default();
        for (name, result) in fetch_analyses(source, names).await {
            match result {
                Ok(analysis) => report.teams.push(CompareColumn::new(analysis)),
                Err(e) => {
                    warn!("{name}: {e}");
                    report.failed.push(FailedLookup { name, error: e.to_string() });
                }
            }
        }
        if report.teams.is_empty() && !names.is_empty() {
            bail!("none of the requested teams could be loaded");
        }
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub year: Option<u16>,
    pub results_supplied: bool,
    pub play_in_games: usize,
    pub teams_indexed: usize,
    pub issues: Vec<ResultsIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterReport {
    pub search: Option<String>,
    pub excluded: Vec<String>,
    pub teams: Vec<TeamEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeReport {
    pub name: String,
    pub seed: u8,
    pub region: Option<RegionName>,
    pub distribution: WinDistribution,
    pub outcome: ExpectedOutcome,
    pub band: ConfidenceBand,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolSlot {
    /// 1-based.
    pub slot: usize,
    pub name: String,
    pub seed: u8,
    pub region: Option<RegionName>,
    pub outcome: ExpectedOutcome,
    pub band: ConfidenceBand,
}

impl PoolSlot {
    fn new(slot: usize, team: &PoolTeamSummary, region: Option<RegionName>) -> Self {
        let outcome = team.outcome();
        Self {
            slot,
            name: team.name.clone(),
            seed: team.seed,
            region,
            outcome,
            band: outcome.band(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolReport {
    pub slots: Vec<PoolSlot>,
    /// Requested names the source had no record for.
    pub missing: Vec<String>,
    pub ranked: Vec<RankedTeam>,
    pub aggregate: PoolAggregate,
    pub tiers: Vec<TierGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareColumn {
    #[serde(flatten)]
    pub analysis: TeamAnalysis,
    pub outcome: ExpectedOutcome,
    pub band: ConfidenceBand,
}

impl CompareColumn {
    fn new(analysis: TeamAnalysis) -> Self {
        let outcome = analysis.outcome();
        Self { analysis, outcome, band: outcome.band() }
    }

    pub fn record(&self) -> String {
        format!("{}-{}", self.analysis.wins, self.analysis.losses)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedLookup {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CompareReport {
    pub teams: Vec<CompareColumn>,
    pub failed: Vec<FailedLookup>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use mmpool_core::{PoolError, PredictionsFile, WinBucket};

    pub(crate) const PREDICTIONS: &str = r#"[
        {"name": "Duke", "tournament_seed": 1, "conference": "ACC", "wins": 35, "losses": 4,
         "win_probability_distribution": {"0": 0.1, "1": 0.2, "2+": 0.7}},
        {"name": "Florida", "tournament_seed": 1, "conference": "SEC", "wins": 36, "losses": 4,
         "win_probability_distribution": {"0": 0.15, "1": 0.25, "2+": 0.6}},
        {"name": "Texas Tech", "tournament_seed": 3, "conference": "Big 12", "wins": 28, "losses": 9,
         "win_probability_distribution": {"0": 0.3, "1": 0.45, "2+": 0.25}},
        {"name": "Drake", "tournament_seed": 11, "conference": "MVC", "wins": 31, "losses": 4,
         "win_probability_distribution": {"0": 0.55, "1": 0.3, "2+": 0.15}},
        {"name": "Omaha", "tournament_seed": 15, "conference": "Summit", "wins": 22, "losses": 13,
         "win_probability_distribution": {"0": 0.9, "1": 0.08, "2+": 0.02}}
    ]"#;

    pub(crate) fn app() -> App {
        App::new(AppSettings::default()).unwrap()
    }

    pub(crate) fn source() -> PredictionsFile {
        PredictionsFile::from_json(PREDICTIONS).unwrap()
    }

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn embedded_bracket_validates_clean() {
        let report = app().validate();
        assert!(report.is_clean());
        assert!(report.results_supplied);
        assert_eq!(report.year, Some(2025));
        assert_eq!(report.play_in_games, 4);
    }

    #[test]
    fn missing_bracket_file_fails_with_context() {
        let settings = AppSettings {
            bracket_path: Some("/nonexistent/2025_bracket.json".into()),
            ..AppSettings::default()
        };
        let err = App::new(settings).err().unwrap();
        assert!(err.to_string().contains("/nonexistent/2025_bracket.json"));
    }

    #[test]
    fn region_filter_narrows_the_view() {
        let view = app().bracket_view(Some(RegionName::South));
        assert_eq!(view.regions.len(), 1);
        assert_eq!(view.regions[0].region, RegionName::South);
        assert!(view.first_four.iter().all(|g| g.destination.region == RegionName::South));

        let full = app().bracket_view(None);
        assert_eq!(full.regions.len(), 4);
        assert_eq!(full.first_four.len(), 4);
    }

    #[tokio::test]
    async fn teams_excludes_picks_and_filters() {
        let app = app();
        let source = source();

        let all = app.teams(&source, None, &[]).await.unwrap();
        assert_eq!(all.teams.len(), 5);

        let report = app.teams(&source, Some("a"), &names(&["florida"])).await.unwrap();
        assert_eq!(report.excluded, vec!["Florida".to_string()]);
        let listed: Vec<&str> = report.teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(listed, vec!["Texas Tech", "Drake", "Omaha"]);
    }

    #[tokio::test]
    async fn outcome_carries_band_and_region() {
        let report = app().outcome(&source(), "Texas Tech").await.unwrap();
        assert_eq!(report.outcome.bucket, WinBucket::One);
        assert_eq!(report.outcome.wins, 1);
        assert_eq!(report.band, ConfidenceBand::Red);
        assert_eq!(report.region, Some(RegionName::West));
    }

    #[tokio::test]
    async fn pool_reports_slots_ranking_and_tiers() {
        let app = app();
        let report = app
            .pool(&source(), &names(&["Drake", "Duke", "Texas Tech", "Gonzaga"]))
            .await
            .unwrap();

        let slots: Vec<(usize, &str)> = report.slots.iter().map(|s| (s.slot, s.name.as_str())).collect();
        assert_eq!(slots, vec![(1, "Drake"), (2, "Duke"), (3, "Texas Tech")]);
        assert_eq!(report.slots[1].region, Some(RegionName::East));
        assert_eq!(report.missing, vec!["Gonzaga".to_string()]);

        let ranked: Vec<&str> = report.ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(ranked, vec!["Duke", "Texas Tech", "Drake"]);

        let stats = report.aggregate.stats().unwrap();
        assert_eq!(stats.total_wins, 3);
        assert_eq!(stats.team_count, 3);
        assert_eq!(report.tiers.len(), 2);
        assert_eq!(report.tiers[0].teams, vec!["Duke".to_string(), "Texas Tech".to_string()]);
    }

    #[tokio::test]
    async fn empty_pool_has_no_data() {
        let report = app().pool(&source(), &names(&["Gonzaga"])).await.unwrap();
        assert!(report.slots.is_empty());
        assert_eq!(report.aggregate, PoolAggregate::NoData);
        assert!(report.tiers.is_empty());
    }

    #[tokio::test]
    async fn duplicate_pick_is_rejected() {
        let err = app().pool(&source(), &names(&["Duke", "duke"])).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<PoolError>(), Some(PoolError::AlreadyAssigned { .. })));
    }

    #[tokio::test]
    async fn compare_keeps_request_order_and_reports_failures() {
        let app = app();
        let report = app
            .compare(&source(), &names(&["Florida", "Nobody", "Omaha"]))
            .await
            .unwrap();
        let listed: Vec<&str> = report.teams.iter().map(|c| c.analysis.name.as_str()).collect();
        assert_eq!(listed, vec!["Florida", "Omaha"]);
        assert_eq!(report.teams[0].record(), "36-4");
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "Nobody");

        let too_many = names(&["Duke", "Florida", "Texas Tech", "Drake", "Omaha"]);
        assert!(app.compare(&source(), &too_many).await.is_err());
        assert!(app.compare(&source(), &names(&["Nobody"])).await.is_err());
    }
}
