//! Plain-text rendering of the command reports. `--json` bypasses this and
//! serializes the reports directly.
use crate::app::{CompareReport, OutcomeReport, PoolReport, RosterReport, ValidationReport};
use mmpool_core::bracket::{NationalView, PlayInView};
use mmpool_core::outcome::format_percent;
use mmpool_core::rounds::RegionRounds;
use mmpool_core::{BracketView, ExpectedOutcome, RegionName, TeamSlot, WinBucket};

const INDENT: &str = "  ";

/// "(1) Duke*" when the team advanced out of the game.
fn slot_label(slot: &TeamSlot) -> String {
    if slot.advanced {
        format!("{}*", slot.label())
    } else {
        slot.label()
    }
}

fn game_line(pair: &[TeamSlot]) -> String {
    let labels: Vec<String> = pair.iter().map(slot_label).collect();
    format!("{INDENT}{INDENT}{}", labels.join(" vs "))
}

fn outcome_label(outcome: &ExpectedOutcome) -> String {
    let wins = match outcome.bucket {
        WinBucket::One => "1 win".to_string(),
        bucket => format!("{bucket} wins"),
    };
    format!("{wins} ({}, {})", format_percent(outcome.probability), outcome.band())
}

fn region_label(region: Option<RegionName>) -> &'static str {
    region.map(|r| r.label()).unwrap_or("-")
}

// ---------------------------------------------------------------------------
// Bracket
// ---------------------------------------------------------------------------

pub fn render_bracket(view: &BracketView) -> String {
    let mut lines = Vec::new();
    let title = match view.year {
        Some(year) => format!("{year} NCAA Tournament"),
        None => "NCAA Tournament".to_string(),
    };
    lines.push(title);

    if !view.first_four.is_empty() {
        lines.push(String::new());
        lines.push("First Four".to_string());
        lines.extend(view.first_four.iter().map(play_in_line));
    }

    for region in &view.regions {
        lines.push(String::new());
        lines.extend(region_lines(region));
    }

    // The national layer only makes sense over the whole field.
    if view.regions.len() == RegionName::ALL.len() {
        lines.push(String::new());
        lines.extend(national_lines(&view.national));
    }

    lines.join("\n")
}

fn play_in_line(game: &PlayInView) -> String {
    format!(
        "{INDENT}{} -> {}: {}",
        game.id,
        game.destination,
        game.teams.iter().map(slot_label).collect::<Vec<_>>().join(" vs ")
    )
}

fn region_lines(region: &RegionRounds) -> Vec<String> {
    let mut lines = vec![region.region.label().to_string()];
    for round in &region.rounds {
        lines.push(format!("{INDENT}{}", round.kind.label()));
        lines.extend(round.slots.chunks(2).map(game_line));
    }
    if let Some(champion) = region.champion() {
        lines.push(format!("{INDENT}Final Four: {}", champion.label()));
    }
    lines
}

fn national_lines(national: &NationalView) -> Vec<String> {
    let mut lines = vec!["Final Four".to_string()];
    lines.extend(national.semifinals.iter().map(|semi| game_line(semi)));
    lines.push("Championship".to_string());
    lines.push(game_line(&national.championship));
    let champion = if national.champion.is_filled() { national.champion.label() } else { "TBD".to_string() };
    lines.push(format!("Champion: {champion}"));
    lines
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn render_validation(report: &ValidationReport) -> String {
    let mut lines = vec![format!(
        "{} teams indexed, {} First Four games",
        report.teams_indexed, report.play_in_games
    )];
    if !report.results_supplied {
        lines.push("No results supplied; nothing to check.".to_string());
    } else if report.is_clean() {
        lines.push("Results are consistent.".to_string());
    } else {
        lines.push(format!("{} issues:", report.issues.len()));
        lines.extend(report.issues.iter().map(|issue| format!("{INDENT}{issue}")));
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

pub fn render_roster(report: &RosterReport) -> String {
    let mut lines = Vec::new();
    if !report.excluded.is_empty() {
        lines.push(format!("Already picked: {}", report.excluded.join(", ")));
    }
    if report.teams.is_empty() {
        lines.push("No teams available.".to_string());
    }
    lines.extend(
        report
            .teams
            .iter()
            .map(|t| format!("{INDENT}({}) {}", t.seed, t.name)),
    );
    lines.join("\n")
}

pub fn render_outcome(report: &OutcomeReport) -> String {
    let d = &report.distribution;
    [
        format!("({}) {} [{}]", report.seed, report.name, region_label(report.region)),
        format!("{INDENT}Expected: {}", outcome_label(&report.outcome)),
        format!(
            "{INDENT}0 wins {} | 1 win {} | 2+ wins {}",
            format_percent(d.zero_wins),
            format_percent(d.one_win),
            format_percent(d.two_plus_wins)
        ),
    ]
    .join("\n")
}

pub fn render_pool(report: &PoolReport) -> String {
    let mut lines = vec!["Pool".to_string()];
    lines.extend(report.slots.iter().map(|s| {
        format!(
            "{INDENT}{}. ({}) {} [{}]: {}",
            s.slot,
            s.seed,
            s.name,
            region_label(s.region),
            outcome_label(&s.outcome)
        )
    }));
    if !report.missing.is_empty() {
        lines.push(format!("{INDENT}No data: {}", report.missing.join(", ")));
    }

    lines.push(format!("Total: {}", report.aggregate));

    if !report.ranked.is_empty() {
        lines.push("Ranked".to_string());
        lines.extend(
            report
                .ranked
                .iter()
                .enumerate()
                .map(|(i, r)| format!("{INDENT}{}. ({}) {}: {}", i + 1, r.seed, r.name, outcome_label(&r.outcome))),
        );
    }

    if !report.tiers.is_empty() {
        lines.push("By seed".to_string());
        lines.extend(report.tiers.iter().map(|group| {
            format!(
                "{INDENT}{}: {} wins, {} avg ({})",
                group.tier,
                group.stats.total_label(),
                format_percent(group.stats.avg_probability),
                group.teams.join(", ")
            )
        }));
    }
    lines.join("\n")
}

pub fn render_compare(report: &CompareReport) -> String {
    let mut lines = Vec::new();
    for column in &report.teams {
        let team = &column.analysis;
        let d = &team.win_probability_distribution;
        lines.push(format!("({}) {} {} {}", team.seed, team.name, column.record(), team.conference));
        lines.push(format!("{INDENT}Expected: {}", outcome_label(&column.outcome)));
        lines.push(format!(
            "{INDENT}0 wins {} | 1 win {} | 2+ wins {}",
            format_percent(d.zero_wins),
            format_percent(d.one_win),
            format_percent(d.two_plus_wins)
        ));
        if let Some(stats) = &team.team_stats {
            lines.push(format!(
                "{INDENT}Height {} | 2P {:.1}% | 3P {:.1}% | TO {:.2} | STL {:.2}",
                stats.avg_height, stats.two_point_pct, stats.three_point_pct, stats.turnovers, stats.steals
            ));
        }
        for player in &team.top_players {
            lines.push(format!(
                "{INDENT}{INDENT}{} {} {} {:.1} min {:.1} pts {:.1}% FT",
                player.name, player.position, player.height, player.avg_minutes, player.avg_points, player.free_throw_pct
            ));
        }
        if !team.profile_summary.is_empty() {
            lines.push(format!("{INDENT}{}", team.profile_summary));
        }
    }
    for failed in &report.failed {
        lines.push(format!("{}: {}", failed.name, failed.error));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{app, source};

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn full_bracket_renders_every_layer() {
        let text = render_bracket(&app().bracket_view(None));
        assert!(text.starts_with("2025 NCAA Tournament"));
        assert!(text.contains("First Four"));
        assert!(text.contains("(1) Duke* vs (16) Mount St. Mary's"));
        assert!(text.contains("Champion: (1) Florida"));
    }

    #[test]
    fn single_region_skips_the_national_layer() {
        let text = render_bracket(&app().bracket_view(Some(RegionName::East)));
        assert!(text.contains("East"));
        assert!(!text.contains("West"));
        assert!(!text.contains("Champion:"));
    }

    #[test]
    fn outcome_labels() {
        let one = ExpectedOutcome { bucket: WinBucket::One, wins: 1, probability: 0.45 };
        assert_eq!(outcome_label(&one), "1 win (45.0%, red)");
        let two = ExpectedOutcome { bucket: WinBucket::TwoPlus, wins: 2, probability: 0.7 };
        assert_eq!(outcome_label(&two), "2+ wins (70.0%, green)");
    }

    #[test]
    fn clean_validation_text() {
        let text = render_validation(&app().validate());
        assert!(text.contains("Results are consistent."));
    }

    #[tokio::test]
    async fn pool_text_lists_slots_and_totals() {
        let app = app();
        let report = app.pool(&source(), &names(&["Duke", "Omaha"])).await.unwrap();
        let text = render_pool(&report);
        assert!(text.contains("1. (1) Duke [East]: 2+ wins (70.0%, green)"));
        assert!(text.contains("2. (15) Omaha [West]: 0 wins (90.0%, green)"));
        assert!(text.contains("Total: 2+ expected wins"));
    }

    #[test]
    fn empty_pool_text() {
        let report = PoolReport {
            slots: Vec::new(),
            missing: names(&["Gonzaga"]),
            ranked: Vec::new(),
            aggregate: mmpool_core::PoolAggregate::NoData,
            tiers: Vec::new(),
        };
        let text = render_pool(&report);
        assert!(text.contains("No data: Gonzaga"));
        assert!(text.contains("Total: no teams selected"));
    }

    #[tokio::test]
    async fn compare_text_names_failures() {
        let report = app()
            .compare(&source(), &names(&["Drake", "Nobody"]))
            .await
            .unwrap();
        let text = render_compare(&report);
        assert!(text.contains("(11) Drake 31-4 MVC"));
        assert!(text.contains("Nobody: Not found"));
    }
}
