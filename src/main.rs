mod app;
mod report;
mod state;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::source::DataSource;
use clap::{Parser, Subcommand};
use mmpool_core::RegionName;
use mmpool_core::pool::{MAX_COMPARE, POOL_SIZE};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mmpool", version, about = "NCAA tournament bracket projection and pool analytics")]
struct Cli {
    /// Bracket configuration JSON [env: MMPOOL_BRACKET_JSON] (default: embedded 2025 bracket)
    #[arg(long, global = true, value_name = "PATH")]
    bracket: Option<PathBuf>,

    /// Analysis service base URL [env: MMPOOL_API_URL] (default: http://localhost:8000)
    #[arg(long, global = true, value_name = "URL")]
    api: Option<String>,

    /// Local predictions JSON, used instead of the analysis service [env: MMPOOL_PREDICTIONS_JSON]
    #[arg(long, global = true, value_name = "PATH")]
    predictions: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the projected bracket
    Bracket {
        /// Only this region (East, West, South, Midwest)
        #[arg(long)]
        region: Option<RegionName>,
    },
    /// Check the results record against the bracket
    Validate,
    /// List teams available for a pool
    Teams {
        /// Case-insensitive name filter
        #[arg(long)]
        search: Option<String>,
        /// Teams already picked
        #[arg(long, value_name = "NAME")]
        exclude: Vec<String>,
    },
    /// Expected outcome for one team
    Outcome { team: String },
    /// Score a pool of up to eight teams
    Pool {
        #[arg(required = true, num_args = 1..=POOL_SIZE)]
        teams: Vec<String>,
    },
    /// Compare up to four teams side by side
    Compare {
        #[arg(required = true, num_args = 1..=MAX_COMPARE)]
        teams: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    better_panic::install();

    let cli = Cli::parse();
    let settings = AppSettings::load()
        .with_overrides(cli.bracket, cli.api, cli.predictions)
        .with_verbosity(cli.verbose);
    let settings = AppSettings { json: cli.json, ..settings };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(settings.default_filter()))
        .format_timestamp(None)
        .init();

    let app = App::new(settings)?;
    run(&app, cli.command).await
}

async fn run(app: &App, command: Command) -> anyhow::Result<()> {
    let json = app.settings.json;
    match command {
        Command::Bracket { region } => emit(json, &app.bracket_view(region), report::render_bracket),
        Command::Validate => {
            let validation = app.validate();
            emit(json, &validation, report::render_validation)?;
            if !validation.is_clean() {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Teams { search, exclude } => {
            let source = DataSource::open(&app.settings)?;
            let roster = app.teams(&source, search.as_deref(), &exclude).await?;
            emit(json, &roster, report::render_roster)
        }
        Command::Outcome { team } => {
            let source = DataSource::open(&app.settings)?;
            emit(json, &app.outcome(&source, &team).await?, report::render_outcome)
        }
        Command::Pool { teams } => {
            let source = DataSource::open(&app.settings)?;
            emit(json, &app.pool(&source, &teams).await?, report::render_pool)
        }
        Command::Compare { teams } => {
            let source = DataSource::open(&app.settings)?;
            emit(json, &app.compare(&source, &teams).await?, report::render_compare)
        }
    }
}

fn emit<T: Serialize>(json: bool, value: &T, render: fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", render(value));
    }
    Ok(())
}
