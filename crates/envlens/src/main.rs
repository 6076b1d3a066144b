use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use envlens_core::config::EnvlensConfig;
use envlens_core::outputs::ParquetSink;
use envlens_core::pipeline::{LoadState, Orchestrator, ShowOutcome};
use envlens_core::source::FileDataSource;
use futures::future::join_all;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Exploratory statistics for environmental sensor exports", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults to $ENVLENS_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the batch exports (defaults to $ENVLENS_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the configured locations
    Profiles,
    /// Run the pipeline for one or more locations and write the derived tables
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Location ids to render
    locations: Vec<String>,
    /// Render every configured location
    #[arg(long, conflicts_with = "locations")]
    all: bool,
    /// Output directory for the Parquet files
    #[arg(long, default_value = "envlens-out")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = load_config(cli.config, cli.data_dir)?;

    match cli.command {
        Command::Profiles => {
            print_profiles(&config);
            Ok(())
        }
        Command::Render(args) => render(config, args).await,
    }
}

fn load_config(path: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<EnvlensConfig> {
    let path = path.or_else(|| std::env::var_os("ENVLENS_CONFIG").map(PathBuf::from));
    let mut config = match path {
        Some(path) => EnvlensConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EnvlensConfig::default(),
    };

    if let Some(dir) = data_dir.or_else(|| std::env::var_os("ENVLENS_DATA_DIR").map(PathBuf::from)) {
        config = config.with_data_dir(dir);
    }
    Ok(config)
}

fn print_profiles(config: &EnvlensConfig) {
    let mut table = Table::new();
    table.set_header(vec!["location", "source", "variables"]);
    for profile in config.profiles.iter() {
        table.add_row(vec![
            profile.id.clone(),
            config.data_dir.join(&profile.source).display().to_string(),
            profile.variables.join(", "),
        ]);
    }
    println!("{table}");
}

async fn render(config: EnvlensConfig, args: RenderArgs) -> Result<()> {
    let locations: Vec<String> = if args.all {
        config.profiles.ids().map(str::to_string).collect()
    } else {
        args.locations
    };
    if locations.is_empty() {
        bail!("no locations given; pass location ids or --all");
    }

    info!(locations = ?locations, out = %args.out.display(), "rendering locations");
    let source = Arc::new(FileDataSource::from_config(&config));
    let sink = Arc::new(ParquetSink::new(&args.out));
    let orchestrator = Orchestrator::new(config, source, sink);

    let outcomes = join_all(locations.iter().map(|id| orchestrator.show(id))).await;

    let mut table = Table::new();
    table.set_header(vec!["location", "state", "records", "unparseable", "years"]);
    let mut failures = 0;
    for (id, outcome) in locations.iter().zip(outcomes) {
        let report = match &outcome {
            Ok(outcome) => outcome.report().cloned(),
            Err(err) => {
                warn!(location = %id, error = %err, "location not rendered");
                failures += 1;
                None
            }
        };
        let state = match &outcome {
            Ok(ShowOutcome::Rendered(_)) => "rendered".to_string(),
            Ok(ShowOutcome::AlreadyTriggered(state)) => state.label().to_string(),
            Err(err) => match orchestrator.state(id).await {
                Some(LoadState::Unavailable(_)) => format!("unavailable: {err}"),
                _ => format!("error: {err}"),
            },
        };

        match report {
            Some(report) => table.add_row(vec![
                id.clone(),
                state,
                report.total_records.to_string(),
                report.unparseable_records.to_string(),
                report
                    .years
                    .iter()
                    .map(|year| year.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ]),
            None => table.add_row(vec![id.clone(), state, "-".into(), "-".into(), "-".into()]),
        };
    }
    println!("{table}");

    if failures == locations.len() {
        bail!("no location could be rendered");
    }
    Ok(())
}
