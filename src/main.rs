use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use starcast::{
    CollectBatchUseCase, CollectRepositoryUseCase, ForecastGrowthUseCase, GitHubStarSource,
    JsonDatasetStore, RepoIdentity, DEFAULT_BASE_URL, DEFAULT_SAMPLE_SIZE,
};

#[derive(Parser)]
#[command(name = "starcast")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, default_value = "~/.starcast")]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect snapshot and star history for one or more repositories
    Collect {
        /// Repositories as OWNER/NAME
        #[arg(required = true)]
        repos: Vec<String>,

        #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
        sample_size: usize,

        /// GitHub token; falls back to GITHUB_TOKEN. Optional, but
        /// unauthenticated calls hit a stricter rate ceiling.
        #[arg(long)]
        token: Option<String>,

        /// Courtesy pause between repositories in a batch
        #[arg(long, default_value = "2")]
        delay_secs: u64,
    },

    /// Forecast star growth from the latest collected dataset
    Forecast {
        /// Repository as OWNER/NAME
        repo: String,

        #[arg(long, default_value = "90")]
        horizon_days: u32,

        /// Hold out the trailing N days and report forecast accuracy
        #[arg(long)]
        holdout_days: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let data_dir = expand_tilde(&cli.data_dir);
    let store = Arc::new(JsonDatasetStore::new(&data_dir)?);

    match cli.command {
        Commands::Collect {
            repos,
            sample_size,
            token,
            delay_secs,
        } => {
            let identities = parse_identities(&repos)?;

            // Credential and endpoint are resolved once here and injected;
            // the adapter never reads the environment on its own.
            let token = token.or_else(|| std::env::var("GITHUB_TOKEN").ok());
            let base_url = std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
            let source = Arc::new(GitHubStarSource::new(token, base_url));
            if !source.is_authenticated() {
                info!("No token provided; using unauthenticated rate limits");
            }

            if identities.len() == 1 {
                let use_case = CollectRepositoryUseCase::new(source, store);
                let (dataset, path) = use_case.execute(&identities[0], sample_size).await?;
                println!(
                    "Collected {} star events for {} -> {}",
                    dataset.star_history.len(),
                    dataset.repository,
                    path.display()
                );
            } else {
                let batch = CollectBatchUseCase::new(source, store)
                    .with_delay(Duration::from_secs(delay_secs));
                let outcomes = batch.execute(&identities, sample_size).await;

                println!("\nCollection Summary:");
                let mut failures = 0;
                for outcome in &outcomes {
                    match &outcome.result {
                        Ok(path) => {
                            println!("  ok     {} -> {}", outcome.identity, path.display())
                        }
                        Err(e) => {
                            failures += 1;
                            println!("  failed {} ({})", outcome.identity, e);
                        }
                    }
                }
                if failures > 0 {
                    anyhow::bail!("{failures} of {} collections failed", outcomes.len());
                }
            }
        }

        Commands::Forecast {
            repo,
            horizon_days,
            holdout_days,
        } => {
            let identity: RepoIdentity = repo.parse()?;
            let use_case = ForecastGrowthUseCase::new(store);
            let summary = use_case
                .execute(&identity, horizon_days, holdout_days)
                .await?;

            println!("\nForecast Results for {}:", summary.identity);
            println!("  Data points:            {}", summary.observations);
            println!("  Current stars:          {:.0}", summary.current_stars);
            println!(
                "  Predicted ({} days):    {:.0}",
                horizon_days, summary.predicted_stars
            );
            println!("  Expected growth:        {:+.0}", summary.expected_growth());

            if let Some(report) = summary.accuracy {
                let report = report.rounded();
                if report.sample_count == 0 {
                    println!("  Holdout accuracy:       no overlapping observations");
                } else {
                    println!(
                        "  Holdout accuracy:       MAE {} / RMSE {} / R\u{b2} {} (n={})",
                        report.mae, report.rmse, report.r2, report.sample_count
                    );
                }
            }
        }
    }

    Ok(())
}

fn parse_identities(repos: &[String]) -> Result<Vec<RepoIdentity>> {
    repos
        .iter()
        .map(|r| r.parse::<RepoIdentity>().map_err(Into::into))
        .collect()
}

fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
