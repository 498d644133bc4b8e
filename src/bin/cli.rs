//! Release Radar CLI
//!
//! Local entry point, meant to be invoked by an external scheduler.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use release_radar::{
    error::{AppError, Result},
    models::{Config, DispatchMode, ReleaseSource},
    pipeline::{self, RunOptions},
    services::{ConsoleNotifier, Notifier, WebhookNotifier},
    utils::http::{self, DocumentFetcher, HttpFetcher},
};

/// Release Radar - upcoming beer releases to chat
#[derive(Parser, Debug)]
#[command(name = "release-radar", version, about = "Upcoming beer release notifier")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect releases and notify them
    Run {
        /// Release source: calendar or api
        #[arg(long)]
        source: Option<ReleaseSource>,

        /// Dispatch mode: batch or immediate
        #[arg(long)]
        mode: Option<DispatchMode>,

        /// Window start (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print messages instead of posting them
        #[arg(long)]
        dry_run: bool,
    },

    /// Collect releases and print them as JSON
    Scan {
        /// Release source: calendar or api
        #[arg(long)]
        source: Option<ReleaseSource>,

        /// Window start (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run_options(
    config: &mut Config,
    source: Option<ReleaseSource>,
    mode: Option<DispatchMode>,
    date: Option<NaiveDate>,
) -> Result<RunOptions> {
    if let Some(source) = source {
        config.run.source = source;
    }
    if let Some(mode) = mode {
        config.notifier.mode = mode;
    }
    config.validate()?;

    let today = date.unwrap_or_else(|| Local::now().date_naive());
    Ok(RunOptions::from_config(config, today))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();
    log::debug!("Loaded configuration from {}", cli.config.display());

    let client = http::create_async_client(&config.fetcher)?;
    let fetcher: Arc<dyn DocumentFetcher> = Arc::new(HttpFetcher::new(client.clone()));

    match cli.command {
        Command::Run {
            source,
            mode,
            date,
            dry_run,
        } => {
            let options = run_options(&mut config, source, mode, date)?;

            let notifier: Box<dyn Notifier> = if dry_run {
                Box::new(ConsoleNotifier)
            } else if config.notifier.webhook_url.is_empty() {
                return Err(AppError::config(
                    "notifier.webhook_url is empty (set SLACK_URL or use --dry-run)",
                ));
            } else {
                Box::new(WebhookNotifier::new(client, &config.notifier.webhook_url))
            };

            let summary =
                pipeline::run_pipeline(&config, fetcher, notifier.as_ref(), &options).await?;
            if summary.notify_failures > 0 {
                log::warn!("{} notification(s) failed", summary.notify_failures);
            }
        }

        Command::Scan { source, date } => {
            let options = run_options(&mut config, source, None, date)?;
            let report = pipeline::collect(&config, fetcher, &options).await?;
            report.diagnostics.log_all();
            println!("{}", serde_json::to_string_pretty(&report.releases)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (source: {})", config.run.source);
        }
    }

    Ok(())
}
