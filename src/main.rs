// src/main.rs

//! gkfeed CLI
//!
//! One invocation is one run; the scheduler lives outside this process
//! (cron, CI). Exit status is non-zero when the run failed, and a failed
//! run sends exactly one operator alert before exiting.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use gkfeed::config::{Config, FetchConfig, SourceSpec};
use gkfeed::error::Result;
use gkfeed::notify::{FailureNotifier, Notifier};
use gkfeed::pipeline::{run_pipeline, run_with_notifier};
use gkfeed::publish::{LogPublisher, TelegramPublisher};
use gkfeed::source::HtmlListSource;
use gkfeed::store::{MemoryStore, MongoStore};

/// gkfeed - current-affairs feed to Telegram
#[derive(Parser, Debug)]
#[command(name = "gkfeed", version, about = "Posts newly published articles to a Telegram channel")]
struct Cli {
    /// Path to the source definition file
    #[arg(short, long, default_value = "source.toml")]
    source_spec: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, deduplicate, and publish new items
    Run {
        /// Scrape only: in-memory store, log instead of sending
        #[arg(long)]
        dry_run: bool,
    },

    /// Check env configuration and the source definition
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let spec = SourceSpec::load_or_default(&cli.source_spec);

    let result = match cli.command {
        Command::Run { dry_run: true } => dry_run(spec).await,
        Command::Run { dry_run: false } => run(spec).await,
        Command::Validate => validate(spec),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Full run against MongoDB and Telegram.
async fn run(spec: SourceSpec) -> Result<()> {
    let config = Config::from_env()?;
    let notifier = FailureNotifier::new(&config.telegram)?;

    // Setup failures alert here; pipeline failures alert inside
    // run_with_notifier. Either way a failed run sends exactly one.
    let (source, store, publisher) = match setup(&config, spec).await {
        Ok(parts) => parts,
        Err(e) => {
            notifier.notify_failure(&e.to_string()).await;
            return Err(e);
        }
    };

    run_with_notifier(&source, &store, &publisher, &notifier).await?;
    Ok(())
}

async fn setup(
    config: &Config,
    spec: SourceSpec,
) -> Result<(HtmlListSource, MongoStore, TelegramPublisher)> {
    let source = HtmlListSource::new(spec, &config.fetch)?;
    let store = MongoStore::connect(&config.store).await?;
    let publisher = TelegramPublisher::new(&config.telegram)?;
    Ok((source, store, publisher))
}

/// Scrape-only run: nothing persisted, nothing sent.
async fn dry_run(spec: SourceSpec) -> Result<()> {
    log::info!("Dry run: using in-memory store, not sending messages");

    let source = HtmlListSource::new(spec, &FetchConfig::from_env())?;
    let store = MemoryStore::new();
    let publisher = LogPublisher;

    run_pipeline(&source, &store, &publisher).await?;
    Ok(())
}

/// Validate configuration without touching the network.
fn validate(spec: SourceSpec) -> Result<()> {
    spec.validate()?;
    log::info!("Source spec OK ({} pages from {})", spec.pages, spec.base_url);

    let config = Config::from_env()?;
    config.validate()?;
    log::info!(
        "Config OK (db '{}', collection '{}', channel '{}')",
        config.store.db_name,
        config.store.collection_name,
        config.telegram.channel_id
    );

    Ok(())
}
