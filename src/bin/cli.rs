//! yen-to-euro command line
//!
//! Annotates Yen amounts on a live page, converts saved DOM snapshots, or
//! prints the rate that would be used.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use yen_to_euro::browser::{BrowserSession, ConnectionOptions, LaunchOptions, LivePage, normalize_url};
use yen_to_euro::rate::{ExchangeRateApi, JsonFileStore, MemoryStore, RateResolver, RateStore, today};
use yen_to_euro::{ConversionContext, Converter, ConverterConfig, Document, Orchestrator, RateSource, Trigger};

#[derive(Parser)]
#[command(name = "yen-to-euro")]
#[command(version)]
#[command(about = "Annotate Yen amounts on web pages with their Euro value", long_about = None)]
struct Cli {
    /// JSON config file (see ConverterConfig)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use this Yen-to-Euro rate instead of fetching one
    #[arg(long, global = true, value_name = "RATE")]
    rate: Option<f64>,

    /// JSON file used as rate cache
    #[arg(long, global = true, value_name = "FILE")]
    cache: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a page, annotate it, and keep it annotated on clicks and mutations
    Watch {
        /// Page to open
        url: String,

        /// Launch browser in headed mode (default: headless)
        #[arg(long, short = 'H')]
        headed: bool,

        /// Path to custom browser executable
        #[arg(long, value_name = "PATH")]
        executable_path: Option<PathBuf>,

        /// WebSocket endpoint URL for remote browser connection
        #[arg(long, value_name = "URL")]
        ws_endpoint: Option<String>,

        /// Persistent browser profile directory
        #[arg(long, value_name = "DIR")]
        user_data_dir: Option<PathBuf>,

        /// Do not re-run on DOM mutations
        #[arg(long)]
        no_mutations: bool,

        /// Trigger poll interval in milliseconds
        #[arg(long, value_name = "MS")]
        poll_ms: Option<u64>,

        /// Stop after this many seconds (default: run until interrupted)
        #[arg(long, value_name = "SECS")]
        duration_secs: Option<u64>,
    },
    /// Run one pass over a DOM snapshot file and print the annotated snapshot
    Convert {
        /// Snapshot JSON file
        snapshot: PathBuf,
    },
    /// Resolve and print the conversion rate
    Rate,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

/// Resolve the conversion context: explicit override, else cached/fetched
/// rate through `store`, else the configured default
fn resolve_context(config: &ConverterConfig, rate: Option<f64>, store: &dyn RateStore) -> anyhow::Result<ConversionContext> {
    if let Some(rate) = rate {
        return ConversionContext::new(rate, RateSource::Override).context("invalid --rate");
    }

    let provider = ExchangeRateApi::new(config.rate_endpoint.as_str())?;
    Ok(RateResolver::new(&provider, store)
        .key(config.storage_key.as_str())
        .default_rate(config.default_rate)
        .resolve(&today()))
}

fn offline_store(config: &ConverterConfig) -> Box<dyn RateStore> {
    match &config.cache_path {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::new()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => ConverterConfig::from_file(path)?,
        None => ConverterConfig::default(),
    };
    if let Some(cache) = cli.cache.clone() {
        config = config.cache_path(cache);
    }

    match cli.command {
        Command::Watch {
            url,
            headed,
            executable_path,
            ws_endpoint,
            user_data_dir,
            no_mutations,
            poll_ms,
            duration_secs,
        } => {
            if no_mutations {
                config = config.observe_mutations(false);
            }
            if let Some(poll_ms) = poll_ms {
                config = config.poll_interval_ms(poll_ms);
            }
            config.validate()?;

            let session = match ws_endpoint {
                Some(endpoint) => {
                    eprintln!("Connecting to {}", endpoint);
                    BrowserSession::connect(ConnectionOptions::new(endpoint))?
                }
                None => {
                    let mut options = LaunchOptions::new().headless(!headed);
                    if let Some(path) = executable_path {
                        options = options.chrome_path(path);
                    }
                    if let Some(dir) = user_data_dir {
                        options = options.user_data_dir(dir);
                    }
                    eprintln!("Browser mode: {}", if options.headless { "headless" } else { "headed" });
                    BrowserSession::launch(options)?
                }
            };

            let url = normalize_url(&url);
            let tab = session.navigate(&url)?;
            eprintln!("Watching {}", url);

            let mut page = LivePage::new(tab, config.observe_mutations);
            page.install_triggers()?;

            let context = match &config.cache_path {
                Some(_) => resolve_context(&config, cli.rate, offline_store(&config).as_ref())?,
                None => resolve_context(&config, cli.rate, &session.local_storage()?)?,
            };
            eprintln!("Conversion rate: {} ({:?})", context.rate(), context.source());

            let mut orchestrator = Orchestrator::new()
                .observe_mutations(config.observe_mutations)
                .with_context(context);
            orchestrator.enqueue(Trigger::Load);

            let deadline = duration_secs.map(|secs| Instant::now() + Duration::from_secs(secs));
            orchestrator.run(&mut page, Duration::from_millis(config.poll_interval_ms), deadline);
        }
        Command::Convert { snapshot } => {
            let json = std::fs::read_to_string(&snapshot)
                .with_context(|| format!("failed to read {}", snapshot.display()))?;
            let mut doc = Document::from_json(&json)?;

            let context = resolve_context(&config, cli.rate, offline_store(&config).as_ref())?;
            let report = Converter::new(context).run_pass(&mut doc);

            eprintln!("{}", serde_json::to_string(&report)?);
            println!("{}", doc.to_json()?);
        }
        Command::Rate => {
            let context = resolve_context(&config, cli.rate, offline_store(&config).as_ref())?;
            println!("{} ({:?})", context.rate(), context.source());
        }
    }

    Ok(())
}
