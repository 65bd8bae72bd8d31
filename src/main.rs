use clap::Parser;
use pricescrape::{PriceScraper, Target};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Scrape product prices into per-item history and per-domain summary tables.
///
/// With no TARGET, URLs are read from `targetURL.json` in the working directory.
#[derive(Debug, Parser)]
#[command(name = "pricescrape", version, about)]
struct Cli {
    /// Product URL to scrape, or a `.json` batch file.
    target: Option<String>,

    /// Directory under which domain folders are written.
    #[arg(long, env = "PRICESCRAPE_ROOT", default_value = ".")]
    root: PathBuf,

    /// HTTP timeout in seconds.
    #[arg(long, env = "PRICESCRAPE_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Do not save raw HTML archives.
    #[arg(long)]
    no_archive: bool,

    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

const EXIT_FAILED: u8 = 1;
const EXIT_CONFIG: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let scraper = match PriceScraper::builder()
        .root_dir(&cli.root)
        .timeout(Duration::from_secs(cli.timeout))
        .archive(!cli.no_archive)
        .build()
    {
        Ok(scraper) => scraper,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    match Target::from_arg(cli.target.as_deref()) {
        Target::Single(url) => match scraper.process_url(&url) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                error!("FAILED [{}] {}: {}", e.kind(), url, e);
                ExitCode::from(EXIT_FAILED)
            }
        },
        Target::Batch(path) => match scraper.run_batch_file(&path) {
            Ok(report) => {
                for failure in &report.failures {
                    warn!("  failed [{}] {}", failure.kind, failure.url);
                }
                info!(
                    "Successfully processed: {} / {}",
                    report.succeeded, report.total
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{}", e);
                ExitCode::from(EXIT_CONFIG)
            }
        },
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
