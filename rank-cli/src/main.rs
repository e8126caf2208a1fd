mod cli;
mod config;
mod error;
mod output;

use crate::{cli::Args, config::AppConfig, error::Result, output::OutputManager};
use bili_ranking::{BilibiliClient, Crawler, read_snapshot};
use clap::Parser;
#[cfg(feature = "colored-output")]
use colored::*;
use std::process;
use tracing::{error, info};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("Application error: {}", e);
        #[cfg(feature = "colored-output")]
        {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        #[cfg(not(feature = "colored-output"))]
        {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    init_logging(args.verbose, args.quiet)?;

    let mut config = AppConfig::load(args.config.as_deref())?;
    config.apply_args(&args);

    let output = OutputManager::new(cfg!(feature = "colored-output"));

    if let Some(path) = &args.from_snapshot {
        let results = read_snapshot(path).await?;
        info!(path = %path.display(), entries = results.len(), "loaded snapshot");
        print!("{}", output.format_ranking(&results, config.display.top));
        return Ok(());
    }

    let AppConfig { crawler, display } = config;
    crawler.validate()?;

    let client = BilibiliClient::new(&crawler)?;
    let results = Crawler::new(client, crawler).run().await?;

    if display.show_ranking {
        print!("{}", output.format_ranking(&results, display.top));
    }
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(verbose, quiet, rust_log.as_deref());

    let subscriber = tracing_subscriber::registry().with(filter);

    subscriber
        .with(fmt::layer().with_target(verbose).with_level(verbose))
        .init();
    Ok(())
}

/// `-q` and `-v` win over `RUST_LOG`; an unset or unparsable `RUST_LOG` means `info`.
fn log_filter(verbose: bool, quiet: bool, rust_log: Option<&str>) -> EnvFilter {
    if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        rust_log
            .filter(|directives| !directives.trim().is_empty())
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new("info"))
    }
}
