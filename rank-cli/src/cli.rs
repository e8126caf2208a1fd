use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bili-rank",
    version,
    about = "Snapshot Bilibili ranking and popular videos with live viewer counts",
    long_about = "Fetches the site-wide ranking and the first popular pages, merges them by bvid, \
                  looks up live viewers, plays and danmaku for each video and writes a JSON snapshot. \
                  Without arguments it runs with the built-in defaults and writes data.json."
)]
pub struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Snapshot destination, overrides the configured output path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Delay after each video in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Number of popular pages to fetch
    #[arg(long, value_name = "N")]
    pub pages: Option<u32>,

    /// Print the live viewer ranking after the run
    #[arg(long)]
    pub show_ranking: bool,

    /// Number of videos shown in the ranking
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Print the ranking of an existing snapshot instead of crawling
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["output", "delay_ms", "pages"]
    )]
    pub from_snapshot: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}
