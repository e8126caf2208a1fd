//! Bilibili ranking crawler.
//!
//! Lists the site-wide ranking and the first pages of the popular list,
//! deduplicates them by `bvid`, looks up live viewer and play/danmaku counts
//! for every video and writes the result as one JSON snapshot.

pub mod api;
pub mod collection;
pub mod config;
pub mod count;
pub mod crawler;
pub mod enrich;
pub mod error;
pub mod merge;
pub mod models;
pub mod snapshot;
pub mod utils;

pub use api::{BilibiliClient, VideoSource, default_client};
pub use collection::ResultCollection;
pub use config::CrawlerConfig;
pub use crawler::Crawler;
pub use enrich::Enricher;
pub use error::{CountError, CrawlerError};
pub use models::{EnrichedVideo, VideoStat, VideoSummary};
pub use snapshot::{read_snapshot, write_snapshot};
