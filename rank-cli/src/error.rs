use std::path::PathBuf;

use bili_ranking::CrawlerError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Crawler(#[from] CrawlerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}
