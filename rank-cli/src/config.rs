use std::path::Path;

use bili_ranking::CrawlerConfig;
use serde::Deserialize;

use crate::{
    cli::Args,
    error::{CliError, Result},
};

/// Contents of the optional TOML configuration file.
///
/// ```toml
/// [crawler]
/// popular_pages = 2
/// output_path = "out/data.json"
///
/// [display]
/// show_ranking = true
/// top = 10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub crawler: CrawlerConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_ranking: bool,
    pub top: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_ranking: false,
            top: 20,
        }
    }
}

impl AppConfig {
    /// Loads `path`, or the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Self::parse(&content).map_err(|source| CliError::ConfigFile {
                    path: path.to_path_buf(),
                    source,
                })
            }
            None => Ok(Self::default()),
        }
    }

    fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Applies command line flags on top of the file values.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(output) = &args.output {
            self.crawler.output_path = output.clone();
        }
        if let Some(delay_ms) = args.delay_ms {
            self.crawler.pacing_delay_ms = delay_ms;
        }
        if let Some(pages) = args.pages {
            self.crawler.popular_pages = pages;
        }
        if args.show_ranking {
            self.display.show_ranking = true;
        }
        if let Some(top) = args.top {
            self.display.top = top;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;

    #[test]
    fn test_parse_partial_file() {
        let config = AppConfig::parse(
            r#"
            [crawler]
            popular_pages = 2
            pacing_delay_ms = 250
            cookie = "buvid3=ABC; b_nut=1"

            [display]
            show_ranking = true
            "#,
        )
        .unwrap();

        assert_eq!(config.crawler.popular_pages, 2);
        assert_eq!(config.crawler.pacing_delay_ms, 250);
        assert_eq!(config.crawler.cookie.as_deref(), Some("buvid3=ABC; b_nut=1"));
        assert_eq!(config.crawler.page_size, 50);
        assert!(config.display.show_ranking);
        assert_eq!(config.display.top, 20);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(AppConfig::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_reports_path_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[crawler]\npage_size = \"many\"\n").unwrap();

        match AppConfig::load(Some(path.as_path())) {
            Err(CliError::ConfigFile { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_args_override_file() {
        let args = Args::try_parse_from([
            "bili-rank",
            "--output",
            "snap/rank.json",
            "--delay-ms",
            "0",
            "--pages",
            "1",
            "--show-ranking",
            "--top",
            "5",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        config.apply_args(&args);
        assert_eq!(config.crawler.output_path, PathBuf::from("snap/rank.json"));
        assert_eq!(config.crawler.pacing_delay_ms, 0);
        assert_eq!(config.crawler.popular_pages, 1);
        assert!(config.display.show_ranking);
        assert_eq!(config.display.top, 5);
    }

    #[test]
    fn test_no_args_keeps_defaults() {
        let args = Args::try_parse_from(["bili-rank"]).unwrap();
        let mut config = AppConfig::default();
        config.apply_args(&args);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_snapshot_mode_conflicts_with_crawl_flags() {
        assert!(
            Args::try_parse_from(["bili-rank", "--from-snapshot", "a.json", "--pages", "2"])
                .is_err()
        );
    }
}
