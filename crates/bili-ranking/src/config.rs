use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::CrawlerError;

pub(crate) const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Endpoints, headers and pacing of a crawl.
///
/// The defaults are the values the crawler has always used; a TOML file only
/// needs to name the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    pub ranking_url: String,
    pub popular_url: String,
    pub online_url: String,
    pub view_url: String,

    pub user_agent: String,
    pub referer: String,
    pub origin: String,
    /// Full `Cookie` header. A fake `buvid3` is generated when unset.
    pub cookie: Option<String>,

    /// Number of popular pages fetched after the ranking list.
    pub popular_pages: u32,
    pub page_size: u32,
    /// Fixed delay after each enriched video.
    pub pacing_delay_ms: u64,
    /// Timeout of a popular page request.
    pub list_timeout_secs: u64,
    /// Timeout applied by the HTTP client to every other request.
    pub request_timeout_secs: u64,

    pub output_path: PathBuf,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            ranking_url: "https://api.bilibili.com/x/web-interface/ranking/v2?rid=0&type=all"
                .to_string(),
            popular_url: "https://api.bilibili.com/x/web-interface/popular".to_string(),
            online_url: "https://api.bilibili.com/x/player/online/total".to_string(),
            view_url: "https://api.bilibili.com/x/web-interface/view".to_string(),
            user_agent: DEFAULT_UA.to_string(),
            referer: "https://www.bilibili.com/v/popular/rank/all".to_string(),
            origin: "https://www.bilibili.com".to_string(),
            cookie: None,
            popular_pages: 4,
            page_size: 50,
            pacing_delay_ms: 1000,
            list_timeout_secs: 10,
            request_timeout_secs: 30,
            output_path: PathBuf::from("data.json"),
        }
    }
}

impl CrawlerConfig {
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), CrawlerError> {
        let urls = [
            ("ranking_url", &self.ranking_url),
            ("popular_url", &self.popular_url),
            ("online_url", &self.online_url),
            ("view_url", &self.view_url),
        ];
        for (name, url) in urls {
            if url.trim().is_empty() {
                return Err(CrawlerError::config(format!("{name} must not be empty")));
            }
        }
        if self.page_size == 0 {
            return Err(CrawlerError::config("page_size must be greater than 0"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(CrawlerError::config("output_path must not be empty"));
        }
        Ok(())
    }
}
