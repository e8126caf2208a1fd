//! Access to the four public endpoints the crawler reads.
//!
//! [`VideoSource`] is the seam between the pipeline and the network;
//! [`BilibiliClient`] is the implementation that talks to `api.bilibili.com`.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};
use rustls::{ClientConfig, crypto::aws_lc_rs};
use rustls_platform_verifier::BuilderVerifierExt;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    config::CrawlerConfig,
    error::CrawlerError,
    models::{ApiResponse, OnlineTotal, VideoList, VideoStat, VideoSummary, VideoView},
    utils::generate_fake_buvid3,
};

#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Videos of the site-wide ranking list.
    async fn ranking(&self) -> Result<Vec<VideoSummary>, CrawlerError>;

    /// One page (1-based) of the popular list.
    async fn popular_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<VideoSummary>, CrawlerError>;

    /// Current viewers as displayed by the player, e.g. `"1.2万+"`.
    async fn online_total(&self, bvid: &str, cid: u64) -> Result<String, CrawlerError>;

    /// Play and danmaku counts.
    async fn video_stat(&self, bvid: &str) -> Result<VideoStat, CrawlerError>;
}

pub fn default_client(timeout: Duration) -> Result<Client, CrawlerError> {
    let provider = Arc::new(aws_lc_rs::default_provider());
    let tls_config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| CrawlerError::Tls(e.to_string()))?
        .with_platform_verifier()
        .map_err(|e| CrawlerError::Tls(e.to_string()))?
        .with_no_client_auth();

    let client = Client::builder()
        .use_preconfigured_tls(tls_config)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

#[derive(Debug, Clone)]
pub struct BilibiliClient {
    client: Client,
    headers: HeaderMap,
    ranking_url: String,
    popular_url: String,
    online_url: String,
    view_url: String,
    list_timeout: Duration,
}

impl BilibiliClient {
    pub fn new(config: &CrawlerConfig) -> Result<Self, CrawlerError> {
        let client = default_client(config.request_timeout())?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: &CrawlerConfig) -> Result<Self, CrawlerError> {
        Ok(Self {
            client,
            headers: Self::build_headers(config)?,
            ranking_url: config.ranking_url.clone(),
            popular_url: config.popular_url.clone(),
            online_url: config.online_url.clone(),
            view_url: config.view_url.clone(),
            list_timeout: config.list_timeout(),
        })
    }

    fn build_headers(config: &CrawlerConfig) -> Result<HeaderMap, CrawlerError> {
        let cookie = match &config.cookie {
            Some(cookie) => cookie.clone(),
            None => format!("buvid3={}", generate_fake_buvid3()),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9"),
        );

        let configured = [
            (header::USER_AGENT, config.user_agent.as_str()),
            (header::REFERER, config.referer.as_str()),
            (header::ORIGIN, config.origin.as_str()),
            (header::COOKIE, cookie.as_str()),
        ];
        for (name, value) in configured {
            insert_header(&mut headers, name, value)?;
        }
        Ok(headers)
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url).headers(self.headers.clone())
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CrawlerError> {
        let response = request.send().await?.error_for_status()?;
        let body = response.json::<ApiResponse<T>>().await?;
        body.into_data()
    }
}

fn insert_header(
    headers: &mut HeaderMap,
    name: HeaderName,
    value: &str,
) -> Result<(), CrawlerError> {
    let value = HeaderValue::from_str(value)
        .map_err(|e| CrawlerError::config(format!("invalid {name} header: {e}")))?;
    headers.insert(name, value);
    Ok(())
}

#[async_trait]
impl VideoSource for BilibiliClient {
    async fn ranking(&self) -> Result<Vec<VideoSummary>, CrawlerError> {
        let data: VideoList = self.fetch(self.get(&self.ranking_url)).await?;
        debug!(count = data.list.len(), "fetched ranking list");
        Ok(data.list)
    }

    async fn popular_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<VideoSummary>, CrawlerError> {
        let request = self
            .get(&self.popular_url)
            .query(&[("pn", page), ("ps", page_size)])
            .timeout(self.list_timeout);
        let data: VideoList = self.fetch(request).await?;
        debug!(page, count = data.list.len(), "fetched popular page");
        Ok(data.list)
    }

    async fn online_total(&self, bvid: &str, cid: u64) -> Result<String, CrawlerError> {
        let request = self
            .get(&self.online_url)
            .query(&[("bvid", bvid.to_string()), ("cid", cid.to_string())]);
        let data: OnlineTotal = self.fetch(request).await?;
        Ok(data.total)
    }

    async fn video_stat(&self, bvid: &str) -> Result<VideoStat, CrawlerError> {
        let request = self.get(&self.view_url).query(&[("bvid", bvid)]);
        let data: VideoView = self.fetch(request).await?;
        Ok(data.stat)
    }
}
