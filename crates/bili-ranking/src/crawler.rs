use tracing::{debug, info, warn};

use crate::{
    api::VideoSource,
    collection::ResultCollection,
    config::CrawlerConfig,
    enrich::Enricher,
    error::CrawlerError,
    merge::merge,
    models::VideoSummary,
    snapshot::write_snapshot,
};

/// Runs one crawl: list, merge, enrich each video, write the snapshot.
///
/// Everything happens sequentially on the caller's task. A failed list call
/// is logged and skipped; only writing the snapshot can fail the run.
pub struct Crawler<S> {
    source: S,
    config: CrawlerConfig,
}

impl<S: VideoSource> Crawler<S> {
    pub fn new(source: S, config: CrawlerConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The ranking list merged with the configured popular pages.
    pub async fn fetch_videos(&self) -> Vec<VideoSummary> {
        let ranking = match self.source.ranking().await {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "failed to fetch ranking list");
                Vec::new()
            }
        };

        let mut popular = Vec::new();
        for page in 1..=self.config.popular_pages {
            match self.source.popular_page(page, self.config.page_size).await {
                Ok(list) => popular.extend(list),
                Err(e) => warn!(page, error = %e, "failed to fetch popular page"),
            }
        }

        let listed = ranking.len() + popular.len();
        let videos = merge(ranking, popular);
        info!(listed, unique = videos.len(), "fetched video lists");
        videos
    }

    /// Enriches `videos` in order, waiting the pacing delay after each one.
    pub async fn enrich_all(&self, videos: &[VideoSummary]) -> ResultCollection {
        let enricher = Enricher::new(&self.source, self.config.pacing_delay());
        let mut results = ResultCollection::with_capacity(videos.len());
        for (i, summary) in videos.iter().enumerate() {
            let video = enricher.enrich(summary).await;
            debug!(
                progress = i + 1,
                total = videos.len(),
                bvid = %video.bvid,
                online = %video.online_count,
                "enriched video"
            );
            results.insert(video);
        }
        results
    }

    /// Lists and enriches without writing anything.
    pub async fn collect(&self) -> ResultCollection {
        let videos = self.fetch_videos().await;
        info!(count = videos.len(), "enriching videos");
        self.enrich_all(&videos).await
    }

    /// Full run; the snapshot goes to the configured output path.
    pub async fn run(&self) -> Result<ResultCollection, CrawlerError> {
        let results = self.collect().await;
        write_snapshot(&results, &self.config.output_path).await?;
        info!(
            path = %self.config.output_path.display(),
            entries = results.len(),
            "snapshot saved"
        );
        Ok(results)
    }
}
