use std::time::Duration;

use tracing::debug;

use crate::{
    api::VideoSource,
    count,
    error::CrawlerError,
    models::{EnrichedVideo, LiveCount, VideoStats, VideoSummary},
};

/// Attaches live viewer counts and statistics to listed videos.
///
/// Each lookup is attempted once. A failed lookup, or a live count that does
/// not decode, yields zero counts instead of an error so one bad video never
/// stops the batch.
pub struct Enricher<'a, S: ?Sized> {
    source: &'a S,
    pacing: Duration,
}

impl<'a, S: VideoSource + ?Sized> Enricher<'a, S> {
    pub fn new(source: &'a S, pacing: Duration) -> Self {
        Self { source, pacing }
    }

    /// Looks up both counts for `summary`, then waits for the pacing delay.
    pub async fn enrich(&self, summary: &VideoSummary) -> EnrichedVideo {
        let live = self.live_count(summary).await;
        let stats = self.stats(&summary.bvid).await;
        let video = EnrichedVideo::new(summary, live, stats);

        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }
        video
    }

    pub async fn live_count(&self, summary: &VideoSummary) -> LiveCount {
        let display = match self.source.online_total(&summary.bvid, summary.cid).await {
            Ok(display) => display,
            Err(e) => {
                debug!(bvid = %summary.bvid, error = %e, "live count lookup failed");
                return LiveCount::zero();
            }
        };

        match count::decode(&display) {
            Ok(raw) => LiveCount { display, raw },
            Err(e) => {
                debug!(bvid = %summary.bvid, error = %e, "live count not decodable");
                LiveCount::zero()
            }
        }
    }

    pub async fn stats(&self, bvid: &str) -> VideoStats {
        match self.lookup_stats(bvid).await {
            Ok(stats) => stats,
            Err(e) => {
                debug!(bvid, error = %e, "statistics lookup failed");
                VideoStats::zero()
            }
        }
    }

    async fn lookup_stats(&self, bvid: &str) -> Result<VideoStats, CrawlerError> {
        let stat = self.source.video_stat(bvid).await?;
        Ok(VideoStats::try_from(&stat)?)
    }
}
