use rustc_hash::FxHashSet;

use crate::models::VideoSummary;

/// Merges the ranking list with the popular list.
///
/// The result is deduplicated by `bvid` in first-seen order over `primary`
/// followed by `secondary`, so on a collision the primary record wins.
/// Records without an identifier are dropped.
pub fn merge<I, J>(primary: I, secondary: J) -> Vec<VideoSummary>
where
    I: IntoIterator<Item = VideoSummary>,
    J: IntoIterator<Item = VideoSummary>,
{
    let mut seen = FxHashSet::default();
    primary
        .into_iter()
        .chain(secondary)
        .filter(|video| video.has_id() && seen.insert(video.bvid.clone()))
        .collect()
}
