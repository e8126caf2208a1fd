//! Persistence of a run's results as one JSON document.

use std::path::Path;

use tracing::debug;

use crate::{collection::ResultCollection, error::CrawlerError};

/// Serializes `collection` as pretty-printed JSON.
///
/// Non-ASCII text (titles, owner names, count units) is written as is.
pub fn to_json(collection: &ResultCollection) -> Result<String, CrawlerError> {
    Ok(serde_json::to_string_pretty(collection)?)
}

/// Writes `collection` to `path`, replacing any previous snapshot.
///
/// Missing parent directories are created.
pub async fn write_snapshot(
    collection: &ResultCollection,
    path: impl AsRef<Path>,
) -> Result<(), CrawlerError> {
    let path = path.as_ref();
    let json = to_json(collection)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, json).await?;
    debug!(path = %path.display(), entries = collection.len(), "snapshot written");
    Ok(())
}

/// Reads a snapshot written by [`write_snapshot`], keeping the file's entry order.
pub async fn read_snapshot(path: impl AsRef<Path>) -> Result<ResultCollection, CrawlerError> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnrichedVideo;

    fn video(bvid: &str, title: &str) -> EnrichedVideo {
        EnrichedVideo {
            bvid: bvid.to_string(),
            title: title.to_string(),
            owner: "某UP主".to_string(),
            mid: "123".to_string(),
            pic: "http://i0.hdslb.com/a.jpg".to_string(),
            online_count: "1.2万+".to_string(),
            count_num: 12_000,
            play_count_num: 150_000_000,
            danmaku_count_num: 42,
            play_count: "1.5亿+".to_string(),
            danmaku_count: "42".to_string(),
        }
    }

    #[test]
    fn test_json_layout() {
        let collection: ResultCollection = [video("BV1", "第一个")].into_iter().collect();
        let json = to_json(&collection).unwrap();

        assert!(json.contains("\"第一个\""));
        assert!(json.contains("\"1.5亿+\""));
        assert!(!json.contains("\\u"));
        assert!(json.contains("\n  \"BV1\": {\n    \"title\""));
        assert!(json.contains("\"mid\": \"123\""));
    }

    #[tokio::test]
    async fn test_write_overwrites_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");

        let first: ResultCollection = [video("BV1", "a"), video("BV2", "b"), video("BV3", "c")]
            .into_iter()
            .collect();
        write_snapshot(&first, &path).await.unwrap();

        let second: ResultCollection = [video("BV9", "新的")].into_iter().collect();
        write_snapshot(&second, &path).await.unwrap();

        let back = read_snapshot(&path).await.unwrap();
        assert_eq!(back, second);
        assert_eq!(back.keys().collect::<Vec<_>>(), ["BV9"]);
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_snapshot(dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(CrawlerError::Io(_))));
    }
}
