use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::count;
use crate::error::{CountError, CrawlerError};

/// Common envelope of every `api.bilibili.com` JSON response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Returns the payload, turning a non-zero `code` into [`CrawlerError::Api`].
    pub fn into_data(self) -> Result<T, CrawlerError> {
        if self.code != 0 {
            return Err(CrawlerError::Api {
                code: self.code,
                message: self.message,
            });
        }
        self.data.ok_or(CrawlerError::MissingData("data"))
    }
}

/// `data` of the ranking and popular endpoints.
#[derive(Debug, Deserialize)]
pub struct VideoList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub list: Vec<VideoSummary>,
}

/// `data` of the online total endpoint.
#[derive(Debug, Deserialize)]
pub struct OnlineTotal {
    // "1000+", "1.2万+", sometimes a bare number
    #[serde(default, deserialize_with = "lenient_string")]
    pub total: String,
}

/// `data` of the video view endpoint, only the statistics are kept.
#[derive(Debug, Deserialize)]
pub struct VideoView {
    pub stat: VideoStat,
}

/// Statistics as sent upstream. The counts stay untyped until they are
/// rendered, a value that is not a JSON number fails the lookup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VideoStat {
    // 播放数
    #[serde(default)]
    pub view: Value,
    // 弹幕数
    #[serde(default)]
    pub danmaku: Value,
}

/// A video as listed by the ranking or popular endpoint.
///
/// A missing or `null` field deserializes to its default; an empty `bvid`
/// marks a record that has no identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    #[serde(default, deserialize_with = "lenient_string")]
    pub bvid: String,
    // needed by the online total endpoint
    #[serde(default, deserialize_with = "null_as_default")]
    pub cid: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner: Owner,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pic: String,
}

impl VideoSummary {
    pub fn has_id(&self) -> bool {
        !self.bvid.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default, deserialize_with = "null_as_default")]
    pub mid: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

/// Current viewer count, as displayed upstream and as a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveCount {
    pub display: String,
    pub raw: u64,
}

impl LiveCount {
    pub fn zero() -> Self {
        Self {
            display: "0".to_string(),
            raw: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountPair {
    pub raw: u64,
    pub display: String,
}

impl CountPair {
    pub fn from_raw(raw: u64) -> Self {
        Self {
            raw,
            display: count::encode(raw),
        }
    }

    pub fn zero() -> Self {
        Self::from_raw(0)
    }
}

impl TryFrom<&Value> for CountPair {
    type Error = CountError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let display = count::encode_value(value)?;
        // encode_value only accepts finite non-negative numbers
        let raw = match value.as_u64() {
            Some(raw) => raw,
            None => value.as_f64().map_or(0, |v| v.trunc() as u64),
        };
        Ok(Self { raw, display })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStats {
    pub play: CountPair,
    pub danmaku: CountPair,
}

impl VideoStats {
    pub fn zero() -> Self {
        Self {
            play: CountPair::zero(),
            danmaku: CountPair::zero(),
        }
    }
}

impl TryFrom<&VideoStat> for VideoStats {
    type Error = CountError;

    fn try_from(stat: &VideoStat) -> Result<Self, Self::Error> {
        Ok(Self {
            play: CountPair::try_from(&stat.view)?,
            danmaku: CountPair::try_from(&stat.danmaku)?,
        })
    }
}

/// A listed video together with its live count and statistics.
///
/// Field names are the snapshot's JSON keys. `bvid` is not serialized, it is
/// the key the entry is stored under.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedVideo {
    #[serde(skip)]
    pub bvid: String,
    pub title: String,
    pub owner: String,
    pub mid: String,
    pub pic: String,
    pub online_count: String,
    pub count_num: u64,
    pub play_count_num: u64,
    pub danmaku_count_num: u64,
    pub play_count: String,
    pub danmaku_count: String,
}

impl EnrichedVideo {
    pub fn new(summary: &VideoSummary, live: LiveCount, stats: VideoStats) -> Self {
        Self {
            bvid: summary.bvid.clone(),
            title: summary.title.clone(),
            owner: summary.owner.name.clone(),
            mid: summary.owner.mid.to_string(),
            pic: summary.pic.clone(),
            online_count: live.display,
            count_num: live.raw,
            play_count_num: stats.play.raw,
            danmaku_count_num: stats.danmaku.raw,
            play_count: stats.play.display,
            danmaku_count: stats.danmaku.display,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts strings, numbers and booleans as a string; `null` becomes empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Visitor;

    struct LenientStringVisitor;

    impl<'de> Visitor<'de> for LenientStringVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string, number or null")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(v)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(LenientStringVisitor)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_ranking_list() {
        let body = r#"{
            "code": 0,
            "message": "0",
            "data": {
                "note": "根据稿件内容质量等综合评分",
                "list": [
                    {
                        "aid": 113,
                        "bvid": "BV1xx411c7mD",
                        "cid": 3262388,
                        "title": "测试视频",
                        "pic": "http://i0.hdslb.com/bfs/archive/a.jpg",
                        "owner": { "mid": 2, "name": "碧诗", "face": "http://x" },
                        "stat": { "view": 1 }
                    },
                    { "cid": 1, "title": "no id" },
                    { "bvid": null, "owner": null }
                ]
            }
        }"#;

        let resp: ApiResponse<VideoList> = serde_json::from_str(body).unwrap();
        let list = resp.into_data().unwrap().list;
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].bvid, "BV1xx411c7mD");
        assert_eq!(list[0].cid, 3262388);
        assert_eq!(list[0].owner.name, "碧诗");
        assert_eq!(list[0].owner.mid, 2);
        assert!(!list[1].has_id());
        assert!(!list[2].has_id());
        assert_eq!(list[2].owner, Owner::default());
    }

    #[test]
    fn test_non_zero_code_is_an_api_error() {
        let body = r#"{"code": -352, "message": "风控校验失败", "data": null}"#;
        let resp: ApiResponse<VideoList> = serde_json::from_str(body).unwrap();
        match resp.into_data() {
            Err(CrawlerError::Api { code, message }) => {
                assert_eq!(code, -352);
                assert_eq!(message, "风控校验失败");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_data() {
        let resp: ApiResponse<OnlineTotal> = serde_json::from_str(r#"{"code": 0}"#).unwrap();
        assert!(matches!(
            resp.into_data(),
            Err(CrawlerError::MissingData("data"))
        ));
    }

    #[test]
    fn test_online_total_accepts_numbers() {
        let resp: ApiResponse<OnlineTotal> =
            serde_json::from_str(r#"{"code":0,"data":{"total":"1.2万+","count":"9"}}"#).unwrap();
        assert_eq!(resp.into_data().unwrap().total, "1.2万+");

        let resp: ApiResponse<OnlineTotal> =
            serde_json::from_str(r#"{"code":0,"data":{"total":42}}"#).unwrap();
        assert_eq!(resp.into_data().unwrap().total, "42");
    }

    #[test]
    fn test_parse_video_stat() {
        let body = r#"{"code":0,"data":{"bvid":"BV1","stat":{"view":1234567,"danmaku":89,"like":3}}}"#;
        let resp: ApiResponse<VideoView> = serde_json::from_str(body).unwrap();
        let stats = VideoStats::try_from(&resp.into_data().unwrap().stat).unwrap();

        assert_eq!(stats.play.raw, 1_234_567);
        assert_eq!(stats.play.display, "123.5万+");
        assert_eq!(stats.danmaku, CountPair::from_raw(89));
    }

    #[test]
    fn test_non_numeric_stat_is_rejected() {
        let stat: VideoStat =
            serde_json::from_str(r#"{"view":"1.2万","danmaku":3}"#).unwrap();
        assert_eq!(
            VideoStats::try_from(&stat),
            Err(CountError::NotNumeric("\"1.2万\"".to_string()))
        );

        let missing: VideoStat = serde_json::from_str(r#"{"view":10}"#).unwrap();
        assert!(matches!(
            VideoStats::try_from(&missing),
            Err(CountError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_float_count_is_truncated() {
        let pair = CountPair::try_from(&json!(12_345.6)).unwrap();
        assert_eq!(pair.raw, 12_345);
        assert_eq!(pair.display, "1.2万+");
    }

    #[test]
    fn test_enriched_video_from_parts() {
        let summary = VideoSummary {
            bvid: "BV1".to_string(),
            cid: 7,
            title: "标题".to_string(),
            owner: Owner {
                mid: 12345,
                name: "UP".to_string(),
            },
            pic: "pic.jpg".to_string(),
        };
        let live = LiveCount {
            display: "1.2万+".to_string(),
            raw: 12_000,
        };
        let stats = VideoStats::try_from(&VideoStat {
            view: json!(1_500_000),
            danmaku: json!(321),
        })
        .unwrap();

        let video = EnrichedVideo::new(&summary, live, stats);
        assert_eq!(video.bvid, "BV1");
        assert_eq!(video.mid, "12345");
        assert_eq!(video.count_num, 12_000);
        assert_eq!(video.play_count, "150万+");
        assert_eq!(video.danmaku_count, "321");

        let json = serde_json::to_value(&video).unwrap();
        assert!(json.get("bvid").is_none());
        assert_eq!(json["online_count"], "1.2万+");
    }
}
