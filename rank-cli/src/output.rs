use bili_ranking::{ResultCollection, utils::truncate_chars};
use chrono::Local;
#[cfg(feature = "colored-output")]
use colored::*;
#[cfg(feature = "table-output")]
use tabled::{Table, Tabled, settings::Style};

const TITLE_WIDTH: usize = 30;

pub struct OutputManager {
    colored: bool,
}

impl OutputManager {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// Live viewer ranking of `results`, highest first, at most `top` rows.
    pub fn format_ranking(&self, results: &ResultCollection, top: usize) -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str(&self.colorize("=== B站视频实时在线人数排行榜 ===", true));
        output.push('\n');
        output.push_str(&format!(
            "更新时间: {}\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        let ranked = results.ranked_by_live();
        let rows = ranked.into_iter().take(top);
        output.push_str(&Self::format_rows(rows));
        output.push_str("\n\n");
        output.push_str(&"=".repeat(50));
        output.push('\n');
        output
    }

    #[cfg(feature = "table-output")]
    fn format_rows<'a>(rows: impl Iterator<Item = &'a bili_ranking::EnrichedVideo>) -> String {
        #[derive(Tabled)]
        struct RankRow<'a> {
            #[tabled(rename = "#")]
            rank: usize,
            #[tabled(rename = "在线")]
            online: &'a str,
            #[tabled(rename = "标题")]
            title: &'a str,
            #[tabled(rename = "UP主")]
            owner: &'a str,
        }

        let rows: Vec<_> = rows
            .enumerate()
            .map(|(i, video)| RankRow {
                rank: i + 1,
                online: &video.online_count,
                title: truncate_chars(&video.title, TITLE_WIDTH),
                owner: &video.owner,
            })
            .collect();

        Table::new(rows).with(Style::modern()).to_string()
    }

    #[cfg(not(feature = "table-output"))]
    fn format_rows<'a>(rows: impl Iterator<Item = &'a bili_ranking::EnrichedVideo>) -> String {
        rows.enumerate()
            .map(|(i, video)| {
                format!(
                    "{:2}. {:>8} | {:30} | UP主: {}",
                    i + 1,
                    video.online_count,
                    truncate_chars(&video.title, TITLE_WIDTH),
                    video.owner
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn colorize(&self, text: &str, bold: bool) -> String {
        #[cfg(feature = "colored-output")]
        {
            if self.colored {
                let colored_text = text.green();
                if bold {
                    colored_text.bold().to_string()
                } else {
                    colored_text.to_string()
                }
            } else {
                text.to_string()
            }
        }

        #[cfg(not(feature = "colored-output"))]
        {
            let _ = (self.colored, bold);
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use bili_ranking::EnrichedVideo;

    use super::*;

    fn video(bvid: &str, title: &str, online: &str, live: u64) -> EnrichedVideo {
        EnrichedVideo {
            bvid: bvid.to_string(),
            title: title.to_string(),
            owner: format!("owner-{bvid}"),
            online_count: online.to_string(),
            count_num: live,
            ..Default::default()
        }
    }

    #[test]
    fn test_ranking_order_and_limit() {
        let results: ResultCollection = [
            video("BV1", "quiet video", "12", 12),
            video("BV2", "busiest video", "1.2万+", 12_000),
            video("BV3", "middle video", "5000+", 5_000),
        ]
        .into_iter()
        .collect();

        let text = OutputManager::new(false).format_ranking(&results, 2);
        assert!(text.contains("B站视频实时在线人数排行榜"));
        assert!(text.contains("更新时间: "));

        let busiest = text.find("busiest video").unwrap();
        let middle = text.find("middle video").unwrap();
        assert!(busiest < middle);
        assert!(!text.contains("quiet video"));
        assert!(text.contains("owner-BV2"));
    }

    #[test]
    fn test_long_titles_are_cut() {
        let title = "一".repeat(40);
        let results: ResultCollection = [video("BV1", &title, "1", 1)].into_iter().collect();

        let text = OutputManager::new(false).format_ranking(&results, 20);
        assert!(text.contains(&"一".repeat(30)));
        assert!(!text.contains(&"一".repeat(31)));
    }
}
