//! 総覧段落の書き換え
//!
//! `{total_bug}` のような名前付きプレースホルダを集計値で置き換える。
//! 未知のプレースホルダはそのまま残す。

use crate::document::Paragraph;
use inspection_common::{DefectCategory, Severity, StatisticsAggregator};
use regex::{Captures, Regex};
use std::collections::HashMap;

/// 総数のプレースホルダ名
pub const TOTAL_PLACEHOLDER: &str = "total_bug";

lazy_static::lazy_static! {
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\{(\w+)\}").unwrap();
}

/// プレースホルダ名 → 値
pub fn placeholder_values(stats: &StatisticsAggregator) -> HashMap<&'static str, usize> {
    let mut values = HashMap::new();
    values.insert(TOTAL_PLACEHOLDER, stats.photo_count());
    for severity in Severity::ALL {
        values.insert(severity.placeholder(), stats.severity_count(severity));
    }
    for category in DefectCategory::ALL {
        values.insert(category.placeholder(), stats.category_total(category));
    }
    values
}

/// 文面のプレースホルダを置き換える
pub fn render(template: &str, values: &HashMap<&'static str, usize>) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| match values.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => {
                tracing::warn!(placeholder = &caps[1], "未知のプレースホルダ");
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// 段落を書き換える（最初のランのフォントサイズを維持）
pub fn rewrite_paragraph(paragraph: &mut Paragraph, stats: &StatisticsAggregator) {
    let text = render(&paragraph.text(), &placeholder_values(stats));
    paragraph.set_text(text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::template::NARRATIVE_TEXT;

    fn sample_stats() -> StatisticsAggregator {
        let mut stats = StatisticsAggregator::new();
        stats.record(DefectCategory::Insulator, Severity::Critical);
        stats.record(DefectCategory::Foundation, Severity::Severe);
        stats.record(DefectCategory::Foundation, Severity::General);
        stats
    }

    #[test]
    fn test_render_all_placeholders() {
        let text = render(NARRATIVE_TEXT, &placeholder_values(&sample_stats()));

        assert!(!PLACEHOLDER_RE.is_match(&text), "未置換が残っている: {}", text);
        assert!(text.contains("共发现缺陷3处"));
        assert!(text.contains("危急缺陷1处"));
        assert!(text.contains("基础缺陷2处"));
        assert!(text.contains("通道缺陷0处"));
    }

    #[test]
    fn test_unknown_placeholder_kept() {
        let values = placeholder_values(&StatisticsAggregator::new());
        assert_eq!(render("{total_bug}件 {unknown}", &values), "0件 {unknown}");
    }

    #[test]
    fn test_unclassified_counted_in_severity() {
        let mut stats = sample_stats();
        stats.record_unclassified(Severity::Critical);
        let values = placeholder_values(&stats);

        assert_eq!(values[TOTAL_PLACEHOLDER], 4);
        assert_eq!(values["weiji_bug"], 2);
        let categories: usize = DefectCategory::ALL
            .iter()
            .map(|c| values[c.placeholder()])
            .sum();
        assert_eq!(categories, 3);
    }

    #[test]
    fn test_rewrite_keeps_font_size() {
        let mut paragraph = Paragraph::new("本次现场巡检共发现缺陷{total_bug}处");
        paragraph.runs[0].format.size_pt = Some(12.0);

        rewrite_paragraph(&mut paragraph, &sample_stats());
        assert_eq!(paragraph.text(), "本次现场巡检共发现缺陷3处");
        assert_eq!(paragraph.runs[0].format.size_pt, Some(12.0));
    }
}
