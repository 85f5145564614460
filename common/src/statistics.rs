//! 缺陷数の集計（類別 × 等級）
//!
//! 1回の報告書生成ごとに生成し、`reset` で明示的に破棄する。
//! 合計行・合計列は記録時に同時に加算する。

use crate::category::DefectCategory;
use crate::severity::Severity;
use std::collections::BTreeMap;

/// 表示用の合計ラベル
pub const TOTAL_LABEL: &str = "合计";

/// 集計表の行キー
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatRow {
    Category(DefectCategory),
    Total,
}

/// 集計表の列キー
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatColumn {
    Severity(Severity),
    Total,
}

impl StatRow {
    /// 統計表の1列目の文字列から行キーを解決
    pub fn from_label(label: &str) -> Option<Self> {
        if label == TOTAL_LABEL {
            return Some(StatRow::Total);
        }
        DefectCategory::from_label(label).map(StatRow::Category)
    }
}

impl StatColumn {
    /// 統計表の見出し行の文字列から列キーを解決
    pub fn from_label(label: &str) -> Option<Self> {
        if label == TOTAL_LABEL {
            return Some(StatColumn::Total);
        }
        Severity::from_token(label).map(StatColumn::Severity)
    }
}

/// 類別 × 等級の集計器
#[derive(Debug, Clone, Default)]
pub struct StatisticsAggregator {
    counts: BTreeMap<(StatRow, StatColumn), usize>,
    unclassified: BTreeMap<Severity, usize>,
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1件記録する（4つのセルを同時に加算）
    pub fn record(&mut self, category: DefectCategory, severity: Severity) {
        let row = StatRow::Category(category);
        let column = StatColumn::Severity(severity);
        for key in [
            (row, column),
            (row, StatColumn::Total),
            (StatRow::Total, column),
            (StatRow::Total, StatColumn::Total),
        ] {
            *self.counts.entry(key).or_insert(0) += 1;
        }
    }

    /// 類別未解決の写真を記録する（集計表には含めない）
    pub fn record_unclassified(&mut self, severity: Severity) {
        *self.unclassified.entry(severity).or_insert(0) += 1;
    }

    pub fn get(&self, row: StatRow, column: StatColumn) -> usize {
        self.counts.get(&(row, column)).copied().unwrap_or(0)
    }

    /// 全体の合計
    pub fn total(&self) -> usize {
        self.get(StatRow::Total, StatColumn::Total)
    }

    pub fn severity_total(&self, severity: Severity) -> usize {
        self.get(StatRow::Total, StatColumn::Severity(severity))
    }

    pub fn category_total(&self, category: DefectCategory) -> usize {
        self.get(StatRow::Category(category), StatColumn::Total)
    }

    pub fn unclassified(&self, severity: Severity) -> usize {
        self.unclassified.get(&severity).copied().unwrap_or(0)
    }

    pub fn unclassified_total(&self) -> usize {
        self.unclassified.values().sum()
    }

    /// 等級ごとの写真数（類別未解決を含む）
    pub fn severity_count(&self, severity: Severity) -> usize {
        self.severity_total(severity) + self.unclassified(severity)
    }

    /// 写真の総数（類別未解決を含む）
    pub fn photo_count(&self) -> usize {
        self.total() + self.unclassified_total()
    }

    /// 件数のある類別（表の行順）
    pub fn categories(&self) -> Vec<DefectCategory> {
        DefectCategory::ALL
            .iter()
            .copied()
            .filter(|c| self.category_total(*c) > 0)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty() && self.unclassified.is_empty()
    }

    pub fn reset(&mut self) {
        self.counts.clear();
        self.unclassified.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_updates_all_totals() {
        let mut stats = StatisticsAggregator::new();
        stats.record(DefectCategory::Insulator, Severity::Critical);

        let row = StatRow::Category(DefectCategory::Insulator);
        let column = StatColumn::Severity(Severity::Critical);
        assert_eq!(stats.get(row, column), 1);
        assert_eq!(stats.get(row, StatColumn::Total), 1);
        assert_eq!(stats.get(StatRow::Total, column), 1);
        assert_eq!(stats.total(), 1);
    }

    #[test]
    fn test_totals_invariant() {
        let mut stats = StatisticsAggregator::new();
        let calls = [
            (Some(DefectCategory::Insulator), Severity::Critical),
            (Some(DefectCategory::Foundation), Severity::General),
            (None, Severity::Severe),
            (Some(DefectCategory::Foundation), Severity::General),
            (Some(DefectCategory::Corridor), Severity::Severe),
            (None, Severity::General),
        ];
        for (category, severity) in calls {
            match category {
                Some(c) => stats.record(c, severity),
                None => stats.record_unclassified(severity),
            }
        }

        let categorized = calls.iter().filter(|(c, _)| c.is_some()).count();
        assert_eq!(stats.total(), categorized);

        let by_severity: usize = Severity::ALL.iter().map(|s| stats.severity_total(*s)).sum();
        assert_eq!(by_severity, stats.total());

        let by_category: usize = DefectCategory::ALL.iter().map(|c| stats.category_total(*c)).sum();
        assert_eq!(by_category, stats.total());

        assert_eq!(stats.category_total(DefectCategory::Foundation), 2);
        assert_eq!(stats.unclassified_total(), 2);
        assert_eq!(stats.unclassified(Severity::Severe), 1);
        assert_eq!(stats.severity_count(Severity::Severe), 2);
        assert_eq!(stats.photo_count(), calls.len());
        assert_eq!(
            stats.categories(),
            vec![DefectCategory::Insulator, DefectCategory::Foundation, DefectCategory::Corridor]
        );
    }

    #[test]
    fn test_reset() {
        let mut stats = StatisticsAggregator::new();
        stats.record(DefectCategory::Hardware, Severity::Severe);
        stats.record_unclassified(Severity::General);
        assert!(!stats.is_empty());

        stats.reset();
        assert!(stats.is_empty());
        assert_eq!(stats.total(), 0);
        assert_eq!(stats.unclassified_total(), 0);
    }

    #[test]
    fn test_labels_resolve_to_keys() {
        assert_eq!(StatRow::from_label("合计"), Some(StatRow::Total));
        assert_eq!(StatRow::from_label("金具"), Some(StatRow::Category(DefectCategory::Hardware)));
        assert_eq!(StatRow::from_label("缺陷类别"), None);
        assert_eq!(StatColumn::from_label("严重"), Some(StatColumn::Severity(Severity::Severe)));
        assert_eq!(StatColumn::from_label("合计"), Some(StatColumn::Total));
        assert_eq!(StatColumn::from_label("缺陷等级"), None);
    }
}
