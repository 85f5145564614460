//! テンプレート文書の構造探索
//!
//! 見出しセル・段落の文字でブロック位置を特定する。
//! 位置はブロックを挿入すると変わるので、挿入後は探索し直すこと。

use super::anchors::{
    self, CATEGORY_STATS_HEADER, DETAIL_HEADER, LEDGER_HEADER, NARRATIVE_ANCHOR,
    SEVERITY_STATS_HEADER,
};
use crate::document::{Block, Document, Table};
use crate::error::{ReportError, Result};
use inspection_common::Severity;

/// 1つの等級の領域
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierLayout {
    pub severity: Severity,
    /// 明細表見出し段落
    pub heading: usize,
    /// 缺陷汇总表
    pub ledger: usize,
    /// 明細表（文書順）
    pub details: Vec<usize>,
}

/// 文書全体の領域
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLayout {
    pub tiers: Vec<TierLayout>,
    pub severity_statistics: usize,
    pub category_statistics: usize,
    pub narrative: usize,
}

impl DocumentLayout {
    /// すべてのアンカーを探す。1つでも欠けていればエラー
    pub fn locate(doc: &Document) -> Result<Self> {
        let tiers = Severity::ALL
            .iter()
            .map(|s| locate_tier(doc, *s))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            tiers,
            severity_statistics: require_table(doc, SEVERITY_STATS_HEADER, is_severity_statistics)?,
            category_statistics: require_table(doc, CATEGORY_STATS_HEADER, is_category_statistics)?,
            narrative: doc
                .find_paragraph(NARRATIVE_ANCHOR)
                .ok_or_else(|| missing(NARRATIVE_ANCHOR))?,
        })
    }

    pub fn tier(&self, severity: Severity) -> &TierLayout {
        &self.tiers[severity.index()]
    }
}

/// 明細表かどうか（見出し行が挿入済みのものも含む）
pub fn is_detail_table(table: &Table) -> bool {
    if table.cell_text(0, 0) == DETAIL_HEADER {
        return true;
    }
    let labelled = table.rows.first().map(|r| r.cells.len() == 1).unwrap_or(false);
    labelled && table.cell_text(1, 0) == DETAIL_HEADER
}

pub fn is_ledger_table(table: &Table) -> bool {
    table.cell_text(0, 1) == LEDGER_HEADER
}

pub fn is_severity_statistics(table: &Table) -> bool {
    table.cell_text(0, 0) == SEVERITY_STATS_HEADER
}

pub fn is_category_statistics(table: &Table) -> bool {
    table.cell_text(0, 0) == CATEGORY_STATS_HEADER
}

/// 条件に合う n 番目（1始まり）の表の位置
pub fn nth_table(doc: &Document, n: usize, predicate: impl Fn(&Table) -> bool) -> Option<usize> {
    doc.tables()
        .filter(|(_, t)| predicate(*t))
        .nth(n.checked_sub(1)?)
        .map(|(i, _)| i)
}

/// 等級の領域を探す
pub fn locate_tier(doc: &Document, severity: Severity) -> Result<TierLayout> {
    let heading_text = anchors::detail_heading(severity);
    let heading = doc
        .find_paragraph(heading_text)
        .ok_or_else(|| missing(heading_text))?;

    let ledger = nth_table(doc, severity.index() + 1, is_ledger_table)
        .ok_or_else(|| missing(format!("{} #{}", LEDGER_HEADER, severity.index() + 1)))?;

    // 自分の見出しから次の等級の見出しまでに限る
    let end = next_heading(doc, heading).unwrap_or(doc.blocks.len());
    let first_detail = doc
        .tables()
        .find(|(i, t)| *i > heading && *i < end && is_detail_table(*t))
        .map(|(i, _)| i)
        .ok_or_else(|| missing(format!("{} ({})", DETAIL_HEADER, heading_text)))?;

    Ok(TierLayout {
        severity,
        heading,
        ledger,
        details: detail_group(doc, first_detail),
    })
}

/// heading より後ろで最初に現れる明細表見出し段落
fn next_heading(doc: &Document, heading: usize) -> Option<usize> {
    Severity::ALL
        .iter()
        .filter_map(|s| doc.find_paragraph(anchors::detail_heading(*s)))
        .filter(|position| *position > heading)
        .min()
}

/// 先頭の明細表から、空段落だけを挟んで続く明細表をまとめる
pub fn detail_group(doc: &Document, first: usize) -> Vec<usize> {
    let mut group = vec![first];
    for (position, block) in doc.blocks.iter().enumerate().skip(first + 1) {
        match block {
            Block::Table(t) if is_detail_table(t) => group.push(position),
            Block::Paragraph(p) if p.is_blank() => continue,
            _ => break,
        }
    }
    group
}

fn require_table(doc: &Document, anchor: &str, predicate: fn(&Table) -> bool) -> Result<usize> {
    nth_table(doc, 1, predicate).ok_or_else(|| missing(anchor))
}

fn missing(anchor: impl Into<String>) -> ReportError {
    let error = ReportError::anchor(anchor);
    tracing::error!("{}", error);
    error
}
