//! テンプレート構造の調整
//!
//! 写真の件数に合わせて、汇总表の行・明細表の数・類別統計表の行を
//! 必要なだけ複製して追加する。不足分だけを追加するので、
//! 十分な構造を持つ文書に対しては何もしない。

use super::anchors::HEADER_ROW_HEIGHT_CM;
use super::layout::{locate_tier, DocumentLayout};
use crate::document::{Block, Document, Paragraph, Row, Table};
use crate::error::{ReportError, Result};
use inspection_common::{DefectCategory, Severity, TOTAL_LABEL};
use std::path::Path;

/// 汇总表・類別統計表の見出し行数
const HEADER_ROWS: usize = 1;

/// 調整結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// 等級ごとに追加した汇总表の行数
    pub ledger_rows_added: [usize; 3],
    /// 等級ごとに追加した明細表の数
    pub detail_tables_added: [usize; 3],
    pub category_rows_added: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.ledger_rows_added.iter().all(|n| *n == 0)
            && self.detail_tables_added.iter().all(|n| *n == 0)
            && self.category_rows_added == 0
    }
}

/// テンプレートを開いて調整し、中間文書として保存する
pub fn reconcile_file(
    template_path: &Path,
    intermediate_path: &Path,
    counts: [usize; 3],
) -> Result<ReconcileReport> {
    let mut doc = Document::open(template_path)?;
    let report = reconcile(&mut doc, counts)?;
    doc.save(intermediate_path)?;
    tracing::info!(path = %intermediate_path.display(), "中間文書を保存");
    Ok(report)
}

/// 件数 [危急, 严重, 一般] に合わせて文書構造を調整する
pub fn reconcile(doc: &mut Document, counts: [usize; 3]) -> Result<ReconcileReport> {
    // 変更前にすべてのアンカーを確認
    let layout = DocumentLayout::locate(doc)?;
    let mut report = ReconcileReport::default();

    let canonical_position = layout.tier(Severity::Critical).details[0];
    let canonical = {
        let table = table_mut(doc, canonical_position)?;
        normalize_detail_table(table);
        table.clone()
    };

    // 行の追加はブロック位置を変えない
    for severity in Severity::ALL {
        let i = severity.index();
        let table = table_mut(doc, layout.tier(severity).ledger)?;
        report.ledger_rows_added[i] = add_missing_rows(table, counts[i])?;
        if report.ledger_rows_added[i] > 0 {
            tracing::info!(
                tier = severity.label(),
                rows = report.ledger_rows_added[i],
                "缺陷汇总表に行を追加"
            );
        }
    }

    report.category_rows_added =
        ensure_category_rows(table_mut(doc, layout.category_statistics)?)?;

    // 表の挿入で後続の位置がずれるため、等級ごとに探索し直す
    for severity in Severity::ALL {
        let i = severity.index();
        let tier = locate_tier(doc, severity)?;
        let deficit = counts[i].saturating_sub(tier.details.len());
        if deficit == 0 {
            continue;
        }

        let mut last = tier.details[tier.details.len() - 1];
        for _ in 0..deficit {
            doc.insert_block(last + 1, Block::Paragraph(Paragraph::page_break()));
            doc.insert_block(last + 2, Block::Table(canonical.clone()));
            last += 2;
        }
        report.detail_tables_added[i] = deficit;
        tracing::info!(tier = severity.label(), tables = deficit, "明細表を追加");
    }

    if report.is_noop() {
        tracing::info!("文書構造は十分です。変更なし");
    }
    Ok(report)
}

/// 汇总表のデータ行を必要数まで増やす。追加した行数を返す
pub fn add_missing_rows(table: &mut Table, required: usize) -> Result<usize> {
    if table.rows.len() <= HEADER_ROWS {
        return Err(ReportError::StructureMismatch(
            "汇总表に複製元のデータ行がありません".into(),
        ));
    }

    let existing = table.rows.len() - HEADER_ROWS;
    let deficit = required.saturating_sub(existing);
    if deficit > 0 {
        let source = table.rows[table.rows.len() - 1].blank_clone();
        for _ in 0..deficit {
            table.rows.push(source.clone());
        }
    }
    Ok(deficit)
}

/// 類別統計表に全類別の行があることを保証する（合計行の直前に追加）
pub fn ensure_category_rows(table: &mut Table) -> Result<usize> {
    let mut total_index = table
        .rows
        .iter()
        .position(|r| r.cells.first().map(|c| c.text()) == Some(TOTAL_LABEL.to_string()))
        .ok_or_else(|| ReportError::anchor(format!("{} ({})", TOTAL_LABEL, "缺陷类别")))?;

    if total_index <= HEADER_ROWS {
        return Err(ReportError::StructureMismatch(
            "類別統計表に複製元の類別行がありません".into(),
        ));
    }

    let present: Vec<String> = table.rows[HEADER_ROWS..total_index]
        .iter()
        .filter_map(|r| r.cells.first().map(|c| c.text()))
        .collect();

    let mut added = 0;
    for category in DefectCategory::ALL {
        if present.iter().any(|label| label == category.label()) {
            continue;
        }
        let mut row: Row = table.rows[total_index - 1].blank_clone();
        if let Some(first) = row.cells.first_mut() {
            first.set_text(category.label());
        }
        table.insert_row(total_index, row);
        total_index += 1;
        added += 1;
    }

    if added > 0 {
        tracing::info!(rows = added, "類別統計表に類別行を追加");
    }
    Ok(added)
}

/// 複製元の明細表の見出し3行を固定の高さにそろえる
fn normalize_detail_table(table: &mut Table) {
    for row in table.rows.iter_mut().take(3) {
        row.height_cm = Some(HEADER_ROW_HEIGHT_CM);
    }
}

fn table_mut(doc: &mut Document, position: usize) -> Result<&mut Table> {
    doc.table_at_mut(position)
        .ok_or_else(|| ReportError::StructureMismatch(format!("位置 {} は表ではありません", position)))
}
