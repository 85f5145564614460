//! 報告書の組立
//!
//! 構造調整済みの文書に、等級ごと・発見順に写真のデータを書き込む。
//! 汇总表の行を書くときに集計器へ記録し、最後に統計表と総覧段落を埋める。

use super::anchors::{
    CLOSE_UP_BOX, CLOSE_UP_CELL, CLOSE_UP_ROW_HEIGHT_CM, HEADER_ROW_HEIGHT_CM, PHOTO_BOX,
    PHOTO_CELL, REASON_CELL, ROUTE_CELL, SEVERITY_CELL, TOWER_CELL,
};
use super::layout::DocumentLayout;
use super::narrative;
use crate::config::Config;
use crate::document::{Alignment, Cell, Document, InlineImage, Row, Table};
use crate::error::{ReportError, Result};
use inspection_common::{
    ClassifiedBatch, DefectRecord, Severity, StatColumn, StatRow, StatisticsAggregator,
};
use std::path::PathBuf;

/// 組立の設定
#[derive(Debug, Clone)]
pub struct AssemblyOptions {
    /// 写真フォルダ（埋め込む画像のパスの基準）
    pub image_dir: PathBuf,
    pub statistics_font: String,
    pub copy_font_size: bool,
}

impl AssemblyOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            image_dir: config.image_dir.clone(),
            statistics_font: config.statistics_font.clone(),
            copy_font_size: config.copy_statistics_font_size,
        }
    }
}

/// 組立結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblySummary {
    /// 等級ごとに書き込んだ写真数
    pub records_written: [usize; 3],
    pub close_ups_embedded: usize,
    /// 写真がなく見出し行だけを入れた等級
    pub placeholder_tiers: Vec<Severity>,
}

/// 文書にデータを書き込む
pub fn assemble(
    doc: &mut Document,
    batch: &mut ClassifiedBatch,
    stats: &mut StatisticsAggregator,
    options: &AssemblyOptions,
) -> Result<AssemblySummary> {
    // 行の挿入だけなのでブロック位置は変わらない
    let layout = DocumentLayout::locate(doc)?;
    batch.assign_labels();
    let batch: &ClassifiedBatch = batch;
    let mut summary = AssemblySummary::default();

    for severity in Severity::ALL {
        let tier = layout.tier(severity);
        let records = batch.tier(severity);

        if records.len() > tier.details.len() {
            return Err(ReportError::StructureMismatch(format!(
                "{}: 写真 {} 件に対して明細表が {} 個しかありません",
                severity.label(),
                records.len(),
                tier.details.len()
            )));
        }

        let ledger = table_mut(doc, tier.ledger)?;
        if records.len() > ledger.rows.len().saturating_sub(1) {
            return Err(ReportError::StructureMismatch(format!(
                "{}: 缺陷汇总表の行が不足しています",
                severity.label()
            )));
        }
        for (i, record) in records.iter().enumerate() {
            write_ledger_row(ledger, i + 1, record)?;
            match record.category {
                Some(category) => stats.record(category, record.severity),
                None => stats.record_unclassified(record.severity),
            }
        }

        for (record, position) in records.iter().zip(&tier.details) {
            let close_up = batch
                .close_up(&record.identity())
                .map(|c| options.image_dir.join(&c.file_name));
            if close_up.is_some() {
                summary.close_ups_embedded += 1;
            }

            let table = table_mut(doc, *position)?;
            write_detail(table, record, close_up, options)?;
            let heading = record.heading().unwrap_or_else(|| record.id.clone());
            insert_label_row(table, &heading);
            tracing::debug!(label = %heading, "明細表に書き込み");
        }

        if records.is_empty() {
            let table = table_mut(doc, tier.details[0])?;
            insert_label_row(table, &format!("{}1", severity.prefix()));
            summary.placeholder_tiers.push(severity);
        }
        summary.records_written[severity.index()] = records.len();
    }

    write_severity_statistics(table_mut(doc, layout.severity_statistics)?, stats, options);
    write_category_statistics(table_mut(doc, layout.category_statistics)?, stats, options);

    let paragraph = doc
        .paragraph_at_mut(layout.narrative)
        .ok_or_else(|| ReportError::anchor(super::anchors::NARRATIVE_ANCHOR))?;
    narrative::rewrite_paragraph(paragraph, stats);

    tracing::info!(
        total = stats.photo_count(),
        unclassified = stats.unclassified_total(),
        close_ups = summary.close_ups_embedded,
        "報告書の組立が完了"
    );
    Ok(summary)
}

fn write_detail(
    table: &mut Table,
    record: &DefectRecord,
    close_up: Option<PathBuf>,
    options: &AssemblyOptions,
) -> Result<()> {
    write_text(table, ROUTE_CELL, &record.route_name)?;
    write_text(table, TOWER_CELL, &record.tower_number)?;
    write_text(table, SEVERITY_CELL, record.severity.label())?;
    write_text(table, REASON_CELL, &record.defect_reason)?;

    let photo = InlineImage {
        path: options.image_dir.join(&record.file_name),
        width_cm: PHOTO_BOX.0,
        height_cm: PHOTO_BOX.1,
    };
    detail_cell(table, PHOTO_CELL)?.add_image(photo, Alignment::Center);

    if let Some(path) = close_up {
        let image = InlineImage {
            path,
            width_cm: CLOSE_UP_BOX.0,
            height_cm: CLOSE_UP_BOX.1,
        };
        detail_cell(table, CLOSE_UP_CELL)?.add_image(image, Alignment::Left);
        table.rows[CLOSE_UP_CELL.0].height_cm = Some(CLOSE_UP_ROW_HEIGHT_CM);
    }
    Ok(())
}

/// 表の全幅を結合した見出し行を先頭に入れる
fn insert_label_row(table: &mut Table, text: &str) {
    let format = table
        .cell(0, 0)
        .and_then(Cell::first_text_format)
        .cloned()
        .unwrap_or_default();

    let mut cell = Cell::default().spanning(table.grid_columns());
    cell.update_format(|f| *f = format);
    cell.set_text(text);
    cell.set_alignment(Alignment::Center);
    table.insert_row(0, Row::new(vec![cell]).with_height(HEADER_ROW_HEIGHT_CM));
}

/// 汇总表の1行: 序号 / 缺陷描述 / 缺陷类别 / 缺陷等级 / 照片编号
fn write_ledger_row(table: &mut Table, row: usize, record: &DefectRecord) -> Result<()> {
    let values = [
        row.to_string(),
        record.identity().description(),
        record.category.map(|c| c.label().to_string()).unwrap_or_default(),
        record.severity.label().to_string(),
        record.label.clone().unwrap_or_default(),
    ];
    for (col, value) in values.into_iter().enumerate() {
        write_text(table, (row, col), &value)?;
    }
    Ok(())
}

/// 缺陷数量統計表（0 の欄は空欄のまま）
fn write_severity_statistics(
    table: &mut Table,
    stats: &StatisticsAggregator,
    options: &AssemblyOptions,
) {
    for col in 1..table.rows.first().map(|r| r.cells.len()).unwrap_or(0) {
        let value = match StatColumn::from_label(&table.cell_text(0, col)) {
            Some(StatColumn::Severity(severity)) => stats.severity_count(severity),
            Some(StatColumn::Total) => stats.photo_count(),
            None => continue,
        };
        if value > 0 {
            write_number(table, (1, col), value, options);
        }
    }
}

/// 缺陷類別統計表（合計行・合計列は 0 でも書く）
fn write_category_statistics(
    table: &mut Table,
    stats: &StatisticsAggregator,
    options: &AssemblyOptions,
) {
    let columns: Vec<(usize, StatColumn)> = table
        .rows
        .first()
        .map(|r| r.cells.len())
        .map(|n| {
            (1..n)
                .filter_map(|col| StatColumn::from_label(&table.cell_text(0, col)).map(|k| (col, k)))
                .collect()
        })
        .unwrap_or_default();

    for row in 1..table.rows.len() {
        let Some(row_key) = StatRow::from_label(&table.cell_text(row, 0)) else {
            tracing::debug!(row, "類別統計表の行ラベルを解決できません");
            continue;
        };
        for (col, column_key) in &columns {
            let value = stats.get(row_key, *column_key);
            if value > 0 || row_key == StatRow::Total || *column_key == StatColumn::Total {
                write_number(table, (row, *col), value, options);
            }
        }
    }
}

/// 数字を書き、統計用フォントと見出しのフォントサイズを適用する
fn write_number(table: &mut Table, at: (usize, usize), value: usize, options: &AssemblyOptions) {
    let header_size = table
        .cell(0, at.1)
        .and_then(Cell::first_text_format)
        .and_then(|f| f.size_pt);

    if let Some(cell) = table.cell_mut(at.0, at.1) {
        cell.set_text(value.to_string());
        cell.update_format(|f| {
            f.font_name = Some(options.statistics_font.clone());
            if options.copy_font_size {
                if let Some(size) = header_size {
                    f.size_pt = Some(size);
                }
            }
        });
    }
}

fn write_text(table: &mut Table, at: (usize, usize), text: &str) -> Result<()> {
    detail_cell(table, at)?.set_text(text);
    Ok(())
}

fn detail_cell(table: &mut Table, at: (usize, usize)) -> Result<&mut Cell> {
    table.cell_mut(at.0, at.1).ok_or_else(|| {
        ReportError::StructureMismatch(format!("セル ({}, {}) がありません", at.0, at.1))
    })
}

fn table_mut(doc: &mut Document, position: usize) -> Result<&mut Table> {
    doc.table_at_mut(position)
        .ok_or_else(|| ReportError::StructureMismatch(format!("位置 {} は表ではありません", position)))
}
