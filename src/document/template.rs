//! 標準テンプレート文書
//!
//! `init-template` で書き出され、報告書生成の起点になる。
//! 明細表・汇总表は各等級1つずつだけ持ち、件数に応じた拡張は構造調整で行う。

use super::{Alignment, Block, Cell, Document, Paragraph, Row, RunFormat, Table, VerticalAlign};
use crate::report::anchors::{
    self, CATEGORY_STATS_HEADER, CLOSE_UP_ROW_HEIGHT_CM, DETAIL_HEADER, HEADER_ROW_HEIGHT_CM,
    LEDGER_HEADER, SEVERITY_STATS_HEADER,
};
use inspection_common::{DefectCategory, Severity, TOTAL_LABEL};

/// 総覧段落の文面
pub const NARRATIVE_TEXT: &str = "本次现场巡检共发现缺陷{total_bug}处，其中危急缺陷{weiji_bug}处，\
严重缺陷{yanzhong_bug}处，一般缺陷{yiban_bug}处。按缺陷类别统计：绝缘子缺陷{jueyuanzi_bug}处，\
基础缺陷{jichu_bug}处，金具缺陷{jinjv_bug}处，附属设施缺陷{fushu_bug}处，导地线缺陷{daodixian_bug}处，\
避雷器缺陷{bileiqi_bug}处，变压器缺陷{bianyaqi_bug}处，通道缺陷{tongdao_bug}处。";

const BODY_SIZE_PT: f32 = 10.5;
const TITLE_SIZE_PT: f32 = 16.0;

fn heading(text: &str) -> Block {
    let format = RunFormat {
        bold: true,
        size_pt: Some(12.0),
        ..Default::default()
    };
    let mut paragraph = Paragraph::new(text);
    paragraph.runs[0].format = format;
    Block::Paragraph(paragraph)
}

fn header_cell(text: &str) -> Cell {
    let mut cell = Cell::new(text);
    cell.update_format(|f| {
        f.bold = true;
        f.size_pt = Some(BODY_SIZE_PT);
    });
    cell.set_alignment(Alignment::Center);
    cell.vertical_align = Some(VerticalAlign::Center);
    cell
}

fn value_cell() -> Cell {
    let mut cell = Cell::new("");
    cell.update_format(|f| f.size_pt = Some(BODY_SIZE_PT));
    cell.set_alignment(Alignment::Center);
    cell.vertical_align = Some(VerticalAlign::Center);
    cell
}

fn severity_columns() -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = Severity::ALL.iter().map(|s| s.label()).collect();
    columns.push(TOTAL_LABEL);
    columns
}

/// 缺陷数量統計表（等級ごとの件数）
pub fn severity_statistics_table() -> Table {
    let mut header = vec![header_cell(SEVERITY_STATS_HEADER)];
    header.extend(severity_columns().into_iter().map(header_cell));
    let mut values = vec![header_cell("缺陷数量")];
    values.extend((0..4).map(|_| value_cell()));
    Table::new(vec![Row::new(header), Row::new(values)])
}

/// 缺陷類別統計表（類別 × 等級）
pub fn category_statistics_table() -> Table {
    let mut header = vec![header_cell(CATEGORY_STATS_HEADER)];
    header.extend(severity_columns().into_iter().map(header_cell));
    let mut rows = vec![Row::new(header)];
    for label in DefectCategory::ALL
        .iter()
        .map(|c| c.label())
        .chain(std::iter::once(TOTAL_LABEL))
    {
        let mut cells = vec![header_cell(label)];
        cells.extend((0..4).map(|_| value_cell()));
        rows.push(Row::new(cells));
    }
    Table::new(rows)
}

/// 缺陷汇总表（1行目は見出し、2行目が複製元の空行）
pub fn ledger_table() -> Table {
    let header = ["序号", LEDGER_HEADER, "缺陷类别", "缺陷等级", "照片编号"]
        .into_iter()
        .map(header_cell)
        .collect();
    let values = (0..5).map(|_| value_cell()).collect();
    Table::new(vec![Row::new(header), Row::new(values).with_height(HEADER_ROW_HEIGHT_CM)])
}

/// 明細表（1枚の写真につき1つ）
pub fn detail_table() -> Table {
    let mut photo = value_cell().spanning(3);
    photo.set_alignment(Alignment::Center);
    let mut close_up = value_cell().spanning(2);
    close_up.set_alignment(Alignment::Left);

    Table::new(vec![
        Row::new(vec![
            header_cell(DETAIL_HEADER),
            header_cell("杆塔号"),
            header_cell("缺陷等级"),
        ]),
        Row::new(vec![value_cell(), value_cell(), value_cell()]),
        Row::new(vec![header_cell(LEDGER_HEADER), value_cell().spanning(2)]),
        Row::new(vec![photo]),
        Row::new(vec![header_cell("特写照片"), close_up]).with_height(CLOSE_UP_ROW_HEIGHT_CM),
    ])
}

/// 標準テンプレート
pub fn standard_template() -> Document {
    let mut title = Paragraph::new("输电线路巡检缺陷报告").aligned(Alignment::Center);
    title.runs[0].format = RunFormat {
        bold: true,
        size_pt: Some(TITLE_SIZE_PT),
        ..Default::default()
    };

    let mut narrative = Paragraph::new(NARRATIVE_TEXT);
    narrative.runs[0].format.size_pt = Some(12.0);

    let mut blocks = vec![
        Block::Paragraph(title),
        heading("一、缺陷情况总览"),
        Block::Paragraph(narrative),
        heading("二、缺陷数量统计表"),
        Block::Table(severity_statistics_table()),
        heading("三、缺陷类别统计表"),
        Block::Table(category_statistics_table()),
    ];

    for severity in Severity::ALL {
        blocks.push(Block::Paragraph(Paragraph::page_break()));
        blocks.push(heading(anchors::ledger_heading(severity)));
        blocks.push(Block::Table(ledger_table()));
        blocks.push(heading(anchors::detail_heading(severity)));
        blocks.push(Block::Table(detail_table()));
    }

    Document::new(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_anchor_cells() {
        let doc = standard_template();
        let tables: Vec<&Table> = doc.tables().map(|(_, t)| t).collect();
        // 統計表2つ + (汇总表 + 明細表) × 3
        assert_eq!(tables.len(), 8);
        assert_eq!(tables[0].cell_text(0, 0), SEVERITY_STATS_HEADER);
        assert_eq!(tables[1].cell_text(0, 0), CATEGORY_STATS_HEADER);
        assert_eq!(tables[2].cell_text(0, 1), LEDGER_HEADER);
        assert_eq!(tables[3].cell_text(0, 0), DETAIL_HEADER);
    }

    #[test]
    fn test_template_headings_present() {
        let doc = standard_template();
        for severity in Severity::ALL {
            assert!(doc.find_paragraph(anchors::detail_heading(severity)).is_some());
        }
        assert!(doc.find_paragraph(anchors::NARRATIVE_ANCHOR).is_some());
    }

    #[test]
    fn test_detail_table_geometry() {
        let table = detail_table();
        assert_eq!(table.grid_columns(), 3);
        for row in &table.rows {
            assert_eq!(row.grid_columns(), 3);
        }
        assert!(table.cell(anchors::PHOTO_CELL.0, anchors::PHOTO_CELL.1).is_some());
        assert!(table.cell(anchors::CLOSE_UP_CELL.0, anchors::CLOSE_UP_CELL.1).is_some());
    }

    #[test]
    fn test_category_table_has_all_rows() {
        let table = category_statistics_table();
        assert_eq!(table.rows.len(), DefectCategory::ALL.len() + 2);
        assert_eq!(table.cell_text(table.rows.len() - 1, 0), TOTAL_LABEL);
    }
}
