//! 文書モデル
//!
//! 段落と表が並ぶだけの単純な文書ツリー。テンプレート・中間文書は JSON で
//! 永続化し、最終報告書は DOCX に書き出す（`docx` モジュール）。
//!
//! 構造の複製は `Clone`（深いコピー）で行い、複製先は元と独立した位置を持つ。

pub mod docx;
pub mod template;

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub runs: Vec<Run>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub content: RunContent,
    #[serde(default)]
    pub format: RunFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RunContent {
    Text { text: String },
    PageBreak,
    Image(InlineImage),
}

/// 埋め込み画像（表示サイズはcm）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub path: PathBuf,
    pub width_cm: f32,
    pub height_cm: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    /// ポイント
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_pt: Option<f32>,
    #[serde(default)]
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub cells: Vec<Cell>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
    /// 横方向の結合数
    #[serde(default = "default_span")]
    pub grid_span: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_cm: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,
}

fn default_span() -> u32 {
    1
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            paragraphs: vec![Paragraph::default()],
            grid_span: 1,
            width_cm: None,
            vertical_align: None,
        }
    }
}

impl Run {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: RunContent::Text { text: text.into() },
            format: RunFormat::default(),
        }
    }

    pub fn image(image: InlineImage) -> Self {
        Self {
            content: RunContent::Image(image),
            format: RunFormat::default(),
        }
    }

    pub fn page_break() -> Self {
        Self {
            content: RunContent::PageBreak,
            format: RunFormat::default(),
        }
    }

    pub fn with_format(mut self, format: RunFormat) -> Self {
        self.format = format;
        self
    }
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::text(text)],
            alignment: None,
        }
    }

    /// 改ページだけの段落
    pub fn page_break() -> Self {
        Self {
            runs: vec![Run::page_break()],
            alignment: None,
        }
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn text(&self) -> String {
        self.runs
            .iter()
            .filter_map(|run| match &run.content {
                RunContent::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// 文字を含まない段落（空行・改ページ）
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|run| match &run.content {
            RunContent::Text { text } => text.trim().is_empty(),
            RunContent::PageBreak => true,
            RunContent::Image(_) => false,
        })
    }

    /// 最初の文字ランの書式
    pub fn first_text_format(&self) -> Option<&RunFormat> {
        self.runs
            .iter()
            .find(|run| matches!(run.content, RunContent::Text { .. }))
            .map(|run| &run.format)
    }

    /// 文字を置き換える（最初の文字ランの書式を引き継ぐ）
    pub fn set_text(&mut self, text: impl Into<String>) {
        let format = self.first_text_format().cloned().unwrap_or_default();
        self.runs = vec![Run::text(text).with_format(format)];
    }
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            paragraphs: vec![Paragraph::new(text)],
            ..Default::default()
        }
    }

    pub fn spanning(mut self, span: u32) -> Self {
        self.grid_span = span.max(1);
        self
    }

    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn first_paragraph_mut(&mut self) -> &mut Paragraph {
        if self.paragraphs.is_empty() {
            self.paragraphs.push(Paragraph::default());
        }
        &mut self.paragraphs[0]
    }

    /// 文字を置き換える（1段落・1ランにまとめ、書式と配置は引き継ぐ）
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.paragraphs.truncate(1);
        self.first_paragraph_mut().set_text(text);
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.first_paragraph_mut().alignment = Some(alignment);
    }

    /// 最初の段落に画像を追加
    pub fn add_image(&mut self, image: InlineImage, alignment: Alignment) {
        let paragraph = self.first_paragraph_mut();
        paragraph.runs.push(Run::image(image));
        paragraph.alignment = Some(alignment);
    }

    pub fn first_text_format(&self) -> Option<&RunFormat> {
        self.paragraphs.iter().find_map(Paragraph::first_text_format)
    }

    /// 最初のランの書式を変更する
    pub fn update_format(&mut self, update: impl FnOnce(&mut RunFormat)) {
        let paragraph = self.first_paragraph_mut();
        if paragraph.runs.is_empty() {
            paragraph.runs.push(Run::text(""));
        }
        update(&mut paragraph.runs[0].format);
    }

    pub fn images(&self) -> impl Iterator<Item = &InlineImage> {
        self.paragraphs
            .iter()
            .flat_map(|p| p.runs.iter())
            .filter_map(|run| match &run.content {
                RunContent::Image(image) => Some(image),
                _ => None,
            })
    }
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            height_cm: None,
        }
    }

    pub fn with_height(mut self, height_cm: f32) -> Self {
        self.height_cm = Some(height_cm);
        self
    }

    /// グリッド上の列数（結合を考慮）
    pub fn grid_columns(&self) -> u32 {
        self.cells.iter().map(|c| c.grid_span).sum()
    }

    /// 書式を残して文字と画像を消した複製
    pub fn blank_clone(&self) -> Row {
        let mut row = self.clone();
        for cell in &mut row.cells {
            cell.set_text("");
        }
        row
    }
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|r| r.cells.get_mut(col))
    }

    /// セルの文字（存在しなければ空文字）
    pub fn cell_text(&self, row: usize, col: usize) -> String {
        self.cell(row, col).map(Cell::text).unwrap_or_default()
    }

    pub fn grid_columns(&self) -> u32 {
        self.rows.iter().map(Row::grid_columns).max().unwrap_or(0)
    }

    pub fn insert_row(&mut self, index: usize, row: Row) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, row);
    }
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// 文書を開く（JSONのみ）
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ReportError::FileNotFound(path.display().to_string()));
        }
        if is_docx(path) {
            return Err(ReportError::UnsupportedFormat(format!(
                "DOCXの読み込みには未対応です: {}",
                path.display()
            )));
        }
        let reader = BufReader::new(File::open(path)?);
        let document: Document = serde_json::from_reader(reader)?;
        Ok(document)
    }

    /// 文書を保存する（拡張子が docx なら DOCX、それ以外は JSON）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        if is_docx(path) {
            return docx::write_docx(self, path);
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// 表の (ブロック位置, 表) 一覧
    pub fn tables(&self) -> impl Iterator<Item = (usize, &Table)> {
        self.blocks.iter().enumerate().filter_map(|(i, b)| match b {
            Block::Table(t) => Some((i, t)),
            _ => None,
        })
    }

    pub fn table_count(&self) -> usize {
        self.tables().count()
    }

    pub fn table_at(&self, position: usize) -> Option<&Table> {
        match self.blocks.get(position) {
            Some(Block::Table(t)) => Some(t),
            _ => None,
        }
    }

    pub fn table_at_mut(&mut self, position: usize) -> Option<&mut Table> {
        match self.blocks.get_mut(position) {
            Some(Block::Table(t)) => Some(t),
            _ => None,
        }
    }

    pub fn paragraph_at(&self, position: usize) -> Option<&Paragraph> {
        match self.blocks.get(position) {
            Some(Block::Paragraph(p)) => Some(p),
            _ => None,
        }
    }

    pub fn paragraph_at_mut(&mut self, position: usize) -> Option<&mut Paragraph> {
        match self.blocks.get_mut(position) {
            Some(Block::Paragraph(p)) => Some(p),
            _ => None,
        }
    }

    /// 指定文字を含む最初の段落の位置
    pub fn find_paragraph(&self, needle: &str) -> Option<usize> {
        self.blocks.iter().position(|b| match b {
            Block::Paragraph(p) => p.text().contains(needle),
            _ => false,
        })
    }

    /// 指定位置にブロックを挿入（以降の位置は1つずれる）
    pub fn insert_block(&mut self, position: usize, block: Block) {
        let position = position.min(self.blocks.len());
        self.blocks.insert(position, block);
    }

    /// 埋め込まれているすべての画像
    pub fn images(&self) -> Vec<&InlineImage> {
        let mut images = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => images.extend(paragraph_images(p)),
                Block::Table(t) => {
                    for cell in t.rows.iter().flat_map(|r| r.cells.iter()) {
                        images.extend(cell.images());
                    }
                }
            }
        }
        images
    }
}

fn paragraph_images(paragraph: &Paragraph) -> impl Iterator<Item = &InlineImage> {
    paragraph.runs.iter().filter_map(|run| match &run.content {
        RunContent::Image(image) => Some(image),
        _ => None,
    })
}

fn is_docx(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("docx"))
        .unwrap_or(false)
}
