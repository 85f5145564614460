//! DOCX 出力
//!
//! 文書ツリーを WordprocessingML に変換し、埋め込み画像と一緒に
//! zip パッケージとして書き出す。書式は文書ツリーが持つものだけを出力する。

use super::{
    Alignment, Block, Cell, Document, InlineImage, Paragraph, Row, Run, RunContent, RunFormat,
    Table, VerticalAlign,
};
use crate::error::{ReportError, Result};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// 1cm = 567 twip
const TWIPS_PER_CM: f32 = 567.0;
/// 1cm = 360000 EMU
const EMU_PER_CM: f32 = 360_000.0;
/// A4 本文幅（左右余白 2cm）
const TEXT_WIDTH_CM: f32 = 17.0;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const WP_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const PIC_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const IMAGE_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

/// 埋め込み画像の登録簿（同じパスは1回だけ格納する）
#[derive(Default)]
struct Media {
    entries: Vec<MediaEntry>,
    by_path: HashMap<PathBuf, usize>,
}

struct MediaEntry {
    source: PathBuf,
    rel_id: String,
    target: String,
    extension: String,
}

impl Media {
    fn register(&mut self, path: &Path) -> &MediaEntry {
        if let Some(index) = self.by_path.get(path).copied() {
            return &self.entries[index];
        }

        let n = self.entries.len() + 1;
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|| "jpeg".to_string());
        self.entries.push(MediaEntry {
            source: path.to_path_buf(),
            rel_id: format!("rId{}", n),
            target: format!("media/image{}.{}", n, extension),
            extension,
        });
        self.by_path.insert(path.to_path_buf(), n - 1);
        &self.entries[n - 1]
    }
}

/// 文書を DOCX として書き出す
///
/// パッケージはメモリ上で組み立て、全部揃ってから出力先に書く。
/// 画像が読めないときは出力先に触れない。
pub fn write_docx(doc: &Document, path: &Path) -> Result<()> {
    let mut media = Media::default();
    let body = build_document_xml(doc, &mut media);

    let images = media
        .entries
        .iter()
        .map(|entry| {
            std::fs::read(&entry.source)
                .map(|data| (format!("word/{}", entry.target), data))
                .map_err(|e| ReportError::ImageLoad(format!("{}: {}", entry.source.display(), e)))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", build_content_types(&media)),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("word/document.xml", body),
        ("word/_rels/document.xml.rels", build_document_rels(&media)),
        ("docProps/core.xml", build_core_props()),
    ];
    for (name, content) in parts {
        zip.start_file(name, opts).map_err(docx_error)?;
        zip.write_all(content.as_bytes())?;
    }
    for (name, data) in &images {
        zip.start_file(name.as_str(), opts).map_err(docx_error)?;
        zip.write_all(data)?;
    }

    let package = zip.finish().map_err(docx_error)?.into_inner();
    std::fs::write(path, package)?;
    tracing::info!(
        path = %path.display(),
        images = images.len(),
        "DOCXを書き出しました"
    );
    Ok(())
}

fn docx_error(e: zip::result::ZipError) -> ReportError {
    ReportError::DocxExport(e.to_string())
}

fn build_document_xml(doc: &Document, media: &mut Media) -> String {
    let mut drawing_id = 0u32;
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<w:document xmlns:w="{}" xmlns:r="{}" xmlns:wp="{}" xmlns:a="{}" xmlns:pic="{}">"#,
        W_NS, R_NS, WP_NS, A_NS, PIC_NS
    ));
    xml.push_str("<w:body>");

    for block in &doc.blocks {
        match block {
            Block::Paragraph(p) => push_paragraph(&mut xml, p, media, &mut drawing_id),
            Block::Table(t) => {
                push_table(&mut xml, t, media, &mut drawing_id);
                // 表が連続すると結合されるため空段落で区切る
                xml.push_str("<w:p/>");
            }
        }
    }

    xml.push_str(concat!(
        r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/>"#,
        r#"<w:pgMar w:top="1440" w:right="1134" w:bottom="1440" w:left="1134" w:header="851" w:footer="992" w:gutter="0"/>"#,
        "</w:sectPr>"
    ));
    xml.push_str("</w:body></w:document>");
    xml
}

fn push_paragraph(xml: &mut String, paragraph: &Paragraph, media: &mut Media, drawing_id: &mut u32) {
    xml.push_str("<w:p>");
    if let Some(alignment) = paragraph.alignment {
        xml.push_str(&format!(r#"<w:pPr><w:jc w:val="{}"/></w:pPr>"#, jc_value(alignment)));
    }
    for run in &paragraph.runs {
        push_run(xml, run, media, drawing_id);
    }
    xml.push_str("</w:p>");
}

fn push_run(xml: &mut String, run: &Run, media: &mut Media, drawing_id: &mut u32) {
    xml.push_str("<w:r>");
    xml.push_str(&run_properties(&run.format));
    match &run.content {
        RunContent::Text { text } => {
            xml.push_str(&format!(
                r#"<w:t xml:space="preserve">{}</w:t>"#,
                escape_xml(text)
            ));
        }
        RunContent::PageBreak => xml.push_str(r#"<w:br w:type="page"/>"#),
        RunContent::Image(image) => {
            *drawing_id += 1;
            push_drawing(xml, image, media, *drawing_id);
        }
    }
    xml.push_str("</w:r>");
}

fn run_properties(format: &RunFormat) -> String {
    let mut props = String::new();
    if let Some(font) = &format.font_name {
        let font = escape_xml(font);
        props.push_str(&format!(
            r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:eastAsia="{0}" w:cs="{0}"/>"#,
            font
        ));
    }
    if format.bold {
        props.push_str("<w:b/>");
    }
    if let Some(size) = format.size_pt {
        // ハーフポイント
        let half_points = (size * 2.0).round() as u32;
        props.push_str(&format!(
            r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
            half_points
        ));
    }
    if props.is_empty() {
        props
    } else {
        format!("<w:rPr>{}</w:rPr>", props)
    }
}

fn push_drawing(xml: &mut String, image: &InlineImage, media: &mut Media, id: u32) {
    let entry = media.register(&image.path);
    let cx = emu(image.width_cm);
    let cy = emu(image.height_cm);
    xml.push_str(&format!(
        concat!(
            r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/><wp:docPr id="{id}" name="Picture {id}"/>"#,
            r#"<a:graphic><a:graphicData uri="{pic_ns}"><pic:pic>"#,
            r#"<pic:nvPicPr><pic:cNvPr id="{id}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#
        ),
        cx = cx,
        cy = cy,
        id = id,
        pic_ns = PIC_NS,
        name = escape_xml(&entry.target),
        rel = entry.rel_id,
    ));
}

fn push_table(xml: &mut String, table: &Table, media: &mut Media, drawing_id: &mut u32) {
    let columns = table.grid_columns().max(1);
    let column_width = twips(TEXT_WIDTH_CM / columns as f32);

    xml.push_str("<w:tbl><w:tblPr>");
    xml.push_str(r#"<w:tblW w:w="0" w:type="auto"/><w:jc w:val="center"/>"#);
    xml.push_str("<w:tblBorders>");
    for side in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        xml.push_str(&format!(
            r#"<w:{} w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
            side
        ));
    }
    xml.push_str("</w:tblBorders></w:tblPr><w:tblGrid>");
    for _ in 0..columns {
        xml.push_str(&format!(r#"<w:gridCol w:w="{}"/>"#, column_width));
    }
    xml.push_str("</w:tblGrid>");

    for row in &table.rows {
        push_row(xml, row, column_width, media, drawing_id);
    }
    xml.push_str("</w:tbl>");
}

fn push_row(xml: &mut String, row: &Row, column_width: u32, media: &mut Media, drawing_id: &mut u32) {
    xml.push_str("<w:tr>");
    if let Some(height) = row.height_cm {
        xml.push_str(&format!(
            r#"<w:trPr><w:trHeight w:val="{}"/></w:trPr>"#,
            twips(height)
        ));
    }
    for cell in &row.cells {
        push_cell(xml, cell, column_width, media, drawing_id);
    }
    xml.push_str("</w:tr>");
}

fn push_cell(xml: &mut String, cell: &Cell, column_width: u32, media: &mut Media, drawing_id: &mut u32) {
    let width = cell
        .width_cm
        .map(twips)
        .unwrap_or(column_width * cell.grid_span);

    xml.push_str("<w:tc><w:tcPr>");
    xml.push_str(&format!(r#"<w:tcW w:w="{}" w:type="dxa"/>"#, width));
    if cell.grid_span > 1 {
        xml.push_str(&format!(r#"<w:gridSpan w:val="{}"/>"#, cell.grid_span));
    }
    if let Some(align) = cell.vertical_align {
        let value = match align {
            VerticalAlign::Top => "top",
            VerticalAlign::Center => "center",
            VerticalAlign::Bottom => "bottom",
        };
        xml.push_str(&format!(r#"<w:vAlign w:val="{}"/>"#, value));
    }
    xml.push_str("</w:tcPr>");

    // セルには段落が最低1つ必要
    if cell.paragraphs.is_empty() {
        xml.push_str("<w:p/>");
    }
    for paragraph in &cell.paragraphs {
        push_paragraph(xml, paragraph, media, drawing_id);
    }
    xml.push_str("</w:tc>");
}

fn build_content_types(media: &Media) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

    let mut extensions: Vec<&str> = media.entries.iter().map(|e| e.extension.as_str()).collect();
    extensions.sort_unstable();
    extensions.dedup();
    for ext in extensions {
        xml.push_str(&format!(
            r#"<Default Extension="{}" ContentType="{}"/>"#,
            escape_xml(ext),
            image_content_type(ext)
        ));
    }

    xml.push_str(r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push_str("</Types>");
    xml
}

fn build_document_rels(media: &Media) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    for entry in &media.entries {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            entry.rel_id,
            IMAGE_REL,
            escape_xml(&entry.target)
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn build_core_props() -> String {
    let date_str = chrono::Utc::now().to_rfc3339();
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>巡检缺陷报告</dc:title>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
            "</cp:coreProperties>"
        ),
        date_str
    )
}

fn image_content_type(extension: &str) -> String {
    match extension {
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "png" => "image/png".to_string(),
        "tif" | "tiff" => "image/tiff".to_string(),
        other => format!("image/{}", other),
    }
}

fn jc_value(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
    }
}

fn twips(cm: f32) -> u32 {
    (cm * TWIPS_PER_CM).round() as u32
}

fn emu(cm: f32) -> u64 {
    (cm * EMU_PER_CM).round() as u64
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
