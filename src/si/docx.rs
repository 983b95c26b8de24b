//! Minimal WordprocessingML (.docx) writer
//!
//! Covers what the SI document needs: formatted runs, page breaks, bordered
//! tables and inline pictures. Every part is emitted through
//! `quick_xml::Writer` and zipped.

use crate::error::{PlannerError, PlannerResult};
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

type XmlWriter = Writer<Vec<u8>>;

const EMU_PER_INCH: f64 = 914_400.0;
const TWIPS_PER_INCH: u32 = 1440;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const WP_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const PIC_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const PKG_RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const IMAGE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// A run of text sharing one character format
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    text: String,
    bold: bool,
    underline: bool,
    size_pt: Option<f64>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn size(mut self, points: f64) -> Self {
        self.size_pt = Some(points);
        self
    }

    fn has_props(&self) -> bool {
        self.bold || self.underline || self.size_pt.is_some()
    }

    fn write_xml(&self, w: &mut XmlWriter) -> io::Result<()> {
        w.create_element("w:r").write_inner_content(|w| {
            if self.has_props() {
                w.create_element("w:rPr").write_inner_content(|w| {
                    if self.bold {
                        w.create_element("w:b").write_empty()?;
                    }
                    if self.underline {
                        w.create_element("w:u")
                            .with_attribute(("w:val", "single"))
                            .write_empty()?;
                    }
                    if let Some(pt) = self.size_pt {
                        // Word sizes are in half-points
                        let half_points = ((pt * 2.0).round() as u32).to_string();
                        w.create_element("w:sz")
                            .with_attribute(("w:val", half_points.as_str()))
                            .write_empty()?;
                    }
                    Ok(())
                })?;
            }
            w.create_element("w:t")
                .with_attribute(("xml:space", "preserve"))
                .write_text_content(BytesText::new(&self.text))?;
            Ok(())
        })?;
        Ok(())
    }
}

/// A paragraph made of runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    runs: Vec<Run>,
    space_after_pt: Option<f64>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.run(Run::new(text))
    }

    pub fn space_after(mut self, points: f64) -> Self {
        self.space_after_pt = Some(points);
        self
    }

    /// Concatenated text of all runs
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    fn write_xml(&self, w: &mut XmlWriter) -> io::Result<()> {
        w.create_element("w:p").write_inner_content(|w| {
            if let Some(pt) = self.space_after_pt {
                // Spacing is in twentieths of a point
                let twentieths = ((pt * 20.0).round() as u32).to_string();
                w.create_element("w:pPr").write_inner_content(|w| {
                    w.create_element("w:spacing")
                        .with_attribute(("w:after", twentieths.as_str()))
                        .write_empty()?;
                    Ok(())
                })?;
            }
            for run in &self.runs {
                run.write_xml(w)?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

/// A bordered table with a bold header row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn write_xml(&self, w: &mut XmlWriter, text_width_twips: u32) -> io::Result<()> {
        let columns = self.header.len().max(1) as u32;
        let col_width = (text_width_twips / columns).to_string();

        w.create_element("w:tbl").write_inner_content(|w| {
            w.create_element("w:tblPr").write_inner_content(|w| {
                w.create_element("w:tblW")
                    .with_attributes([("w:w", "0"), ("w:type", "auto")])
                    .write_empty()?;
                w.create_element("w:tblBorders").write_inner_content(|w| {
                    for edge in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
                        w.create_element(edge)
                            .with_attributes([
                                ("w:val", "single"),
                                ("w:sz", "4"),
                                ("w:space", "0"),
                                ("w:color", "auto"),
                            ])
                            .write_empty()?;
                    }
                    Ok(())
                })?;
                Ok(())
            })?;

            w.create_element("w:tblGrid").write_inner_content(|w| {
                for _ in 0..columns {
                    w.create_element("w:gridCol")
                        .with_attribute(("w:w", col_width.as_str()))
                        .write_empty()?;
                }
                Ok(())
            })?;

            let header: Vec<Run> = self.header.iter().map(|h| Run::new(h).bold().size(9.0)).collect();
            write_table_row(w, &header, &col_width)?;
            for row in &self.rows {
                let cells: Vec<Run> = row.iter().map(|c| Run::new(c).size(9.0)).collect();
                write_table_row(w, &cells, &col_width)?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

fn write_table_row(w: &mut XmlWriter, cells: &[Run], col_width: &str) -> io::Result<()> {
    w.create_element("w:tr").write_inner_content(|w| {
        for run in cells {
            w.create_element("w:tc").write_inner_content(|w| {
                w.create_element("w:tcPr").write_inner_content(|w| {
                    w.create_element("w:tcW")
                        .with_attributes([("w:w", col_width), ("w:type", "dxa")])
                        .write_empty()?;
                    Ok(())
                })?;
                Paragraph::new().run(run.clone()).write_xml(w)
            })?;
        }
        Ok(())
    })?;
    Ok(())
}

/// An inline picture placed in the body
#[derive(Debug, Clone)]
struct Picture {
    index: usize,
    name: String,
    cx: u64,
    cy: u64,
}

impl Picture {
    fn rel_id(&self) -> String {
        format!("rIdImg{}", self.index)
    }

    fn write_xml(&self, w: &mut XmlWriter) -> io::Result<()> {
        let id = self.index.to_string();
        let cx = self.cx.to_string();
        let cy = self.cy.to_string();
        let rel_id = self.rel_id();
        let doc_name = format!("Picture {}", self.index);

        w.create_element("w:p").write_inner_content(|w| {
            w.create_element("w:r").write_inner_content(|w| {
                w.create_element("w:drawing").write_inner_content(|w| {
                    w.create_element("wp:inline")
                        .with_attributes([("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")])
                        .write_inner_content(|w| {
                            w.create_element("wp:extent")
                                .with_attributes([("cx", cx.as_str()), ("cy", cy.as_str())])
                                .write_empty()?;
                            w.create_element("wp:docPr")
                                .with_attributes([("id", id.as_str()), ("name", doc_name.as_str())])
                                .write_empty()?;
                            w.create_element("a:graphic").write_inner_content(|w| {
                                w.create_element("a:graphicData")
                                    .with_attribute(("uri", PIC_NS))
                                    .write_inner_content(|w| self.write_pic(w, &id, &rel_id, &cx, &cy))?;
                                Ok(())
                            })?;
                            Ok(())
                        })?;
                    Ok(())
                })?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    }

    fn write_pic(&self, w: &mut XmlWriter, id: &str, rel_id: &str, cx: &str, cy: &str) -> io::Result<()> {
        w.create_element("pic:pic").write_inner_content(|w| {
            w.create_element("pic:nvPicPr").write_inner_content(|w| {
                w.create_element("pic:cNvPr")
                    .with_attributes([("id", id), ("name", self.name.as_str())])
                    .write_empty()?;
                w.create_element("pic:cNvPicPr").write_empty()?;
                Ok(())
            })?;
            w.create_element("pic:blipFill").write_inner_content(|w| {
                w.create_element("a:blip")
                    .with_attribute(("r:embed", rel_id))
                    .write_empty()?;
                w.create_element("a:stretch").write_inner_content(|w| {
                    w.create_element("a:fillRect").write_empty()?;
                    Ok(())
                })?;
                Ok(())
            })?;
            w.create_element("pic:spPr").write_inner_content(|w| {
                w.create_element("a:xfrm").write_inner_content(|w| {
                    w.create_element("a:off")
                        .with_attributes([("x", "0"), ("y", "0")])
                        .write_empty()?;
                    w.create_element("a:ext")
                        .with_attributes([("cx", cx), ("cy", cy)])
                        .write_empty()?;
                    Ok(())
                })?;
                w.create_element("a:prstGeom")
                    .with_attribute(("prst", "rect"))
                    .write_inner_content(|w| {
                        w.create_element("a:avLst").write_empty()?;
                        Ok(())
                    })?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum BodyItem {
    Paragraph(Paragraph),
    Table(Table),
    PageBreak,
    Picture(Picture),
}

struct Media {
    part_name: String,
    bytes: Vec<u8>,
}

/// A Word document under construction
pub struct Document {
    title: String,
    body: Vec<BodyItem>,
    media: Vec<Media>,
    paragraphs: Vec<String>,
}

impl Document {
    /// A4 with one-inch margins
    const TEXT_WIDTH_TWIPS: u32 = 11_906 - 2 * TWIPS_PER_INCH;

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: Vec::new(),
            media: Vec::new(),
            paragraphs: Vec::new(),
        }
    }

    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph.plain_text());
        self.body.push(BodyItem::Paragraph(paragraph));
    }

    pub fn add_table(&mut self, table: &Table) {
        self.body.push(BodyItem::Table(table.clone()));
    }

    pub fn add_page_break(&mut self) {
        self.body.push(BodyItem::PageBreak);
    }

    /// Embed a PNG or JPEG image as its own paragraph, scaled to `width_in` inches.
    ///
    /// Fails with [`PlannerError::Image`] when the file is not a readable image;
    /// the document is left unchanged in that case.
    pub fn add_image(&mut self, path: &Path, width_in: f64) -> PlannerResult<()> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !matches!(ext.as_str(), "png" | "jpg" | "jpeg") {
            return Err(PlannerError::Image(format!(
                "Unsupported image type: {}",
                path.display()
            )));
        }

        let (px_w, px_h) = image::image_dimensions(path)
            .map_err(|e| PlannerError::Image(format!("{}: {}", path.display(), e)))?;
        if px_w == 0 || px_h == 0 {
            return Err(PlannerError::Image(format!("{}: empty image", path.display())));
        }
        let bytes = std::fs::read(path)?;

        let index = self.media.len() + 1;
        let cx = (width_in * EMU_PER_INCH).round() as u64;
        let cy = (cx as f64 * f64::from(px_h) / f64::from(px_w)).round() as u64;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.body.push(BodyItem::Picture(Picture { index, name, cx, cy }));
        self.media.push(Media {
            part_name: format!("media/image{}.{}", index, ext),
            bytes,
        });
        Ok(())
    }

    /// Plain text of every paragraph added so far, in order
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn image_count(&self) -> usize {
        self.media.len()
    }

    /// Write the .docx package
    pub fn save(&self, path: &Path) -> PlannerResult<()> {
        let parts = [
            ("[Content_Types].xml", content_types_xml()?),
            ("_rels/.rels", package_rels_xml()?),
            ("docProps/core.xml", core_xml(&self.title)?),
            ("word/document.xml", self.document_xml()?),
            ("word/_rels/document.xml.rels", self.document_rels_xml()?),
        ];

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, xml) in &parts {
            zip.start_file(*name, options)?;
            zip.write_all(xml)?;
        }
        for media in &self.media {
            zip.start_file(format!("word/{}", media.part_name), options)?;
            zip.write_all(&media.bytes)?;
        }

        zip.finish()?;
        Ok(())
    }

    fn document_xml(&self) -> io::Result<Vec<u8>> {
        let mut w = xml_writer()?;
        w.create_element("w:document")
            .with_attributes([
                ("xmlns:w", W_NS),
                ("xmlns:r", R_NS),
                ("xmlns:wp", WP_NS),
                ("xmlns:a", A_NS),
                ("xmlns:pic", PIC_NS),
            ])
            .write_inner_content(|w| {
                w.create_element("w:body").write_inner_content(|w| {
                    for item in &self.body {
                        write_body_item(w, item)?;
                    }
                    write_section_properties(w)
                })?;
                Ok(())
            })?;
        Ok(w.into_inner())
    }

    fn document_rels_xml(&self) -> io::Result<Vec<u8>> {
        let mut w = xml_writer()?;
        w.create_element("Relationships")
            .with_attribute(("xmlns", PKG_RELS_NS))
            .write_inner_content(|w| {
                for (i, media) in self.media.iter().enumerate() {
                    let id = format!("rIdImg{}", i + 1);
                    w.create_element("Relationship")
                        .with_attributes([
                            ("Id", id.as_str()),
                            ("Type", IMAGE_REL),
                            ("Target", media.part_name.as_str()),
                        ])
                        .write_empty()?;
                }
                Ok(())
            })?;
        Ok(w.into_inner())
    }
}

fn write_body_item(w: &mut XmlWriter, item: &BodyItem) -> io::Result<()> {
    match item {
        BodyItem::Paragraph(paragraph) => paragraph.write_xml(w),
        BodyItem::Table(table) => {
            table.write_xml(w, Document::TEXT_WIDTH_TWIPS)?;
            // A table must be followed by a paragraph before a page break
            w.create_element("w:p").write_empty()?;
            Ok(())
        }
        BodyItem::PageBreak => {
            w.create_element("w:p").write_inner_content(|w| {
                w.create_element("w:r").write_inner_content(|w| {
                    w.create_element("w:br")
                        .with_attribute(("w:type", "page"))
                        .write_empty()?;
                    Ok(())
                })?;
                Ok(())
            })?;
            Ok(())
        }
        BodyItem::Picture(picture) => picture.write_xml(w),
    }
}

fn write_section_properties(w: &mut XmlWriter) -> io::Result<()> {
    w.create_element("w:sectPr").write_inner_content(|w| {
        w.create_element("w:pgSz")
            .with_attributes([("w:w", "11906"), ("w:h", "16838")])
            .write_empty()?;
        w.create_element("w:pgMar")
            .with_attributes([
                ("w:top", "1440"),
                ("w:right", "1440"),
                ("w:bottom", "1440"),
                ("w:left", "1440"),
                ("w:header", "708"),
                ("w:footer", "708"),
                ("w:gutter", "0"),
            ])
            .write_empty()?;
        Ok(())
    })?;
    Ok(())
}

/// Writer with the standard XML declaration already emitted
fn xml_writer() -> io::Result<XmlWriter> {
    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(w)
}

fn content_types_xml() -> io::Result<Vec<u8>> {
    let mut w = xml_writer()?;
    w.create_element("Types")
        .with_attribute((
            "xmlns",
            "http://schemas.openxmlformats.org/package/2006/content-types",
        ))
        .write_inner_content(|w| {
            for (ext, content_type) in [
                ("rels", "application/vnd.openxmlformats-package.relationships+xml"),
                ("xml", "application/xml"),
                ("png", "image/png"),
                ("jpg", "image/jpeg"),
                ("jpeg", "image/jpeg"),
            ] {
                w.create_element("Default")
                    .with_attributes([("Extension", ext), ("ContentType", content_type)])
                    .write_empty()?;
            }
            for (part, content_type) in [
                (
                    "/word/document.xml",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
                ),
                (
                    "/docProps/core.xml",
                    "application/vnd.openxmlformats-package.core-properties+xml",
                ),
            ] {
                w.create_element("Override")
                    .with_attributes([("PartName", part), ("ContentType", content_type)])
                    .write_empty()?;
            }
            Ok(())
        })?;
    Ok(w.into_inner())
}

fn package_rels_xml() -> io::Result<Vec<u8>> {
    let mut w = xml_writer()?;
    w.create_element("Relationships")
        .with_attribute(("xmlns", PKG_RELS_NS))
        .write_inner_content(|w| {
            w.create_element("Relationship")
                .with_attributes([
                    ("Id", "rId1"),
                    (
                        "Type",
                        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
                    ),
                    ("Target", "word/document.xml"),
                ])
                .write_empty()?;
            w.create_element("Relationship")
                .with_attributes([
                    ("Id", "rId2"),
                    (
                        "Type",
                        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
                    ),
                    ("Target", "docProps/core.xml"),
                ])
                .write_empty()?;
            Ok(())
        })?;
    Ok(w.into_inner())
}

fn core_xml(title: &str) -> io::Result<Vec<u8>> {
    let created = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let mut w = xml_writer()?;
    w.create_element("cp:coreProperties")
        .with_attributes([
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ])
        .write_inner_content(|w| {
            w.create_element("dc:title")
                .write_text_content(BytesText::new(title))?;
            w.create_element("dc:creator")
                .write_text_content(BytesText::new("rxplan"))?;
            w.create_element("dcterms:created")
                .with_attribute(("xsi:type", "dcterms:W3CDTF"))
                .write_text_content(BytesText::new(&created))?;
            Ok(())
        })?;
    Ok(w.into_inner())
}
