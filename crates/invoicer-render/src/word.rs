//! # Word (.docx) Rendering
//!
//! A .docx file is a zip of WordprocessingML parts. Only the parts needed
//! for one invoice are written:
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! word/document.xml
//! word/_rels/document.xml.rels
//! word/media/logo.jpeg          (only when a logo is present)
//! ```
//!
//! Entries are written in that fixed order with a fixed 1980-01-01
//! timestamp, so the same invoice always zips to the same bytes.

use std::io::{Cursor, Write};

use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::RenderResult;
use crate::logo::Logo;
use crate::sanitize::escape_xml;
use crate::view::InvoiceView;

const EMU_PER_INCH: u64 = 914_400;
const LOGO_WIDTH_EMU: u64 = EMU_PER_INCH * 3 / 2;
const LOGO_REL_ID: &str = "rIdLogo";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="jpeg" ContentType="image/jpeg"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

// =============================================================================
// Runs and paragraphs
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
struct RunStyle {
    bold: bool,
    italic: bool,
    /// Half-points, as Word stores them.
    size: Option<u32>,
    color: Option<&'static str>,
}

impl RunStyle {
    const PLAIN: RunStyle = RunStyle { bold: false, italic: false, size: None, color: None };

    fn bold(size_pt: u32) -> Self {
        RunStyle { bold: true, size: Some(size_pt * 2), ..Self::PLAIN }
    }
}

/// One run; embedded newlines become `<w:br/>`.
fn run(text: &str, style: RunStyle) -> String {
    let mut props = String::new();
    if style.bold {
        props.push_str("<w:b/>");
    }
    if style.italic {
        props.push_str("<w:i/>");
    }
    if let Some(color) = style.color {
        props.push_str(&format!(r#"<w:color w:val="{}"/>"#, color));
    }
    if let Some(size) = style.size {
        props.push_str(&format!(r#"<w:sz w:val="{}"/>"#, size));
    }

    let body = text
        .split('\n')
        .map(|line| format!(r#"<w:t xml:space="preserve">{}</w:t>"#, escape_xml(line)))
        .collect::<Vec<_>>()
        .join("<w:br/>");

    if props.is_empty() {
        format!("<w:r>{}</w:r>", body)
    } else {
        format!("<w:r><w:rPr>{}</w:rPr>{}</w:r>", props, body)
    }
}

fn paragraph(runs: &str, align: Option<&str>) -> String {
    match align {
        Some(jc) => format!(r#"<w:p><w:pPr><w:jc w:val="{}"/></w:pPr>{}</w:p>"#, jc, runs),
        None => format!("<w:p>{}</w:p>", runs),
    }
}

fn cell(content: &str, width_twips: u32) -> String {
    format!(
        r#"<w:tc><w:tcPr><w:tcW w:w="{}" w:type="dxa"/></w:tcPr>{}</w:tc>"#,
        width_twips, content
    )
}

fn text_cell(text: &str, width_twips: u32, style: RunStyle, align: Option<&str>) -> String {
    cell(&paragraph(&run(text, style), align), width_twips)
}

fn table(rows: &[String], widths: &[u32], borders: bool) -> String {
    let grid: String = widths
        .iter()
        .map(|w| format!(r#"<w:gridCol w:w="{}"/>"#, w))
        .collect();
    let borders = if borders {
        let edge = |name: &str| format!(r#"<w:{} w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#, name);
        format!(
            "<w:tblBorders>{}{}{}{}{}{}</w:tblBorders>",
            edge("top"),
            edge("left"),
            edge("bottom"),
            edge("right"),
            edge("insideH"),
            edge("insideV")
        )
    } else {
        String::new()
    };
    format!(
        r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/>{}</w:tblPr><w:tblGrid>{}</w:tblGrid>{}</w:tbl>"#,
        borders,
        grid,
        rows.concat()
    )
}

fn row(cells: &[String]) -> String {
    format!("<w:tr>{}</w:tr>", cells.concat())
}

fn inline_image(logo: &Logo) -> String {
    let cy = LOGO_WIDTH_EMU * logo.height as u64 / logo.width as u64;
    format!(
        concat!(
            r#"<w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/><wp:docPr id="1" name="Logo"/>"#,
            r#"<a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#,
            r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:nvPicPr><pic:cNvPr id="0" name="logo.jpeg"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#
        ),
        cx = LOGO_WIDTH_EMU,
        cy = cy,
        rel = LOGO_REL_ID
    )
}

// =============================================================================
// Document
// =============================================================================

fn document_xml(view: &InvoiceView) -> String {
    let mut body = String::new();

    // Letterhead: logo | business block
    let logo = view
        .logo
        .as_ref()
        .map(|logo| paragraph(&inline_image(logo), None))
        .unwrap_or_else(|| paragraph("", None));
    let mut business = run(&format!("{}\n", view.business.name), RunStyle::bold(16));
    let mut contact: Vec<String> = [&view.business.address, &view.business.email, &view.business.phone]
        .into_iter()
        .flatten()
        .cloned()
        .collect();
    if let Some(gst) = &view.business.gst_number {
        contact.push(format!("GST No: {}", gst));
    }
    business.push_str(&run(&contact.join("\n"), RunStyle::PLAIN));
    body.push_str(&table(
        &[row(&[cell(&logo, 2880), cell(&paragraph(&business, Some("right")), 5760)])],
        &[2880, 5760],
        false,
    ));

    body.push_str(&paragraph(&run("INVOICE", RunStyle::bold(28)), None));

    let mut info = vec![format!("Invoice #: {}", view.invoice_id), format!("Date: {}", view.issue_date)];
    if let Some(due) = &view.due_date {
        info.push(format!("Due: {}", due));
    }
    body.push_str(&paragraph(&run(&info.join("\n"), RunStyle::PLAIN), None));
    if view.pending {
        let marker = RunStyle { color: Some("FF0000"), ..RunStyle::bold(11) };
        body.push_str(&paragraph(&run("PENDING", marker), None));
    }

    body.push_str(&paragraph(&run("Bill To:", RunStyle::bold(13)), None));
    body.push_str(&paragraph(&run(&view.client_lines().join("\n"), RunStyle::PLAIN), None));

    // Items
    let widths: Vec<u32> = if view.show_quantity {
        vec![4320, 2160, 2160]
    } else {
        vec![6480, 2160]
    };
    let header = RunStyle::bold(11);
    let mut rows = Vec::new();
    let mut head = vec![text_cell("Description", widths[0], header, None)];
    if view.show_quantity {
        head.push(text_cell("Quantity", widths[1], header, Some("center")));
    }
    head.push(text_cell("Amount", widths[widths.len() - 1], header, Some("right")));
    rows.push(row(&head));

    for item in &view.rows {
        let mut cells = vec![text_cell(&item.description, widths[0], RunStyle::PLAIN, None)];
        if view.show_quantity {
            let quantity = item.quantity.as_deref().unwrap_or("");
            cells.push(text_cell(quantity, widths[1], RunStyle::PLAIN, Some("center")));
        }
        cells.push(text_cell(&view.money(&item.amount), widths[widths.len() - 1], RunStyle::PLAIN, Some("right")));
        rows.push(row(&cells));
    }

    for line in [&view.subtotal, &view.discount, &view.tax] {
        let mut cells = vec![text_cell(&line.label, widths[0], RunStyle::PLAIN, None)];
        if view.show_quantity {
            cells.push(text_cell("", widths[1], RunStyle::PLAIN, None));
        }
        cells.push(text_cell(&view.money(&line.amount), widths[widths.len() - 1], RunStyle::PLAIN, Some("right")));
        rows.push(row(&cells));
    }
    body.push_str(&table(&rows, &widths, true));

    let total = format!("TOTAL: {}", view.money(&view.grand_total.amount));
    body.push_str(&paragraph(&run(&total, RunStyle::bold(14)), Some("right")));

    if let Some(notes) = &view.notes {
        body.push_str(&paragraph(&run(&format!("Notes: {}", notes), RunStyle::PLAIN), None));
    }
    if let Some(watermark) = &view.business.watermark {
        let faint = RunStyle { italic: true, size: Some(20), color: Some("969696"), ..RunStyle::PLAIN };
        body.push_str(&paragraph(&run(watermark, faint), Some("center")));
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#,
            r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#,
            r#" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing">"#,
            "<w:body>{}<w:sectPr><w:pgSz w:w=\"11906\" w:h=\"16838\"/>",
            r#"<w:pgMar w:top="1134" w:right="1134" w:bottom="1134" w:left="1134" w:header="0" w:footer="0" w:gutter="0"/>"#,
            "</w:sectPr></w:body></w:document>"
        ),
        body
    )
}

fn document_rels(has_logo: bool) -> String {
    let logo = if has_logo {
        format!(
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/logo.jpeg"/>"#,
            LOGO_REL_ID
        )
    } else {
        String::new()
    };
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#
        ),
        logo
    )
}

/// Packs `view` into .docx bytes.
pub fn render_docx(view: &InvoiceView) -> RenderResult<Vec<u8>> {
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(PACKAGE_RELS.as_bytes())?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(document_xml(view).as_bytes())?;

    zip.start_file("word/_rels/document.xml.rels", options)?;
    zip.write_all(document_rels(view.logo.is_some()).as_bytes())?;

    if let Some(logo) = &view.logo {
        let stored = options.compression_method(CompressionMethod::Stored);
        zip.start_file("word/media/logo.jpeg", stored)?;
        zip.write_all(&logo.jpeg)?;
    }

    let bytes = zip.finish()?.into_inner();
    debug!(bytes = bytes.len(), logo = view.logo.is_some(), "Assembled docx");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::TextPolicy;
    use crate::test_support::{sample_profile, widget_record};
    use invoicer_core::money::CURRENCY_UNICODE;
    use std::io::Read;
    use zip::ZipArchive;

    fn word_view() -> InvoiceView {
        InvoiceView::build(&widget_record(), &sample_profile(), TextPolicy::WordXml, CURRENCY_UNICODE)
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut text = String::new();
        part.read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn test_docx_parts() {
        let bytes = render_docx(&word_view()).unwrap();
        let archive = ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for part in ["[Content_Types].xml", "_rels/.rels", "word/document.xml", "word/_rels/document.xml.rels"] {
            assert!(names.contains(&part), "missing {part}");
        }
        assert!(!names.contains(&"word/media/logo.jpeg"));
    }

    #[test]
    fn test_docx_content() {
        let bytes = render_docx(&word_view()).unwrap();
        let xml = read_part(&bytes, "word/document.xml");
        assert!(xml.contains("Invoice #: 1000"));
        assert!(xml.contains("Due: 15-02-2026"));
        assert!(xml.contains(">PENDING<"));
        assert!(xml.contains("1/4 Kg"));
        assert!(xml.contains("TOTAL: ₹ 2.36"));
        assert!(xml.contains("Discount (10%)"));
        assert!(xml.contains("Thank you for your business"));
    }

    #[test]
    fn test_docx_escapes_markup() {
        let mut view = word_view();
        view.client.name = "Smith & <Sons>".to_string();
        let xml = read_part(&render_docx(&view).unwrap(), "word/document.xml");
        assert!(xml.contains("Smith &amp; &lt;Sons&gt;"));
    }

    #[test]
    fn test_docx_is_deterministic() {
        assert_eq!(render_docx(&word_view()).unwrap(), render_docx(&word_view()).unwrap());
    }

    #[test]
    fn test_docx_embeds_logo() {
        let mut view = word_view();
        view.logo = Some(Logo { jpeg: vec![0xFF, 0xD8, 0xFF, 0xD9], width: 4, height: 2 });
        let bytes = render_docx(&view).unwrap();
        let rels = read_part(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains("media/logo.jpeg"));
        let xml = read_part(&bytes, "word/document.xml");
        assert!(xml.contains(r#"cx="1371600" cy="685800""#));
    }
}
