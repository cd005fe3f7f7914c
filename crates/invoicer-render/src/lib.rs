//! # invoicer-render: Document Rendering for Invoicer
//!
//! One canonical [`InvoiceRecord`] in, document bytes out.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Renderer::render(format, record, profile)                              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  InvoiceView::build ── sanitize text ── format amounts ── load logo     │
//! │        │                                                                │
//! │        ├── Pdf  ──► layout_for(style).draw(canvas) ──► lopdf bytes     │
//! │        └── Word ──► WordprocessingML parts ──► zip bytes               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use invoicer_render::{DocumentFormat, Renderer, output_filename};
//!
//! let renderer = Renderer::new(PdfStyle::Classic);
//! let bytes = renderer.render(DocumentFormat::Pdf, &record, &profile)?;
//! let name = output_filename(&profile.name, &record.id, DocumentFormat::Pdf);
//! ```
//!
//! Rendering never touches the stores and never writes files; the caller
//! decides where the bytes go.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod logo;
pub mod pdf;
pub mod sanitize;
pub mod view;
pub mod word;

#[cfg(test)]
mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{RenderError, RenderResult};
pub use pdf::{layout_for, LayoutStrategy};
pub use sanitize::TextPolicy;
pub use view::InvoiceView;

use std::fmt;
use std::str::FromStr;

use invoicer_core::money::{CURRENCY_ASCII, CURRENCY_UNICODE};
use invoicer_core::{BusinessProfile, InvoiceRecord, PdfStyle};
use tracing::info;

/// Output document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Word,
}

impl DocumentFormat {
    /// File extension including the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => ".pdf",
            DocumentFormat::Word => ".docx",
        }
    }

    pub fn text_policy(&self) -> TextPolicy {
        match self {
            DocumentFormat::Pdf => TextPolicy::PdfAscii,
            DocumentFormat::Word => TextPolicy::WordXml,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => f.write_str("pdf"),
            DocumentFormat::Word => f.write_str("word"),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "word" | "docx" => Ok(DocumentFormat::Word),
            other => Err(format!("unknown format '{}' (expected pdf or word)", other)),
        }
    }
}

/// Renders invoices with a fixed PDF style and currency labels.
#[derive(Debug, Clone)]
pub struct Renderer {
    pdf_style: PdfStyle,
    pdf_currency: String,
    word_currency: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new(PdfStyle::default())
    }
}

impl Renderer {
    pub fn new(pdf_style: PdfStyle) -> Self {
        Renderer {
            pdf_style,
            pdf_currency: CURRENCY_ASCII.to_string(),
            word_currency: CURRENCY_UNICODE.to_string(),
        }
    }

    /// Overrides the PDF currency label. Non-ASCII labels are sanitized
    /// like any other PDF text.
    pub fn with_pdf_currency(mut self, label: impl Into<String>) -> Self {
        self.pdf_currency = label.into();
        self
    }

    pub fn pdf_style(&self) -> PdfStyle {
        self.pdf_style
    }

    pub fn pdf_currency(&self) -> &str {
        &self.pdf_currency
    }

    /// Produces the document bytes. Same inputs, same bytes.
    pub fn render(
        &self,
        format: DocumentFormat,
        record: &InvoiceRecord,
        profile: &BusinessProfile,
    ) -> RenderResult<Vec<u8>> {
        let currency = match format {
            DocumentFormat::Pdf => format.text_policy().apply(&self.pdf_currency),
            DocumentFormat::Word => self.word_currency.clone(),
        };
        let view = InvoiceView::build(record, profile, format.text_policy(), &currency);

        let bytes = match format {
            DocumentFormat::Pdf => pdf::render_pdf(&view, layout_for(self.pdf_style).as_ref())?,
            DocumentFormat::Word => word::render_docx(&view)?,
        };

        info!(
            invoice_id = %record.id,
            profile_id = %profile.id,
            %format,
            style = %self.pdf_style,
            bytes = bytes.len(),
            "Rendered invoice"
        );
        Ok(bytes)
    }
}

/// `{BusinessName without spaces}_Inv{invoice id}{extension}`
///
/// ## Example
/// ```rust
/// use invoicer_render::{output_filename, DocumentFormat};
///
/// assert_eq!(
///     output_filename("Tech Solutions Inc.", "1001", DocumentFormat::Pdf),
///     "TechSolutionsInc._Inv1001.pdf"
/// );
/// ```
pub fn output_filename(business_name: &str, invoice_id: &str, format: DocumentFormat) -> String {
    let name: String = business_name.chars().filter(|c| !c.is_whitespace()).collect();
    format!("{}_Inv{}{}", name, invoice_id, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_profile, sample_record, widget_record};
    use std::fs;
    use tempfile::TempDir;

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle.as_bytes())
    }

    #[test]
    fn test_every_style_renders_deterministically() {
        for style in PdfStyle::ALL {
            let renderer = Renderer::new(style);
            let first = renderer.render(DocumentFormat::Pdf, &sample_record(), &sample_profile()).unwrap();
            let second = renderer.render(DocumentFormat::Pdf, &sample_record(), &sample_profile()).unwrap();
            assert!(first.starts_with(b"%PDF-"), "{style}");
            assert_eq!(first, second, "{style} output differs between runs");
        }
    }

    #[test]
    fn test_grand_total_rendered_to_two_decimals() {
        let bytes = Renderer::default()
            .render(DocumentFormat::Pdf, &widget_record(), &sample_profile())
            .unwrap();
        assert!(contains(&bytes, "(Rs. 2.36)"));
        assert!(!contains(&bytes, "2.3625"));
    }

    #[test]
    fn test_no_quantity_column_without_quantities() {
        let mut record = sample_record();
        record.items.retain(|item| item.quantity.is_none());
        for style in PdfStyle::ALL {
            let bytes = Renderer::new(style).render(DocumentFormat::Pdf, &record, &sample_profile()).unwrap();
            assert!(!contains(&bytes, "(Quantity)"), "{style}");
            assert!(!contains(&bytes, "(QUANTITY)"), "{style}");
        }
    }

    #[test]
    fn test_pdf_text_is_ascii_sanitized() {
        let mut record = sample_record();
        record.client.name = "Café Ünïcode".to_string();
        let bytes = Renderer::default().render(DocumentFormat::Pdf, &record, &sample_profile()).unwrap();
        assert!(contains(&bytes, "Caf? ?n?code"));
    }

    #[test]
    fn test_optional_fields_omitted() {
        let mut record = sample_record();
        record.client.phone = None;
        record.notes = None;
        record.pending = false;
        record.due_date = None;
        let mut profile = sample_profile();
        profile.gst_number = None;
        let bytes = Renderer::default().render(DocumentFormat::Pdf, &record, &profile).unwrap();
        assert!(!contains(&bytes, "Phone:"));
        assert!(!contains(&bytes, "GST No:"));
        assert!(!contains(&bytes, "Notes:"));
        assert!(!contains(&bytes, "PENDING"));
        assert!(!contains(&bytes, "Due:"));
    }

    #[test]
    fn test_missing_logo_still_renders() {
        let dir = TempDir::new().unwrap();
        let mut profile = sample_profile();
        profile.logo_path = Some(dir.path().join("gone.png").to_string_lossy().into_owned());
        let bytes = Renderer::default().render(DocumentFormat::Pdf, &sample_record(), &profile).unwrap();
        assert!(!contains(&bytes, "/Im1"));

        let garbage = dir.path().join("bad.png");
        fs::write(&garbage, b"junk").unwrap();
        profile.logo_path = Some(garbage.to_string_lossy().into_owned());
        let bytes = Renderer::default().render(DocumentFormat::Word, &sample_record(), &profile).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_word_renders_zip() {
        let bytes = Renderer::default().render(DocumentFormat::Word, &sample_record(), &sample_profile()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(
            output_filename("Green Earth Gardens", "2001", DocumentFormat::Word),
            "GreenEarthGardens_Inv2001.docx"
        );
        assert_eq!(output_filename("Solo", "7", DocumentFormat::Pdf), "Solo_Inv7.pdf");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("PDF".parse::<DocumentFormat>(), Ok(DocumentFormat::Pdf));
        assert_eq!("docx".parse::<DocumentFormat>(), Ok(DocumentFormat::Word));
        assert!("rtf".parse::<DocumentFormat>().is_err());
    }
}
