//! # Text Sanitization
//!
//! Each output format supports a different character set:
//!
//! ```text
//! ┌──────────────┬───────────────────────────────────────────────────────┐
//! │ PdfAscii     │ printable ASCII only; anything else becomes '?'       │
//! │              │ (base-14 fonts, WinAnsi encoding)                     │
//! ├──────────────┼───────────────────────────────────────────────────────┤
//! │ WordXml      │ Unicode kept; XML-illegal control chars dropped,      │
//! │              │ markup characters escaped when written                │
//! └──────────────┴───────────────────────────────────────────────────────┘
//! ```

/// Character-set rule applied to every text field before layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPolicy {
    PdfAscii,
    WordXml,
}

impl TextPolicy {
    pub fn apply(&self, text: &str) -> String {
        match self {
            TextPolicy::PdfAscii => to_printable_ascii(text),
            TextPolicy::WordXml => strip_xml_illegal(text),
        }
    }
}

/// Replaces every character outside printable ASCII with `?`.
/// Tabs and newlines are kept as layout separators.
pub fn to_printable_ascii(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\n' => c,
            '\t' => ' ',
            _ => '?',
        })
        .collect()
}

/// Drops characters that XML 1.0 cannot represent: control characters
/// other than tab and newline, and the noncharacters U+FFFE and U+FFFF.
/// Surrogates never occur in a Rust `str`.
pub fn strip_xml_illegal(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .filter(|c| !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
        .collect()
}

/// Escapes the five XML markup characters.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
