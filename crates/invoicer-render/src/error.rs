//! # Render Error Types
//!
//! Only failures that leave no usable document surface here. A logo that
//! cannot be read or decoded is not an error: it is logged and left out.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Building or serializing the PDF object tree failed.
    ///
    /// ## When This Occurs
    /// - Content stream encoding failed
    /// - Writing the document buffer failed
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Writing the .docx zip container failed.
    #[error("Word error: {0}")]
    Docx(#[from] zip::result::ZipError),

    /// Writing into an in-memory buffer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
