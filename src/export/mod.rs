//! Export functionality
//!
//! Renders an in-memory [`crate::models::QuestionSet`] into a paginated,
//! printable PDF. Split into:
//! - [`surface`] — drawing-surface capability trait + the PDF backend
//! - [`layout`] — page geometry, the pagination cursor, wrapped-text layout
//! - [`pdf`] — the document composer and export options

pub mod layout;
pub mod pdf;
pub mod surface;

/// Error during export
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ExportError {
    #[error("Drawing error: {0}")]
    Drawing(String),
    #[error("Invalid page index {index}: document has {count} pages")]
    PageOutOfBounds { index: usize, count: usize },
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

// Re-export for convenience
pub use pdf::{ExportOptions, ExportStyle, PdfExportResult, PdfExporter};
pub use surface::{DrawingSurface, FontWeight, PdfSurface, SavedDocument, TextAlign};
