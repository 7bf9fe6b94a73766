//! Quiz Export SDK - Shared library for rendering generated practice material
//!
//! Provides the printable-document side of the tutoring platform:
//! - Question models matching the practice-material generator payloads
//! - A paginated PDF exporter with worksheet and answer-key styles
//! - A drawing-surface abstraction so rendering backends can be swapped
//!
//! The exporter consumes a finished in-memory [`QuestionSet`] and produces a
//! finished multi-page artifact; it performs no network or storage access of
//! its own.

pub mod export;
pub mod models;

// Re-export commonly used types
pub use export::{
    DrawingSurface, ExportError, ExportOptions, ExportStyle, FontWeight, PdfExportResult,
    PdfExporter, PdfSurface, SavedDocument, TextAlign,
};

// Re-export models
pub use models::{
    AnswerOption, FlashcardQuestion, MultiChoiceQuestion, Question, QuestionSet,
    ShortAnswerQuestion, TipsAndFeedback,
};
