//! PDF exporter for generated practice material
//!
//! Renders a [`QuestionSet`] into a paginated A4 document in one of two
//! styles: a blank worksheet for students, or an answer key with the correct
//! options marked and optional explanation/tip blocks.
//!
//! ## WASM Compatibility
//!
//! This module is designed to work in both native and WASM environments by
//! returning the PDF as base64-encoded bytes.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::export::ExportError;
use crate::export::layout::{
    self, PAGE_MARGIN, PageCursor, WRAP_SAFETY, add_wrapped_text, wrap_and_measure,
};
use crate::export::surface::{CHECK_MARK, DrawingSurface, FontWeight, PdfSurface, TextAlign};
use crate::models::{AnswerOption, MultiChoiceQuestion, Question, QuestionSet};

/// Title used when the caller supplies none.
const DEFAULT_TITLE: &str = "Practice Quiz";

/// Instruction line printed under the title in worksheet style.
const WORKSHEET_INSTRUCTIONS: &str = "Instructions: Circle the best answer for each question.";

// Font sizes, points.
const TITLE_SIZE: f64 = 18.0;
const SUBTITLE_SIZE: f64 = 12.0;
const INSTRUCTION_SIZE: f64 = 10.0;
const QUESTION_SIZE: f64 = 12.0;
const BODY_SIZE: f64 = 11.0;
const NOTE_SIZE: f64 = 10.0;
const FOOTER_SIZE: f64 = 9.0;

// Vertical rhythm, mm.
const TITLE_OFFSET: f64 = 10.0;
const SUBTITLE_OFFSET: f64 = 8.0;
const SEPARATOR_OFFSET: f64 = 6.0;
const OPTION_GAP: f64 = 2.0;
const QUESTION_GAP: f64 = 6.0;
const NOTE_GAP: f64 = 1.0;
const FOOTER_OFFSET: f64 = 10.0;

/// Reserved before starting a question so its heading is never stranded
/// alone at the bottom of a page.
const QUESTION_BLOCK_MIN: f64 = 28.0;
const NOTE_BLOCK_MIN: f64 = 12.0;

// Horizontal layout, mm from the left margin.
const LABEL_COLUMN: f64 = 6.0;
const OPTION_INDENT: f64 = 12.0;

/// Option text that already starts with its own letter label: optional
/// bracket, a letter, optional separator, required whitespace.
static LABEL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\[(]?([a-z])[)\].:\-–]?\s+").expect("label prefix pattern is valid")
});

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("filename pattern is valid"));

/// Export rendering mode.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ExportStyle {
    /// Blank, unanswered document.
    #[default]
    Worksheet,
    /// Correct options marked, explanations included.
    AnswerKey,
}

impl ExportStyle {
    /// Label embedded in the generated filename.
    pub fn filename_label(&self) -> &'static str {
        match self {
            ExportStyle::Worksheet => "Worksheet",
            ExportStyle::AnswerKey => "AnswerKey",
        }
    }
}

/// Options for one export call.
///
/// A style value outside the two recognized variants is rejected at
/// deserialization time; it cannot reach the composer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    #[serde(default)]
    pub style: ExportStyle,
    /// Document title; `None` falls back to "Practice Quiz".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Render explanation/tip blocks in answer-key mode.
    #[serde(default = "default_true")]
    pub include_explanations: bool,
}

fn default_true() -> bool {
    true
}

// A derived Default would zero `include_explanations`; the documented
// default is a worksheet with explanations enabled.
impl Default for ExportOptions {
    fn default() -> Self {
        Self::worksheet()
    }
}

impl ExportOptions {
    pub fn worksheet() -> Self {
        Self {
            style: ExportStyle::Worksheet,
            title: None,
            include_explanations: true,
        }
    }

    pub fn answer_key() -> Self {
        Self {
            style: ExportStyle::AnswerKey,
            title: None,
            include_explanations: true,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Result of a PDF export operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfExportResult {
    /// PDF content as base64-encoded bytes
    pub pdf_base64: String,
    /// Generated filename
    pub filename: String,
    /// Number of pages
    pub page_count: u32,
    /// Document title
    pub title: String,
}

/// Document composer: turns a question set into a paginated document.
///
/// Each `export` call constructs its own surface and cursor, so independent
/// callers can export concurrently without cross-talk.
pub struct PdfExporter {
    options: ExportOptions,
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

impl PdfExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    fn effective_title(&self) -> &str {
        self.options.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Render the question set into a fresh PDF surface and return the
    /// finished artifact.
    pub fn export(&self, set: &QuestionSet) -> Result<PdfExportResult, ExportError> {
        info!(
            "Exporting {} question(s) as {:?}",
            set.len(),
            self.options.style
        );
        let mut surface = PdfSurface::a4();
        let filename = self.render(&mut surface, set)?;
        let saved = surface.save(&filename)?;
        let page_count = surface.page_count() as u32;
        info!("Export complete: {} ({} page(s))", saved.filename, page_count);

        Ok(PdfExportResult {
            pdf_base64: base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                &saved.bytes,
            ),
            filename: saved.filename,
            page_count,
            title: self.effective_title().to_string(),
        })
    }

    /// Render onto a caller-supplied surface and return the generated
    /// filename. The surface must be freshly constructed; it is left
    /// positioned on its last page.
    pub fn render<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        set: &QuestionSet,
    ) -> Result<String, ExportError> {
        let mut cursor = PageCursor::new();
        self.render_header(surface, &mut cursor)?;

        for (index, question) in set.questions.iter().enumerate() {
            let Question::MultiChoice(mcq) = question else {
                debug!("skipping unsupported question variant: {}", question.id());
                continue;
            };
            self.render_question(surface, &mut cursor, index + 1, mcq)?;
        }

        self.render_footers(surface)?;
        Ok(self.filename())
    }

    fn render_header<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        cursor: &mut PageCursor,
    ) -> Result<(), ExportError> {
        let width = surface.page_width();

        surface.set_font(TITLE_SIZE, FontWeight::Bold);
        surface.draw_text(self.effective_title(), width / 2.0, cursor.y, TextAlign::Center)?;
        cursor.y += TITLE_OFFSET;

        match self.options.style {
            ExportStyle::AnswerKey => {
                surface.set_font(SUBTITLE_SIZE, FontWeight::Bold);
                surface.draw_text("Answer Key", width / 2.0, cursor.y, TextAlign::Center)?;
            }
            ExportStyle::Worksheet => {
                surface.set_font(INSTRUCTION_SIZE, FontWeight::Regular);
                surface.draw_text(WORKSHEET_INSTRUCTIONS, PAGE_MARGIN, cursor.y, TextAlign::Left)?;
            }
        }
        cursor.y += SUBTITLE_OFFSET;

        surface.draw_line(PAGE_MARGIN, cursor.y, width - PAGE_MARGIN, cursor.y, 0.5)?;
        cursor.y += SEPARATOR_OFFSET;
        Ok(())
    }

    fn render_question<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        cursor: &mut PageCursor,
        number: usize,
        question: &MultiChoiceQuestion,
    ) -> Result<(), ExportError> {
        cursor.ensure_space(surface, QUESTION_BLOCK_MIN);

        let content_width = surface.page_width() - 2.0 * PAGE_MARGIN;
        add_wrapped_text(
            surface,
            cursor,
            &format!("Question {}:", number),
            PAGE_MARGIN,
            QUESTION_SIZE,
            content_width,
            true,
        )?;
        add_wrapped_text(
            surface,
            cursor,
            &question.question_text,
            PAGE_MARGIN,
            BODY_SIZE,
            content_width,
            false,
        )?;
        cursor.y += OPTION_GAP;

        for (index, option) in question.options.iter().enumerate() {
            self.render_option(surface, cursor, index, option)?;
        }

        if self.options.style == ExportStyle::AnswerKey && self.options.include_explanations {
            self.render_feedback(surface, cursor, question)?;
        }

        cursor.y += QUESTION_GAP;
        Ok(())
    }

    fn render_option<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        cursor: &mut PageCursor,
        index: usize,
        option: &AnswerOption,
    ) -> Result<(), ExportError> {
        let letter = option_letter(index);
        let pre_labeled = has_label_prefix(&option.text, letter);
        let emphasize = self.options.style == ExportStyle::AnswerKey && option.correct;

        let text_x = if pre_labeled {
            PAGE_MARGIN + LABEL_COLUMN
        } else {
            PAGE_MARGIN + OPTION_INDENT
        };
        let max_width = surface.page_width() - PAGE_MARGIN - text_x;

        // Reserve space for the whole option first so the mark and label
        // land on the same page as the body's first line.
        let (_, height) = wrap_and_measure(surface, &option.text, max_width, BODY_SIZE);
        cursor.ensure_space(surface, height + WRAP_SAFETY);

        let weight = if emphasize {
            FontWeight::Bold
        } else {
            FontWeight::Regular
        };
        if emphasize {
            surface.set_font(BODY_SIZE, FontWeight::Bold);
            surface.draw_text(CHECK_MARK, PAGE_MARGIN, cursor.y, TextAlign::Left)?;
        }
        if !pre_labeled {
            surface.set_font(BODY_SIZE, weight);
            surface.draw_text(
                &format!("{}.", letter),
                PAGE_MARGIN + LABEL_COLUMN,
                cursor.y,
                TextAlign::Left,
            )?;
        }
        add_wrapped_text(
            surface,
            cursor,
            &option.text,
            text_x,
            BODY_SIZE,
            max_width,
            emphasize,
        )?;
        cursor.y += OPTION_GAP;
        Ok(())
    }

    fn render_feedback<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        cursor: &mut PageCursor,
        question: &MultiChoiceQuestion,
    ) -> Result<(), ExportError> {
        let Some(feedback) = question
            .correct_option()
            .and_then(|o| o.tips_and_feedback.as_ref())
        else {
            return Ok(());
        };

        if let Some(explanation) = non_empty(feedback.chosen_feedback.as_deref()) {
            self.render_note(surface, cursor, "Explanation:", explanation)?;
        }
        if let Some(tip) = non_empty(feedback.tip.as_deref()) {
            self.render_note(surface, cursor, "Tip:", tip)?;
        }
        Ok(())
    }

    fn render_note<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        cursor: &mut PageCursor,
        label: &str,
        body: &str,
    ) -> Result<(), ExportError> {
        cursor.ensure_space(surface, NOTE_BLOCK_MIN);
        surface.set_font(NOTE_SIZE, FontWeight::Bold);
        surface.draw_text(label, PAGE_MARGIN + LABEL_COLUMN, cursor.y, TextAlign::Left)?;
        cursor.y += layout::line_height(NOTE_SIZE);

        let x = PAGE_MARGIN + LABEL_COLUMN;
        let max_width = surface.page_width() - PAGE_MARGIN - x;
        add_wrapped_text(surface, cursor, body, x, NOTE_SIZE, max_width, false)?;
        cursor.y += NOTE_GAP;
        Ok(())
    }

    /// Second pass over every produced page: the total is only known once
    /// the question stage has finished.
    fn render_footers<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
    ) -> Result<(), ExportError> {
        let total = surface.page_count();
        let center_x = surface.page_width() / 2.0;
        let footer_y = surface.page_height() - FOOTER_OFFSET;

        for index in 0..total {
            surface.select_page(index)?;
            surface.set_font(FOOTER_SIZE, FontWeight::Regular);
            surface.draw_text(
                &format!("Page {} of {}", index + 1, total),
                center_x,
                footer_y,
                TextAlign::Center,
            )?;
        }
        Ok(())
    }

    /// `<SanitizedTitle>_<StyleLabel>_<YYYY-MM-DD>.pdf`
    fn filename(&self) -> String {
        let sanitized = NON_ALPHANUMERIC.replace_all(self.effective_title(), "_");
        format!(
            "{}_{}_{}.pdf",
            sanitized,
            self.options.style.filename_label(),
            Utc::now().format("%Y-%m-%d")
        )
    }
}

/// Letter assigned to an option strictly by position: 0 → A, 1 → B, …
/// Positions past 'Z' wrap around; the generators cap options far below
/// that.
fn option_letter(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

/// Does the option text already carry the label the engine would print?
///
/// Case-insensitive; only a leading label matching the expected letter
/// counts, so "B) foo" under letter A still gets its own "A." label.
fn has_label_prefix(text: &str, letter: char) -> bool {
    LABEL_PREFIX
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().chars().next())
        .is_some_and(|found| found.eq_ignore_ascii_case(&letter))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
