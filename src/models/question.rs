//! Question models for generated practice material
//!
//! Mirrors the JSON emitted by the practice-material generators, so a
//! generator payload deserializes directly into a [`QuestionSet`].
//!
//! ## Example
//!
//! ```json
//! {
//!   "questions": [
//!     {
//!       "type": "multiChoice",
//!       "id": "q1",
//!       "questionText": "What is the derivative of x^2?",
//!       "options": [
//!         {"text": "2x", "correct": true, "tipsAndFeedback": {"tip": "Power rule"}},
//!         {"text": "x", "correct": false}
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Ordered collection of questions supplied to an export call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Parse a generator JSON payload.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }
}

/// A single generated question.
///
/// Tagged by the `type` field of the generator payload. Only the
/// `multiChoice` variant is rendered by the PDF exporter; the other
/// variants are produced by their own generators and are skipped during
/// PDF layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Question {
    MultiChoice(MultiChoiceQuestion),
    ShortAnswer(ShortAnswerQuestion),
    Flashcard(FlashcardQuestion),
}

impl Question {
    /// Stable identifier assigned by the generator.
    pub fn id(&self) -> &str {
        match self {
            Question::MultiChoice(q) => &q.id,
            Question::ShortAnswer(q) => &q.id,
            Question::Flashcard(q) => &q.id,
        }
    }
}

/// Multiple-choice question: one prompt, an ordered list of options,
/// nominally exactly one of them correct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultiChoiceQuestion {
    pub id: String,
    pub question_text: String,
    pub options: Vec<AnswerOption>,
}

impl MultiChoiceQuestion {
    pub fn new(
        id: impl Into<String>,
        question_text: impl Into<String>,
        options: Vec<AnswerOption>,
    ) -> Self {
        Self {
            id: id.into(),
            question_text: question_text.into(),
            options,
        }
    }

    /// First option flagged correct, if any.
    ///
    /// The generator promises exactly one correct option per question but
    /// the exporter does not validate that; duplicates resolve to the
    /// first match and a missing flag resolves to `None`.
    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.correct)
    }
}

/// Short-answer question (free-text response; not rendered by the PDF
/// exporter).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShortAnswerQuestion {
    pub id: String,
    pub question_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
}

/// Flashcard (front/back pair; not rendered by the PDF exporter).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardQuestion {
    pub id: String,
    pub front: String,
    pub back: String,
}

/// One selectable option of a multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub text: String,
    #[serde(default)]
    pub correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips_and_feedback: Option<TipsAndFeedback>,
}

impl AnswerOption {
    pub fn new(text: impl Into<String>, correct: bool) -> Self {
        Self {
            text: text.into(),
            correct,
            tips_and_feedback: None,
        }
    }

    pub fn with_feedback(mut self, feedback: TipsAndFeedback) -> Self {
        self.tips_and_feedback = Some(feedback);
        self
    }
}

/// Per-option feedback block (H5P field names).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TipsAndFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen_feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_chosen_feedback: Option<String>,
}
