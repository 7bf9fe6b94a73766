//! Models module for the SDK
//!
//! Defines the question data structures consumed by the export side.
//! These mirror the practice-material generator payloads.

pub mod question;

pub use question::{
    AnswerOption, FlashcardQuestion, MultiChoiceQuestion, Question, QuestionSet,
    ShortAnswerQuestion, TipsAndFeedback,
};
