//! Decomposition core: data model, syntactic split rules, and the cascade
//! orchestrator.
//!
//! Everything here is synchronous and deterministic except the last cascade
//! stage, which calls out to a model completion service through the
//! [`crate::llm`] seam.

pub mod entity;
pub mod history;
pub mod parse;
pub mod pipeline;
pub mod rules;

pub use entity::{EntityExtractor, EntityMention, EntityType, LexiconExtractor};
pub use history::{ConversationHistory, HistoryTurn};
pub use parse::{DepRelation, DependencyParser, NullParser, Parse, PosTag, Token};
pub use pipeline::{normalize_question, Decomposition, QuestionDecomposer};
pub use rules::{is_compound_question, split_conjoined_entities, split_conjoined_noun_phrases};

/// Errors that can abort decomposition of a single question.
///
/// Only the external collaborators fail hard: a broken dependency parse or a
/// failed entity extraction means the current question cannot proceed.
/// Malformed model output is *not* an error at this level; the model-backed
/// splitter recovers from it locally (see [`crate::llm::LlmSplitter`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The dependency parse provider failed on the question text
    Parse {
        /// Provider-reported failure detail
        message: String,
    },
    /// The entity extractor failed on the question text
    Extraction {
        /// Extractor-reported failure detail
        message: String,
    },
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse { message } => write!(f, "dependency parse failed: {}", message),
            Self::Extraction { message } => write!(f, "entity extraction failed: {}", message),
        }
    }
}

impl std::error::Error for PipelineError {}
