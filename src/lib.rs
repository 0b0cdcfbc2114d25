//! Atomic question decomposition for biomedical knowledge-graph Q&A.
//!
//! Compound questions ("What are the targets of Amlodipine and Acarbose?")
//! are split into self-contained atomic sub-questions so each one can be
//! retrieved and answered independently. Splitting runs as a cascade of
//! cheap syntactic rules with a model-backed splitter as the last resort:
//!
//! ```text
//! question
//!     ↓ normalize
//! EntityExtractor (reads ConversationHistory)
//!     ↓
//! conjoined-entity rule ──▶ 2 questions? done
//!     ↓ no
//! conjoined-noun-phrase rule ──▶ 2 questions? done
//!     ↓ no
//! compound classifier ──▶ true? LlmSplitter (never fails, never empty)
//!     ↓ false
//! [question] unchanged
//!     ↓
//! append (question, entities) to ConversationHistory
//! ```
//!
//! The dependency parse, entity extraction, and model completion are all
//! narrow trait seams, so the cascade is testable with deterministic doubles
//! and any concrete NLP/LLM backend can be plugged in.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use atomize::core::{
//!     ConversationHistory, EntityMention, EntityType, LexiconExtractor, NullParser,
//!     QuestionDecomposer,
//! };
//! use atomize::llm::{LlmSplitter, MockCompletionClient};
//!
//! let lexicon = vec![EntityMention::new("Amlodipine", EntityType::Drug)];
//! let splitter = LlmSplitter::new(Arc::new(MockCompletionClient::constant("[]")));
//! let decomposer = QuestionDecomposer::new(
//!     Arc::new(NullParser),
//!     Arc::new(LexiconExtractor::new(lexicon)),
//!     splitter,
//! );
//!
//! let mut history = ConversationHistory::new();
//! let result = decomposer.decompose("What is Amlodipine", &mut history).unwrap();
//! assert_eq!(result.atomic_questions, vec!["What is Amlodipine?"]);
//! ```

pub mod batch;
pub mod config;
pub mod core;
pub mod llm;

// Re-export commonly used items at crate root
pub use crate::core::{
    normalize_question, ConversationHistory, Decomposition, EntityMention, EntityType,
    HistoryTurn, PipelineError, QuestionDecomposer,
};
pub use crate::llm::LlmSplitter;
