//! The decomposition orchestrator.
//!
//! One cascade run per input question, stages tried strictly in order with
//! the first qualifying result winning. The cascade itself cannot fail: the
//! worst case is the normalized question returned verbatim as its own single
//! atomic sub-question. Only the external collaborators (parse provider,
//! entity extractor) abort a run.

use crate::core::entity::{EntityExtractor, EntityMention};
use crate::core::history::ConversationHistory;
use crate::core::parse::{DependencyParser, Parse};
use crate::core::{rules, PipelineError};
use crate::llm::LlmSplitter;
use std::sync::Arc;
use tracing::debug;

/// Trim whitespace, strip any run of trailing `?`, and terminate with
/// exactly one `?`. Idempotent.
pub fn normalize_question(question: &str) -> String {
    let mut q = question.trim().trim_end_matches('?').to_string();
    q.push('?');
    q
}

/// Result of decomposing one input question.
///
/// `atomic_questions` always has length >= 1. `entities` are those of the
/// original pre-split question; callers needing per-sub-question entities
/// must re-resolve downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    /// Atomic sub-questions, in order
    pub atomic_questions: Vec<String>,
    /// Entities extracted from the original question
    pub entities: Vec<EntityMention>,
}

/// Sequences entity extraction, the syntactic rules, the classifier-gated
/// model splitter, and the history append into one cascade per question.
pub struct QuestionDecomposer {
    parser: Arc<dyn DependencyParser>,
    extractor: Arc<dyn EntityExtractor>,
    splitter: LlmSplitter,
}

impl QuestionDecomposer {
    /// Assemble a decomposer from its three collaborators.
    pub fn new(
        parser: Arc<dyn DependencyParser>,
        extractor: Arc<dyn EntityExtractor>,
        splitter: LlmSplitter,
    ) -> Self {
        Self {
            parser,
            extractor,
            splitter,
        }
    }

    /// Run the full cascade for one question.
    ///
    /// Exactly one turn is appended to `history` per call, regardless of
    /// which stage fired: the normalized question paired with the entities
    /// of the pre-split question.
    pub fn decompose(
        &self,
        question: &str,
        history: &mut ConversationHistory,
    ) -> Result<Decomposition, PipelineError> {
        let question = normalize_question(question);

        // Entity extraction happens exactly once per input question, against
        // the history snapshot before this turn.
        let entities = self.extractor.extract(&question, history)?;
        let parse = self.parser.parse(&question)?;

        let atomic_questions = self.run_cascade(&parse, &question, &entities);
        debug_assert!(!atomic_questions.is_empty());

        history.record(question, entities.clone());
        Ok(Decomposition {
            atomic_questions,
            entities,
        })
    }

    fn run_cascade(&self, parse: &Parse, question: &str, entities: &[EntityMention]) -> Vec<String> {
        let split = rules::split_conjoined_entities(parse, entities);
        if split.len() >= 2 {
            debug!(rule = "conjoined_entities", parts = split.len(), "question split");
            return split;
        }

        let split = rules::split_conjoined_noun_phrases(parse, question, entities);
        if split.len() >= 2 {
            debug!(rule = "conjoined_noun_phrases", parts = split.len(), "question split");
            return split;
        }

        if rules::is_compound_question(question) {
            debug!(rule = "model_splitter", "compound question, deferring to model");
            return self.splitter.split(question);
        }

        vec![question.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_appends_question_mark() {
        assert_eq!(normalize_question("What is Amlodipine"), "What is Amlodipine?");
    }

    #[test]
    fn test_normalize_collapses_trailing_question_marks() {
        assert_eq!(normalize_question("What is Amlodipine???"), "What is Amlodipine?");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_question("  What is Amlodipine? "), "What is Amlodipine?");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "What is Amlodipine",
            "What is Amlodipine?",
            "  compound, and what else?? ",
            "?",
            "",
        ];
        for input in inputs {
            let once = normalize_question(input);
            let twice = normalize_question(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }
}
