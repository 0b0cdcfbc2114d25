//! Conversation history for cross-turn coreference.
//!
//! Each conversation session owns one [`ConversationHistory`] and passes it
//! `&mut` into every pipeline call. There is deliberately no process-wide
//! store: independent sessions must never see each other's turns.

use crate::core::entity::{EntityMention, EntityType};
use serde::{Deserialize, Serialize};

/// One completed turn: the normalized question and the entities extracted
/// from it.
///
/// Entities are always those of the *pre-split* question, even when the turn
/// produced multiple atomic sub-questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    /// The normalized question as it entered the cascade
    pub question: String,
    /// Entities extracted from the question, in extraction order
    pub entities: Vec<EntityMention>,
}

/// Append-only log of conversation turns.
///
/// Turns are appended in strict chronological order and never mutated or
/// removed. The orchestrator is the single writer (one append per question);
/// the entity extractor reads it for coreference resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationHistory {
    turns: Vec<HistoryTurn>,
}

impl ConversationHistory {
    /// Create an empty history for a new conversation session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed turn.
    pub fn record(&mut self, question: impl Into<String>, entities: Vec<EntityMention>) {
        self.turns.push(HistoryTurn {
            question: question.into(),
            entities,
        });
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[HistoryTurn] {
        &self.turns
    }

    /// Number of recorded turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True if no turn has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Most recent entity of the given type, scanning turns newest-first.
    pub fn last_entity_of_type(&self, kind: EntityType) -> Option<&EntityMention> {
        self.turns
            .iter()
            .rev()
            .flat_map(|turn| turn.entities.iter())
            .find(|e| e.kind == kind)
    }

    /// Most recent entity of any type, scanning turns newest-first.
    pub fn last_entity(&self) -> Option<&EntityMention> {
        self.turns
            .iter()
            .rev()
            .flat_map(|turn| turn.entities.iter())
            .next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drug(id: &str) -> EntityMention {
        EntityMention::new(id, EntityType::Drug)
    }

    #[test]
    fn test_record_appends_in_order() {
        let mut history = ConversationHistory::new();
        assert!(history.is_empty());

        history.record("What is Amlodipine?", vec![drug("Amlodipine")]);
        history.record("What are its targets?", vec![drug("Amlodipine")]);

        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].question, "What is Amlodipine?");
        assert_eq!(history.turns()[1].question, "What are its targets?");
    }

    #[test]
    fn test_last_entity_of_type_prefers_newest_turn() {
        let mut history = ConversationHistory::new();
        history.record("q1?", vec![drug("Amlodipine")]);
        history.record(
            "q2?",
            vec![EntityMention::new("InhA", EntityType::Target), drug("Acarbose")],
        );

        let last_drug = history.last_entity_of_type(EntityType::Drug).unwrap();
        assert_eq!(last_drug.id, "Acarbose");

        let last_target = history.last_entity_of_type(EntityType::Target).unwrap();
        assert_eq!(last_target.id, "InhA");
    }

    #[test]
    fn test_last_entity_of_type_skips_entity_free_turns() {
        let mut history = ConversationHistory::new();
        history.record("q1?", vec![drug("Mefloquine")]);
        history.record("q2?", vec![]);

        assert_eq!(
            history.last_entity_of_type(EntityType::Drug).unwrap().id,
            "Mefloquine"
        );
    }

    #[test]
    fn test_last_entity_any_type() {
        let mut history = ConversationHistory::new();
        assert!(history.last_entity().is_none());

        history.record("q1?", vec![EntityMention::new("DNA gyrase", EntityType::Target)]);
        assert_eq!(history.last_entity().unwrap().id, "DNA gyrase");
    }

    #[test]
    fn test_turns_are_never_dropped() {
        let mut history = ConversationHistory::new();
        for i in 0..50 {
            history.record(format!("q{i}?"), vec![]);
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.turns()[0].question, "q0?");
    }
}
