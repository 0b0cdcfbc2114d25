//! Entity mentions and the extraction seam.
//!
//! The cascade never does entity recognition itself; it consumes typed
//! mentions through the [`EntityExtractor`] trait. [`LexiconExtractor`] is a
//! deterministic implementation backed by a term lexicon, with conversation
//! history as the coreference fallback. NER-backed extractors plug into the
//! same trait.

use crate::core::history::ConversationHistory;
use crate::core::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Domain type of a recognized entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    /// A drug or chemical compound
    Drug,
    /// A molecular target (protein, enzyme)
    Target,
    /// A biological pathway
    Pathway,
    /// A disease or condition
    Disease,
    /// Nothing recognizable was found
    Unknown,
}

/// A recognized domain entity: canonical identifier plus type.
///
/// Immutable once produced. The split rules compare the `id` against token
/// surface text *exactly*, so extractors should emit the surface/canonical
/// form as it appears in the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMention {
    /// Canonical identifier (surface form)
    pub id: String,
    /// Domain type
    #[serde(rename = "type")]
    pub kind: EntityType,
}

impl EntityMention {
    /// Create a new mention.
    pub fn new(id: impl Into<String>, kind: EntityType) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// The sentinel mention recorded when nothing was recognized.
    pub fn unknown() -> Self {
        Self::new("unknown", EntityType::Unknown)
    }
}

/// Extraction seam consumed by the orchestrator.
///
/// Called exactly once per input question, with the full history so far as a
/// read-only snapshot. Failure is fatal for the current question.
pub trait EntityExtractor: Send + Sync {
    /// Extract typed entity mentions from `question`.
    fn extract(
        &self,
        question: &str,
        history: &ConversationHistory,
    ) -> Result<Vec<EntityMention>, PipelineError>;
}

/// Generic terms that look like entities but carry question intent instead.
const KEYWORD_BLACKLIST: &[&str] = &[
    "target",
    "targets",
    "pathway",
    "pathways",
    "gene",
    "genes",
    "protein",
    "proteins",
    "mechanism",
    "mechanisms",
    "mic",
    "indication",
    "indications",
];

/// Lexicon-backed entity extractor.
///
/// Matches a fixed list of typed terms against the question using normalized
/// word-boundary search. When the question mentions nothing from the lexicon
/// directly (pronoun turns like "What are its targets?"), the most recent
/// entity from history is inherited: drugs first, then any type. A question
/// that matches nothing at all yields the single `unknown` sentinel, so the
/// result is never empty.
#[derive(Debug, Clone)]
pub struct LexiconExtractor {
    lexicon: Vec<EntityMention>,
    blacklist: HashSet<String>,
}

impl LexiconExtractor {
    /// Create an extractor over the given typed term lexicon.
    pub fn new(lexicon: Vec<EntityMention>) -> Self {
        Self {
            lexicon,
            blacklist: KEYWORD_BLACKLIST.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the default keyword blacklist.
    pub fn with_blacklist(mut self, terms: impl IntoIterator<Item = String>) -> Self {
        self.blacklist = terms.into_iter().map(|t| normalize_term(&t)).collect();
        self
    }
}

impl EntityExtractor for LexiconExtractor {
    fn extract(
        &self,
        question: &str,
        history: &ConversationHistory,
    ) -> Result<Vec<EntityMention>, PipelineError> {
        let query_norm = normalize_term(question);

        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for entry in &self.lexicon {
            let key = normalize_term(&entry.id);
            if key.is_empty() || self.blacklist.contains(&key) {
                continue;
            }
            if word_boundary_match(&query_norm, &key) && seen.insert(key) {
                found.push(entry.clone());
            }
        }

        // Coreference: a turn with no direct mention inherits the most
        // recent entity, preferring drugs.
        if found.is_empty() {
            if let Some(inherited) = history
                .last_entity_of_type(EntityType::Drug)
                .or_else(|| history.last_entity())
            {
                found.push(inherited.clone());
            }
        }

        if found.is_empty() {
            found.push(EntityMention::unknown());
        }

        Ok(found)
    }
}

/// Normalize a term for matching: collapse whitespace, lowercase, and strip
/// a naive trailing plural `s` from terms longer than three characters.
fn normalize_term(s: &str) -> String {
    let mut out = s
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if out.len() > 3 && out.ends_with('s') {
        out.pop();
    }
    out
}

/// True if `needle` occurs in `haystack` delimited by non-alphanumeric
/// characters (or string edges) on both sides. Both inputs are expected to
/// be normalized already.
fn word_boundary_match(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let start = from + pos;
        let end = start + needle.len();
        let open = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let close = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if open && close {
            return true;
        }
        // Advance by one full character so the next slice stays on a
        // char boundary even for non-ASCII needles.
        let step = haystack[start..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        from = start + step;
    }
    false
}
