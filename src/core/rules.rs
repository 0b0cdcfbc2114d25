//! Syntactic split rules and the compound-question classifier.
//!
//! The two rules are cheap, precise, and deliberately narrow: they only
//! split structures that are tied to known domain entities, so coordinated
//! common nouns ("risks and benefits") pass through untouched. Anything the
//! rules cannot handle is left to the classifier-gated model splitter.

use crate::core::entity::EntityMention;
use crate::core::parse::{DepRelation, Parse, PosTag};

/// Wh-words that mark an information question.
const WH_WORDS: &[&str] = &["which", "what", "who", "where", "when", "why", "how"];

/// Yes/no auxiliary openers, each including the trailing space.
const YES_NO_OPENERS: &[&str] = &[
    "is ", "are ", "does ", "do ", "can ", "could ", "will ", "would ",
];

fn is_entity_id(entities: &[EntityMention], text: &str) -> bool {
    entities.iter().any(|e| e.id == text)
}

fn ensure_question_mark(mut question: String) -> String {
    if !question.ends_with('?') {
        question.push('?');
    }
    question
}

/// Split coordinated entity mentions that share a grammatical role.
///
/// Looks for a conjunct token whose head fills a prepositional-object,
/// direct-object, or subject slot, where *both* surfaces match an entity id
/// exactly. The coordinated tail is replaced with each entity in turn,
/// keeping every token before the head:
///
/// `"What are the targets of Amlodipine and Acarbose?"` becomes
/// `"What are the targets of Amlodipine?"` and
/// `"What are the targets of Acarbose?"`.
///
/// Returns two questions on the first qualifying pair, or an empty vector
/// when `entities` is empty or no pair qualifies. Candidate pairs whose
/// surfaces are not known entities are skipped and scanning continues.
pub fn split_conjoined_entities(parse: &Parse, entities: &[EntityMention]) -> Vec<String> {
    if entities.is_empty() {
        return Vec::new();
    }

    for token in parse.tokens() {
        if token.dep != DepRelation::Conjunct {
            continue;
        }
        let head_idx = token.head;
        let head = match parse.get(head_idx) {
            Some(head) => head,
            None => continue,
        };
        if !matches!(
            head.dep,
            DepRelation::PrepObject | DepRelation::DirectObject | DepRelation::Subject
        ) {
            continue;
        }
        if !is_entity_id(entities, &head.text) || !is_entity_id(entities, &token.text) {
            continue;
        }

        let prefix: Vec<&str> = parse.tokens()[..head_idx]
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        let build = |tail: &str| {
            let mut parts = prefix.clone();
            parts.push(tail);
            ensure_question_mark(parts.join(" ").trim().to_string())
        };
        return vec![build(&head.text), build(&token.text)];
    }

    Vec::new()
}

/// Split coordinated noun phrases that share head-side modifiers.
///
/// Looks for a conjunct whose head is a noun, where *either* surface matches
/// an entity id. Adjectival and compound-noun left dependents of the head
/// become shared modifiers, and the exact byte span from the head's start to
/// the conjunct's end is substituted with each phrase in turn, preserving
/// the surrounding text verbatim.
///
/// Never empty: degrades to `[question]` when `entities` is empty or no pair
/// qualifies.
pub fn split_conjoined_noun_phrases(
    parse: &Parse,
    question: &str,
    entities: &[EntityMention],
) -> Vec<String> {
    if entities.is_empty() {
        return vec![question.to_string()];
    }

    for token in parse.tokens() {
        if token.dep != DepRelation::Conjunct {
            continue;
        }
        let head = match parse.get(token.head) {
            Some(head) => head,
            None => continue,
        };
        if head.pos != PosTag::Noun {
            continue;
        }
        if !is_entity_id(entities, &head.text) && !is_entity_id(entities, &token.text) {
            continue;
        }

        let modifiers: Vec<&crate::core::parse::Token> = parse
            .left_dependents(token.head)
            .into_iter()
            .filter(|t| matches!(t.dep, DepRelation::Adjectival | DepRelation::CompoundNoun))
            .collect();

        // The replaced span covers the shared modifiers as well as the
        // head..conjunct range, so re-prefixing them in each phrase does not
        // duplicate them in the output.
        let start = modifiers
            .first()
            .map(|t| t.offset.min(head.offset))
            .unwrap_or(head.offset);
        let end = token.end();
        // Offsets must address the original question text; a provider that
        // retokenized differently cannot be spliced safely.
        if start >= end
            || end > question.len()
            || !question.is_char_boundary(start)
            || !question.is_char_boundary(end)
        {
            continue;
        }

        let modifiers: Vec<&str> = modifiers.into_iter().map(|t| t.text.as_str()).collect();
        let phrase = |tail: &str| {
            let mut parts = modifiers.clone();
            parts.push(tail);
            parts.join(" ")
        };

        let prefix = &question[..start];
        let suffix = &question[end..];
        return vec![
            format!("{prefix}{}{suffix}", phrase(&head.text)),
            format!("{prefix}{}{suffix}", phrase(&token.text)),
        ];
    }

    vec![question.to_string()]
}

/// Heuristic trigger for the model-backed splitter.
///
/// True iff the lower-cased question contains `", and"` or `" and "`, and
/// additionally either contains a wh-word or opens with a yes/no auxiliary.
/// Approximate and false-positive tolerant: it only gates an expensive
/// fallback.
pub fn is_compound_question(question: &str) -> bool {
    let q = question.to_lowercase();
    let coordinated = q.contains(", and") || q.contains(" and ");
    coordinated
        && (WH_WORDS.iter().any(|w| q.contains(w))
            || YES_NO_OPENERS.iter().any(|opener| q.starts_with(opener)))
}
