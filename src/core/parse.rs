//! Dependency parse data model and the provider seam.
//!
//! The cascade consumes parses, it never produces them. A provider turns raw
//! text into a flat token sequence where each token carries its
//! part-of-speech tag, dependency relation, and the index of its syntactic
//! head. Only the handful of tags and relations the split rules inspect get
//! their own variants; everything else collapses to `Other`.
//!
//! Offset policy: `Token::offset` is the *byte* offset of the token's first
//! character in the exact string handed to [`DependencyParser::parse`].
//! The noun-phrase rule slices the original question with these offsets, so
//! providers must not normalize whitespace or casing when tokenizing.

use crate::core::PipelineError;

/// Coarse part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosTag {
    /// Common or proper noun
    Noun,
    /// Verb
    Verb,
    /// Adjective
    Adjective,
    /// Any other tag
    Other,
}

/// Dependency relation between a token and its head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepRelation {
    /// Coordinated with the head ("and"-joined)
    Conjunct,
    /// Object of a preposition
    PrepObject,
    /// Direct object
    DirectObject,
    /// Nominal subject
    Subject,
    /// Adjectival modifier
    Adjectival,
    /// Compound noun modifier
    CompoundNoun,
    /// Root of the sentence
    Root,
    /// Any other relation
    Other,
}

/// One token of a dependency parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface text exactly as it appears in the source
    pub text: String,
    /// Byte offset of the token start in the source text
    pub offset: usize,
    /// Part-of-speech tag
    pub pos: PosTag,
    /// Relation to the head token
    pub dep: DepRelation,
    /// Index of the head token; the root points at itself
    pub head: usize,
}

impl Token {
    /// Create a token.
    pub fn new(
        text: impl Into<String>,
        offset: usize,
        pos: PosTag,
        dep: DepRelation,
        head: usize,
    ) -> Self {
        Self {
            text: text.into(),
            offset,
            pos,
            dep,
            head,
        }
    }

    /// Byte offset one past the token's last character.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// A parsed sentence: tokens in surface order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parse {
    tokens: Vec<Token>,
}

impl Parse {
    /// Wrap a token sequence.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// A parse with no tokens. Split rules treat it as "no match".
    pub fn empty() -> Self {
        Self::default()
    }

    /// All tokens in surface order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Token at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Tokens positioned before `head` whose head is `head`, in surface
    /// order. These are the left dependents spaCy calls `lefts`.
    pub fn left_dependents(&self, head: usize) -> Vec<&Token> {
        self.tokens
            .iter()
            .take(head.min(self.tokens.len()))
            .filter(|t| t.head == head)
            .collect()
    }
}

/// Provider seam: raw text in, annotated token sequence out.
///
/// Failure is fatal for the current question and propagates to the caller.
pub trait DependencyParser: Send + Sync {
    /// Parse `text` into an annotated token sequence.
    fn parse(&self, text: &str) -> Result<Parse, PipelineError>;
}

/// Parser for deployments without a parse backend.
///
/// Always returns an empty parse, so the syntactic rules never fire and the
/// cascade falls through to the classifier and model-backed splitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullParser;

impl DependencyParser for NullParser {
    fn parse(&self, _text: &str) -> Result<Parse, PipelineError> {
        Ok(Parse::empty())
    }
}
