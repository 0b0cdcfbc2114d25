//! File-to-file batch decomposition.
//!
//! Reads a JSON file of questions, runs each through the cascade against a
//! single shared conversation history, and writes the results as pretty
//! JSON. Used by the CLI; library callers can also drive it directly.

use crate::core::{ConversationHistory, PipelineError, QuestionDecomposer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Errors from batch processing.
#[derive(Debug)]
pub enum BatchError {
    /// Reading or writing a file failed
    Io(std::io::Error),
    /// The input file was not valid JSON of the expected shape
    Json(serde_json::Error),
    /// The cascade failed for one of the questions
    Pipeline(PipelineError),
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {}", e),
            Self::Json(e) => write!(f, "json error: {}", e),
            Self::Pipeline(e) => write!(f, "pipeline error: {}", e),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Pipeline(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for BatchError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for BatchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<PipelineError> for BatchError {
    fn from(e: PipelineError) -> Self {
        Self::Pipeline(e)
    }
}

#[derive(Debug, Deserialize)]
struct InputFile {
    #[serde(default)]
    entries: Vec<InputEntry>,
}

#[derive(Debug, Deserialize)]
struct InputEntry {
    question: String,
}

#[derive(Debug, Serialize)]
struct OutputFile {
    questions: Vec<OutputEntry>,
}

#[derive(Debug, Serialize)]
struct OutputEntry {
    original_question: String,
    atomic_questions: Vec<String>,
}

/// Load the questions from a batch input file.
///
/// The file is a JSON object with an `entries` array, each entry carrying a
/// `question` string. Extra fields are ignored.
pub fn load_questions(path: impl AsRef<Path>) -> Result<Vec<String>, BatchError> {
    let text = std::fs::read_to_string(path)?;
    let input: InputFile = serde_json::from_str(&text)?;
    Ok(input.entries.into_iter().map(|e| e.question).collect())
}

/// Decompose every question in `input` and write the results to `output`.
///
/// Questions run in file order against one shared history, so coreference
/// across consecutive questions resolves the way it would in a live
/// conversation. Each output entry keeps the raw input question alongside
/// its atomic sub-questions. Returns the number of questions processed.
pub fn decompose_file(
    decomposer: &QuestionDecomposer,
    history: &mut ConversationHistory,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<usize, BatchError> {
    let questions = load_questions(input)?;

    let mut results = Vec::with_capacity(questions.len());
    for question in questions {
        let decomposition = decomposer.decompose(&question, history)?;
        results.push(OutputEntry {
            original_question: question,
            atomic_questions: decomposition.atomic_questions,
        });
    }

    let count = results.len();
    let file = OutputFile { questions: results };
    std::fs::write(output, serde_json::to_string_pretty(&file)?)?;
    info!(count, "batch decomposition written");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntityMention, EntityType, LexiconExtractor, NullParser};
    use crate::llm::{LlmSplitter, MockCompletionClient};
    use std::sync::Arc;

    fn decomposer(lexicon: &[&str]) -> QuestionDecomposer {
        let lexicon = lexicon
            .iter()
            .map(|t| EntityMention::new(*t, EntityType::Drug))
            .collect();
        QuestionDecomposer::new(
            Arc::new(NullParser),
            Arc::new(LexiconExtractor::new(lexicon)),
            LlmSplitter::new(Arc::new(MockCompletionClient::constant("[]"))),
        )
    }

    fn write_input(entries: &[&str]) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        let entries: Vec<serde_json::Value> = entries
            .iter()
            .map(|q| serde_json::json!({"question": q}))
            .collect();
        std::fs::write(
            file.path(),
            serde_json::json!({"entries": entries}).to_string(),
        )
        .unwrap();
        file
    }

    #[test]
    fn test_load_questions() {
        let input = write_input(&["What is Amlodipine?", "What are its targets?"]);
        let questions = load_questions(input.path()).unwrap();
        assert_eq!(
            questions,
            vec!["What is Amlodipine?", "What are its targets?"]
        );
    }

    #[test]
    fn test_load_questions_empty_entries() {
        let input = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(input.path(), "{}").unwrap();
        assert!(load_questions(input.path()).unwrap().is_empty());
    }

    #[test]
    fn test_load_questions_missing_file() {
        let result = load_questions("/nonexistent/batch.json");
        assert!(matches!(result, Err(BatchError::Io(_))));
    }

    #[test]
    fn test_load_questions_malformed_json() {
        let input = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(input.path(), "not json").unwrap();
        assert!(matches!(
            load_questions(input.path()),
            Err(BatchError::Json(_))
        ));
    }

    #[test]
    fn test_decompose_file_writes_results() {
        let input = write_input(&["What is Amlodipine", "What are its targets?"]);
        let output = tempfile::NamedTempFile::new().unwrap();

        let decomposer = decomposer(&["Amlodipine"]);
        let mut history = ConversationHistory::new();
        let count =
            decompose_file(&decomposer, &mut history, input.path(), output.path()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(history.len(), 2);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output.path()).unwrap()).unwrap();
        let questions = written["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 2);
        // Raw input preserved, atomic form normalized
        assert_eq!(questions[0]["original_question"], "What is Amlodipine");
        assert_eq!(
            questions[0]["atomic_questions"][0],
            "What is Amlodipine?"
        );
    }

    #[test]
    fn test_decompose_file_preserves_non_ascii() {
        let input = write_input(&["What inhibits the β-lactamase of Mefloquine?"]);
        let output = tempfile::NamedTempFile::new().unwrap();

        let decomposer = decomposer(&["Mefloquine"]);
        let mut history = ConversationHistory::new();
        decompose_file(&decomposer, &mut history, input.path(), output.path()).unwrap();

        let text = std::fs::read_to_string(output.path()).unwrap();
        assert!(text.contains("β-lactamase"));
    }
}
