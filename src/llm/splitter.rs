//! Model-backed question splitter, the cascade's last resort.
//!
//! One completion call per invocation, a best-effort scrape of the JSON
//! array out of the raw text, and a total fallback: whatever goes wrong, the
//! caller gets at least the original question back. The splitter sits
//! mid-pipeline, so a parse failure must never abort the Q&A flow.

use crate::llm::{ChatMessage, CompletionClient};
use std::sync::Arc;
use tracing::warn;

const DEFAULT_MAX_TOKENS: u32 = 256;

/// Splits compound questions with one deterministic model call.
pub struct LlmSplitter {
    client: Arc<dyn CompletionClient>,
    temperature: f64,
    max_tokens: u32,
}

impl LlmSplitter {
    /// Create a splitter with temperature 0 and a bounded output length.
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            temperature: 0.0,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the output token bound.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Split `question` into atomic sub-questions.
    ///
    /// Never empty and never fails: transport errors and unparseable model
    /// output both degrade to `[question]`, with the offending content
    /// logged for diagnosis.
    pub fn split(&self, question: &str) -> Vec<String> {
        let messages = [ChatMessage::user(build_split_prompt(question))];

        let content = match self
            .client
            .complete(&messages, self.temperature, self.max_tokens)
        {
            Ok(response) => response.content,
            Err(e) => {
                warn!(error = %e, "model call failed, keeping question whole");
                return vec![question.to_string()];
            }
        };

        match parse_question_list(&content) {
            Some(questions) => questions,
            None => {
                warn!(raw = %content, "unparseable splitter output, keeping question whole");
                vec![question.to_string()]
            }
        }
    }
}

/// Scrape a JSON array of strings out of free-form model output.
///
/// Takes the greedy span from the first `[` to the last `]`, discarding any
/// prose around it. Returns `None` when no bracketed span exists, the span
/// is not a JSON array of strings, or every element is blank.
fn parse_question_list(raw: &str) -> Option<Vec<String>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end < start {
        return None;
    }

    let items: Vec<String> = serde_json::from_str(&raw[start..=end]).ok()?;
    let questions: Vec<String> = items
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();

    if questions.is_empty() {
        None
    } else {
        Some(questions)
    }
}

/// Fixed few-shot instruction prompt for the splitter call.
fn build_split_prompt(question: &str) -> String {
    format!(
        r#"You are an expert question splitter.

Task:
- Split the input question into multiple independent questions, each representing one atomic action.
- Keep all entities intact; do not remove or replace them.
- Ensure each question is complete and can be understood independently.
- Only split where there is a semantic separation between distinct actions (do not split within an entity or a verb phrase that is a single action).
- Do NOT split if multiple noun phrases are modified by the same verb and can be understood together.

Input question: "{question}"

Output format:
- Only output a valid JSON list of strings in the form:
["Question1?", "Question2?", ...]
- Do NOT include explanations, bullet points, or extra text.

Examples:
Input: "What are the targets of Amlodipine and Acarbose?"
Output: ["What are the targets of Amlodipine?", "What are the targets of Acarbose?"]

Input: "Are there any tuberculosis repositioning studies involving Mefloquine, and what repurposing methods were used?"
Output: ["Are there any tuberculosis repositioning studies involving Mefloquine?", "What repurposing methods were used for Mefloquine?"]"#
    )
}
