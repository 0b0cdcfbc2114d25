//! Batch decomposition CLI.
//!
//! Reads a JSON file of questions, splits each into atomic sub-questions,
//! and writes the results as JSON. The model-backed splitter talks to any
//! OpenAI-compatible endpoint; the default is a local Ollama server.

use atomize::batch;
use atomize::config::LlmConfig;
use atomize::core::{ConversationHistory, EntityMention, LexiconExtractor, NullParser};
use atomize::llm::{BlockingChatAdapter, OpenAiClient};
use atomize::{LlmSplitter, QuestionDecomposer};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "atomize-cli")]
#[command(about = "Split compound questions into atomic sub-questions")]
struct Args {
    /// Input JSON file: {"entries": [{"question": "..."}]}
    #[arg(long)]
    input: PathBuf,

    /// Output JSON file for the decomposed questions
    #[arg(long)]
    output: PathBuf,

    /// Optional entity lexicon: JSON array of {"id": "...", "type": "..."}
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Model identifier for the splitter endpoint
    #[arg(long, default_value = "llama3.1")]
    model: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[arg(long, default_value = "http://localhost:11434/v1")]
    base_url: String,
}

fn load_lexicon(path: Option<&PathBuf>) -> Result<Vec<EntityMention>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(Vec::new()),
    }
}

fn run(args: &Args) -> Result<usize, Box<dyn std::error::Error>> {
    let config = LlmConfig::from_env()
        .with_model(&args.model)
        .with_base_url(&args.base_url);

    let client = OpenAiClient::from_config(&config);
    let adapter = BlockingChatAdapter::try_new(client)?;
    let splitter = LlmSplitter::new(Arc::new(adapter))
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens);

    let lexicon = load_lexicon(args.lexicon.as_ref())?;
    let decomposer = QuestionDecomposer::new(
        Arc::new(NullParser),
        Arc::new(LexiconExtractor::new(lexicon)),
        splitter,
    );

    let mut history = ConversationHistory::new();
    let count = batch::decompose_file(&decomposer, &mut history, &args.input, &args.output)?;
    Ok(count)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(count) => {
            println!(
                "Decomposed {} question(s): {} -> {}",
                count,
                args.input.display(),
                args.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "batch decomposition failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
