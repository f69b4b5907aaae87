// Review pipeline: extract → checklist → LLM critique → parse.
// All LLM calls go through llm_client; no direct HTTP calls here.

pub mod analyzer;
pub mod checklist;
pub mod handlers;
pub mod metrics;
pub mod parser;
pub mod report;

use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::extract::{ExtractionError, TextExtractor};
use crate::llm_client::{ChatCapability, LlmError};
use crate::models::analysis::AnalysisResult;
use checklist::{build_presence_checklist, ChecklistItem};
use parser::{JsonExtraction, ParseError};

/// Everything that can go wrong between upload and critique.
/// All variants are recoverable: the session resets and the client may retry.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    /// The reviewer model reported an application-level problem with the input.
    #[error("{0}")]
    Analysis(String),

    #[error("{0}")]
    Llm(#[from] LlmError),
}

/// A complete review. Built only when every step succeeded.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub text: String,
    pub checklist: Vec<ChecklistItem>,
    pub analysis: AnalysisResult,
}

pub async fn run_review(
    extractor: &dyn TextExtractor,
    chat: &dyn ChatCapability,
    pdf: Bytes,
    strategy: JsonExtraction,
) -> Result<ReviewOutcome, ReviewError> {
    let text = extractor.extract(pdf).await?;
    let checklist = build_presence_checklist(&text);
    info!(
        "Checklist: {}/{} sections present",
        checklist.iter().filter(|i| i.present).count(),
        checklist.len()
    );

    let analysis = analyzer::analyze_resume(chat, &text, strategy).await?;

    Ok(ReviewOutcome {
        text,
        checklist,
        analysis,
    })
}
