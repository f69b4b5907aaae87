//! Response Parser: pulls the JSON critique out of a free-text model reply.
//!
//! Models wrap JSON in prose and code fences, so the reply is never decoded whole.
//! Two candidate-selection strategies exist:
//! - `GreedySpan` (default): first `{` through last `}`. Tolerates surrounding
//!   prose, but mis-parses replies with several brace groups.
//! - `FirstBalanced`: the first balanced `{…}` span, aware of JSON string
//!   literals. Opt-in because it changes which object wins on multi-object replies.

use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use crate::models::analysis::{is_truthy, AnalysisResult};

#[derive(Debug, Error, PartialEq)]
#[error("Failed to parse AI response: {cause}")]
pub struct ParseError {
    pub cause: String,
}

impl ParseError {
    fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonExtraction {
    #[default]
    GreedySpan,
    FirstBalanced,
}

impl FromStr for JsonExtraction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(JsonExtraction::GreedySpan),
            "balanced" => Ok(JsonExtraction::FirstBalanced),
            other => Err(format!("unknown JSON extraction strategy '{other}'")),
        }
    }
}

const EMPTY_OBJECT: &str = "{}";

/// Parses a model reply into an `AnalysisResult`.
///
/// The decoded object must carry a truthy `overallScore` or a truthy `error`;
/// anything else is a `ParseError`. No partially valid result is ever returned.
pub fn parse_analysis(reply: &str, strategy: JsonExtraction) -> Result<AnalysisResult, ParseError> {
    let candidate = match strategy {
        JsonExtraction::GreedySpan => greedy_span(reply),
        JsonExtraction::FirstBalanced => first_balanced_span(reply),
    }
    .unwrap_or(EMPTY_OBJECT);

    let value: Value = serde_json::from_str(candidate).map_err(|e| ParseError::new(e.to_string()))?;

    let valid = value.get("overallScore").is_some_and(is_truthy)
        || value.get("error").is_some_and(is_truthy);
    if !valid {
        return Err(ParseError::new("Invalid structure"));
    }

    Ok(AnalysisResult::from_json(&value))
}

/// First `{` through the last `}` after it.
fn greedy_span(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

/// First `{` whose matching `}` closes at depth zero. Braces inside JSON
/// string literals (including escaped quotes) do not count.
fn first_balanced_span(reply: &str) -> Option<&str> {
    let bytes = reply.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = reply[search_from..].find('{') {
        let start = search_from + offset;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (i, &b) in bytes.iter().enumerate().skip(start) {
            if in_string {
                match b {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match b {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&reply[start..=i]);
                    }
                }
                _ => {}
            }
        }

        // Nothing closed from this brace; retry from the next one.
        search_from = start + 1;
        if !reply[search_from..].contains('}') {
            break;
        }
    }
    None
}
