//! Analysis Requester: fills the review prompt, calls the chat capability,
//! and turns the reply into an `AnalysisResult`.

use tracing::{debug, warn};

use crate::llm_client::prompts::{build_analysis_prompt, REVIEWER_SYSTEM};
use crate::llm_client::{ChatCapability, ChatMessage, ChatOptions};
use crate::models::analysis::AnalysisResult;
use crate::review::parser::{parse_analysis, JsonExtraction};
use crate::review::ReviewError;

/// Sends `text` for review and returns the parsed critique.
///
/// A reply carrying an `error` field is the remote side rejecting the input
/// (e.g. "not a resume") and becomes `ReviewError::Analysis` with that message.
pub async fn analyze_resume(
    chat: &dyn ChatCapability,
    text: &str,
    strategy: JsonExtraction,
) -> Result<AnalysisResult, ReviewError> {
    let messages = [
        ChatMessage::system(REVIEWER_SYSTEM),
        ChatMessage::user(build_analysis_prompt(text)),
    ];

    let reply = chat
        .chat(&messages, &ChatOptions::default())
        .await?
        .into_text();
    debug!("Received {} chars from chat capability", reply.len());

    let result = parse_analysis(&reply, strategy)?;

    if let Some(message) = result.error {
        warn!("Reviewer rejected document: {message}");
        return Err(ReviewError::Analysis(message));
    }

    Ok(result)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::llm_client::{ChatReply, ChatRole, LlmError};
    use crate::models::analysis::ScoreValue;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Chat capability that returns a canned reply and records what it was sent.
    pub(crate) struct ScriptedChat {
        reply: Result<serde_json::Value, u16>,
        pub(crate) seen: Mutex<Vec<(Vec<ChatMessage>, ChatOptions)>>,
    }

    impl ScriptedChat {
        pub(crate) fn replying(reply: serde_json::Value) -> Self {
            Self {
                reply: Ok(reply),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatCapability for ScriptedChat {
        async fn chat(
            &self,
            messages: &[ChatMessage],
            options: &ChatOptions,
        ) -> Result<ChatReply, LlmError> {
            self.seen
                .lock()
                .unwrap()
                .push((messages.to_vec(), options.clone()));
            match &self.reply {
                Ok(value) => Ok(serde_json::from_value(value.clone())?),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "upstream unavailable".to_string(),
                }),
            }
        }

        async fn probe(&self) -> Result<(), LlmError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sends_persona_and_filled_prompt_with_fixed_model() {
        let chat = ScriptedChat::replying(serde_json::json!("{\"overallScore\": 7}"));
        analyze_resume(&chat, "Jane Doe, Rust engineer", JsonExtraction::GreedySpan)
            .await
            .unwrap();

        let seen = chat.seen.lock().unwrap();
        let (messages, options) = &seen[0];
        assert_eq!(options.model, "gpt-4o");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[0].content, "You are an expert resume reviewer.");
        assert_eq!(messages[1].role, ChatRole::User);
        assert!(messages[1].content.contains("Resume Text:\nJane Doe, Rust engineer"));
    }

    #[tokio::test]
    async fn test_plain_string_reply() {
        let chat = ScriptedChat::replying(serde_json::json!(
            "Sure! {\"overallScore\": 7, \"summary\": \"ok\"} Hope this helps."
        ));
        let result = analyze_resume(&chat, "text", JsonExtraction::GreedySpan)
            .await
            .unwrap();
        assert_eq!(result.overall_score, Some(ScoreValue::Number(7u64.into())));
    }

    #[tokio::test]
    async fn test_nested_message_reply() {
        let chat = ScriptedChat::replying(serde_json::json!({
            "message": {"content": "{\"overallScore\": \"9\", \"keywords\": [\"Rust\"]}"}
        }));
        let result = analyze_resume(&chat, "text", JsonExtraction::GreedySpan)
            .await
            .unwrap();
        assert_eq!(result.keywords, Some(vec!["Rust".to_string()]));
    }

    #[tokio::test]
    async fn test_error_field_becomes_analysis_error() {
        let chat = ScriptedChat::replying(serde_json::json!("{\"error\":\"not a resume\"}"));
        let err = analyze_resume(&chat, "grocery list", JsonExtraction::GreedySpan)
            .await
            .unwrap_err();
        match err {
            ReviewError::Analysis(message) => assert_eq!(message, "not a resume"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_reply_is_parse_error() {
        let chat = ScriptedChat::replying(serde_json::json!({"message": {}}));
        let err = analyze_resume(&chat, "text", JsonExtraction::GreedySpan)
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Parse(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_llm_error() {
        let chat = ScriptedChat::failing(502);
        let err = analyze_resume(&chat, "text", JsonExtraction::GreedySpan)
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Llm(LlmError::Api { status: 502, .. })));
    }
}
