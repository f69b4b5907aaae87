use std::sync::Arc;

use crate::config::Config;
use crate::extract::TextExtractor;
use crate::llm_client::ChatCapability;
use crate::readiness::Readiness;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Remote chat capability. Default: `LlmClient` against the configured endpoint.
    pub chat: Arc<dyn ChatCapability>,
    /// Upload-to-text path. Default: `PdfTextExtractor`.
    pub extractor: Arc<dyn TextExtractor>,
    pub sessions: SessionStore,
    pub readiness: Readiness,
    pub config: Config,
}
