//! Text Extractor: turns uploaded PDF bytes into one normalized string.
//!
//! # Layout of the output
//! Fragments within a page are joined with single spaces, pages with `\n`,
//! and the whole result is trimmed.
//!
//! # spawn_blocking pattern
//! PDF decoding is CPU-bound. Loading runs in one blocking task, then every page
//! is extracted in its own blocking task. Handles are awaited in page order, so
//! pages may finish in any order but are always reassembled 1..N.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use lopdf::Document;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to load PDF: {0}")]
    Load(String),

    #[error("Password required for encrypted PDF")]
    Encrypted,

    #[error("Failed to extract text from page {page}: {message}")]
    Page { page: u32, message: String },

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// A decoded document that can hand out the text fragments of each page.
/// Pages are numbered from 1.
pub trait PageSource: Send + Sync + 'static {
    fn page_count(&self) -> u32;
    fn page_fragments(&self, page: u32) -> Result<Vec<String>, ExtractionError>;
}

/// Extracts every page of `source` concurrently and joins the results in page order.
pub async fn extract_pages(source: Arc<dyn PageSource>) -> Result<String, ExtractionError> {
    let handles: Vec<_> = (1..=source.page_count())
        .map(|page| {
            let source = Arc::clone(&source);
            tokio::task::spawn_blocking(move || {
                source
                    .page_fragments(page)
                    .map(|fragments| fragments.join(" "))
            })
        })
        .collect();

    let mut pages = Vec::with_capacity(handles.len());
    for handle in handles {
        let text = handle
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))??;
        pages.push(text);
    }

    Ok(pages.join("\n").trim().to_string())
}

/// `lopdf`-backed page source.
struct LopdfSource {
    doc: Document,
    /// Page numbers in document order, as reported by the page tree.
    page_numbers: Vec<u32>,
}

impl LopdfSource {
    fn load(bytes: &[u8]) -> Result<Self, ExtractionError> {
        let mut doc =
            Document::load_mem(bytes).map_err(|e| ExtractionError::Load(e.to_string()))?;
        if doc.is_encrypted() {
            // Owner-password-only files open with an empty user password.
            doc.decrypt("").map_err(|e| {
                debug!("Empty-password decryption failed: {e}");
                ExtractionError::Encrypted
            })?;
        }
        let page_numbers = doc.get_pages().into_keys().collect();
        Ok(Self { doc, page_numbers })
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.page_numbers.len() as u32
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<String>, ExtractionError> {
        let page_number = page
            .checked_sub(1)
            .and_then(|i| self.page_numbers.get(i as usize))
            .copied()
            .ok_or_else(|| ExtractionError::Page {
                page,
                message: "page not found".to_string(),
            })?;

        let text = self
            .doc
            .extract_text(&[page_number])
            .map_err(|e| ExtractionError::Page {
                page,
                message: e.to_string(),
            })?;

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

/// The whole upload-to-text path. Carried in `AppState` as `Arc<dyn TextExtractor>`.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, pdf: Bytes) -> Result<String, ExtractionError>;
}

/// Default extractor: per-page `lopdf` extraction, with a whole-document
/// `pdf-extract` pass when lopdf finds no text at all (unusual font encodings).
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, pdf: Bytes) -> Result<String, ExtractionError> {
        let bytes = pdf.clone();
        let source = tokio::task::spawn_blocking(move || LopdfSource::load(&bytes))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))??;
        let page_count = source.page_count();

        let text = extract_pages(Arc::new(source)).await?;
        debug!(
            "Extracted {} chars from {} page(s)",
            text.len(),
            page_count
        );
        if !text.is_empty() || page_count == 0 {
            return Ok(text);
        }

        warn!("No text found via page extraction, falling back to pdf-extract");
        let fallback =
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
                .await
                .map_err(|e| ExtractionError::Task(e.to_string()))?;
        match fallback {
            Ok(text) => Ok(normalize_fallback(&text)),
            Err(e) => {
                warn!("pdf-extract fallback failed: {e}");
                Ok(String::new())
            }
        }
    }
}

/// pdf-extract emits layout whitespace; collapse blank lines and trim.
fn normalize_fallback(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
