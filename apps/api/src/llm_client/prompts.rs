// Review prompt templates.
// The JSON shape below is what the response parser and report view expect.
// Keep it byte-for-byte stable so scores stay comparable across deployments.

/// Persona sent as the system message of every review.
pub const REVIEWER_SYSTEM: &str = "You are an expert resume reviewer.";

/// Placeholder replaced (once) with the extracted résumé text.
pub const DOCUMENT_PLACEHOLDER: &str = "{{DOCUMENT_TEXT}}";

pub const ANALYZE_RESUME_PROMPT: &str = r#"
You are an expert resume critic. Analyze the following resume text.
Return the response in strictly valid JSON format with this exact structure:
{
  "overallScore": "number (0-10)",
  "summary": "string (executive summary of the candidate)",
  "strengths": ["string", "string", "string"],
  "improvements": ["string", "string", "string"],
  "performanceMetrics": {
    "impact": number (0-10),
    "brevity": number (0-10),
    "style": number (0-10),
    "structure": number (0-10)
  },
  "actionItems": ["string", "string", "string"],
  "proTips": ["string", "string"],
  "keywords": ["string", "string", "string"]
}

Resume Text:
{{DOCUMENT_TEXT}}
"#;

/// Fills the review template with the document text.
/// Only the first placeholder is substituted; the text itself is inserted verbatim.
pub fn build_analysis_prompt(document_text: &str) -> String {
    ANALYZE_RESUME_PROMPT.replacen(DOCUMENT_PLACEHOLDER, document_text, 1)
}
