//! Report view: the presentation boundary.
//!
//! `AnalysisResult` keeps exactly what the model sent. Everything a client
//! would otherwise have to default (missing score, missing metrics, list
//! truncation, score band) is decided here and nowhere else.

use serde::Serialize;

use crate::models::analysis::AnalysisResult;
use crate::review::checklist::ChecklistItem;
use crate::review::metrics::METRIC_CONFIG;

/// Number of strengths / improvements surfaced in the headline cards.
const HEADLINE_ITEMS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn for_score(score: Option<i64>) -> Self {
        match score {
            Some(s) if s >= 8 => ScoreBand::Excellent,
            Some(s) if s >= 6 => ScoreBand::Good,
            _ => ScoreBand::NeedsImprovement,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricView {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub file_name: String,
    pub overall_score: String,
    pub score_value: Option<i64>,
    pub score_percent: Option<f64>,
    pub score_band: ScoreBand,
    pub score_label: &'static str,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub metrics: Vec<MetricView>,
    pub action_items: Vec<String>,
    pub pro_tips: Vec<String>,
    pub keywords: Vec<String>,
    pub checklist: Vec<ChecklistItem>,
    /// The untouched parse result, for clients that want to apply their own defaults.
    pub analysis: AnalysisResult,
}

impl ReportView {
    pub fn build(file_name: &str, analysis: AnalysisResult, checklist: Vec<ChecklistItem>) -> Self {
        let overall_score = analysis
            .overall_score
            .as_ref()
            .map(ToString::to_string)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "0".to_string());
        let score_value = leading_integer(&overall_score);
        let score_band = ScoreBand::for_score(score_value);

        let metrics = METRIC_CONFIG
            .iter()
            .map(|cfg| MetricView {
                key: cfg.key,
                label: cfg.label,
                icon: cfg.icon,
                value: analysis
                    .performance_metrics
                    .as_ref()
                    .and_then(|m| m.get(cfg.key))
                    .unwrap_or(cfg.default_value),
            })
            .collect();

        let headline = |items: &Option<Vec<String>>| -> Vec<String> {
            items
                .iter()
                .flatten()
                .take(HEADLINE_ITEMS)
                .cloned()
                .collect()
        };

        ReportView {
            file_name: file_name.to_string(),
            score_percent: score_value.map(|s| s as f64 * 10.0),
            score_value,
            score_band,
            score_label: score_band.label(),
            overall_score,
            summary: analysis.summary.clone().unwrap_or_default(),
            strengths: headline(&analysis.strengths),
            improvements: headline(&analysis.improvements),
            metrics,
            action_items: analysis.action_items.clone().unwrap_or_default(),
            pro_tips: analysis.pro_tips.clone().unwrap_or_default(),
            keywords: analysis.keywords.clone().unwrap_or_default(),
            checklist,
            analysis,
        }
    }
}

/// Leading integer of a string, the way `parseInt` reads it: optional
/// whitespace and sign, then digits. "7.5" → 7, "8/10" → 8, "ten" → None.
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..digits_end].parse::<i64>().ok().map(|n| sign * n)
}
