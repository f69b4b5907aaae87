use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Overall score as the model returned it. The prompt quotes the type, so
/// models send either `7` or `"7"`; both are kept as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Number(Number),
    Text(String),
}

impl std::fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreValue::Number(n) => write!(f, "{n}"),
            ScoreValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brevity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<f64>,
}

impl PerformanceMetrics {
    /// Looks a metric up by its config key.
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "impact" => self.impact,
            "brevity" => self.brevity,
            "style" => self.style,
            "structure" => self.structure,
            _ => None,
        }
    }
}

/// Structured critique parsed from the model's reply.
///
/// Every field is optional. The parser never fills in defaults; display
/// defaults belong to `review::report`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<ScoreValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strengths: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvements: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<PerformanceMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_items: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pro_tips: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// Application-level error reported by the model (e.g. "not a resume").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Builds a result from a decoded JSON object, field by field.
    /// Fields of an unexpected JSON type are dropped rather than failing the whole reply.
    pub fn from_json(value: &Value) -> Self {
        let field = |name: &str| value.get(name);

        AnalysisResult {
            overall_score: field("overallScore").and_then(|v| match v {
                Value::Number(n) => Some(ScoreValue::Number(n.clone())),
                Value::String(s) => Some(ScoreValue::Text(s.clone())),
                _ => None,
            }),
            summary: field("summary").and_then(Value::as_str).map(String::from),
            strengths: field("strengths").and_then(string_list),
            improvements: field("improvements").and_then(string_list),
            performance_metrics: field("performanceMetrics")
                .filter(|v| v.is_object())
                .map(|m| PerformanceMetrics {
                    impact: m.get("impact").and_then(Value::as_f64),
                    brevity: m.get("brevity").and_then(Value::as_f64),
                    style: m.get("style").and_then(Value::as_f64),
                    structure: m.get("structure").and_then(Value::as_f64),
                }),
            action_items: field("actionItems").and_then(string_list),
            pro_tips: field("proTips").and_then(string_list),
            keywords: field("keywords").and_then(string_list),
            error: field("error").filter(|v| is_truthy(v)).map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        }
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect()
    })
}

/// JavaScript truthiness, which is what the reply contract was written against.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
