use serde::Serialize;

/// One displayed performance metric. Static; never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricConfig {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    /// Shown when the model omits the metric.
    pub default_value: f64,
}

pub const METRIC_CONFIG: [MetricConfig; 4] = [
    MetricConfig {
        key: "impact",
        label: "Impact",
        icon: "💥",
        default_value: 5.0,
    },
    MetricConfig {
        key: "brevity",
        label: "Brevity",
        icon: "✂️",
        default_value: 5.0,
    },
    MetricConfig {
        key: "style",
        label: "Style",
        icon: "🎨",
        default_value: 5.0,
    },
    MetricConfig {
        key: "structure",
        label: "Structure",
        icon: "🏗️",
        default_value: 5.0,
    },
];
