use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Verdict returned by the prediction service, normalized across contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Fraud,
    Legit,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Fraud => "fraud",
            Label::Legit => "legit",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service-independent result of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: Label,
    /// Always within [0.0, 1.0].
    pub confidence: f64,
    pub risk_indicators: Vec<String>,
    /// Opaque payload for display only.
    pub details: Option<Value>,
}

impl PredictionResult {
    /// Confidence as a display percentage, e.g. `"87.0%"`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }

    pub fn is_fraud(&self) -> bool {
        self.label == Label::Fraud
    }
}
