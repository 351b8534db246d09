//! Wire contracts spoken by prediction services, and the one mapping from
//! each into [`PredictionResult`].
//!
//! The contract in use is always chosen explicitly by configuration. A
//! response is never sniffed to decide which shape it is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::prediction::result::{Label, PredictionResult};
use crate::prediction::PredictError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractVersion {
    /// `{"result": "fraud" | "legit", "score", "risk_indicators"?, "details"?}`
    #[default]
    Canonical,
    /// `{"result": "Fake Job" | "Real Job", "probability", "risk_indicators"?, "note"?, "education"?}`
    ///
    /// `probability` is the confidence in the returned label.
    Legacy,
    /// `{"result": "Fake Job" | "Real Job", "score"}`
    ///
    /// `score` is the probability that the posting is fake, whichever label
    /// was returned.
    #[serde(rename = "legacy-score")]
    LegacyScore,
}

impl ContractVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            ContractVersion::Canonical => "canonical",
            ContractVersion::Legacy => "legacy",
            ContractVersion::LegacyScore => "legacy-score",
        }
    }
}

impl fmt::Display for ContractVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canonical" => Ok(ContractVersion::Canonical),
            "legacy" => Ok(ContractVersion::Legacy),
            "legacy-score" => Ok(ContractVersion::LegacyScore),
            other => Err(format!(
                "unknown prediction contract '{other}' (expected 'canonical', 'legacy' or 'legacy-score')"
            )),
        }
    }
}

/// Wire label → canonical label. Matched case-insensitively after trimming.
const LABELS: &[(ContractVersion, &str, Label)] = &[
    (ContractVersion::Canonical, "fraud", Label::Fraud),
    (ContractVersion::Canonical, "legit", Label::Legit),
    (ContractVersion::Legacy, "fake job", Label::Fraud),
    (ContractVersion::Legacy, "real job", Label::Legit),
    (ContractVersion::LegacyScore, "fake job", Label::Fraud),
    (ContractVersion::LegacyScore, "real job", Label::Legit),
];

#[derive(Debug, Deserialize)]
struct CanonicalResponse {
    result: String,
    score: f64,
    #[serde(default)]
    risk_indicators: Option<Vec<String>>,
    #[serde(default)]
    details: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct LegacyResponse {
    result: String,
    probability: f64,
    #[serde(default)]
    risk_indicators: Option<Vec<String>>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    education: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyScoreResponse {
    result: String,
    score: f64,
}

/// Parses a 2xx response body under the given contract.
pub fn decode(contract: ContractVersion, body: &str) -> Result<PredictionResult, PredictError> {
    match contract {
        ContractVersion::Canonical => {
            let wire: CanonicalResponse = parse(body)?;
            Ok(PredictionResult {
                label: map_label(contract, &wire.result)?,
                confidence: check_confidence("score", wire.score)?,
                risk_indicators: wire.risk_indicators.unwrap_or_default(),
                details: wire.details,
            })
        }
        ContractVersion::Legacy => {
            let wire: LegacyResponse = parse(body)?;
            let mut details = Map::new();
            if let Some(note) = wire.note {
                details.insert("note".to_string(), Value::String(note));
            }
            if let Some(education) = wire.education {
                details.insert("education".to_string(), Value::String(education));
            }
            Ok(PredictionResult {
                label: map_label(contract, &wire.result)?,
                confidence: check_confidence("probability", wire.probability)?,
                risk_indicators: wire.risk_indicators.unwrap_or_default(),
                details: (!details.is_empty()).then_some(Value::Object(details)),
            })
        }
        ContractVersion::LegacyScore => {
            let wire: LegacyScoreResponse = parse(body)?;
            let label = map_label(contract, &wire.result)?;
            let p_fake = check_confidence("score", wire.score)?;
            Ok(PredictionResult {
                label,
                confidence: match label {
                    Label::Fraud => p_fake,
                    Label::Legit => 1.0 - p_fake,
                },
                risk_indicators: vec![],
                details: None,
            })
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, PredictError> {
    serde_json::from_str(body).map_err(|e| PredictError::MalformedResponse(e.to_string()))
}

fn map_label(contract: ContractVersion, raw: &str) -> Result<Label, PredictError> {
    let wanted = raw.trim();
    LABELS
        .iter()
        .find(|(c, wire, _)| *c == contract && wire.eq_ignore_ascii_case(wanted))
        .map(|(_, _, label)| *label)
        .ok_or_else(|| {
            PredictError::MalformedResponse(format!(
                "unrecognised label '{raw}' for {contract} contract"
            ))
        })
}

fn check_confidence(field: &str, value: f64) -> Result<f64, PredictError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(PredictError::MalformedResponse(format!(
            "'{field}' must be within [0, 1], got {value}"
        )))
    }
}
