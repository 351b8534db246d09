//! Prediction Client: the single point of entry for calls to the external
//! prediction service.
//!
//! No other module talks to the service directly. One POST per submission,
//! bounded by [`DEFAULT_TIMEOUT`], never retried: retry policy belongs to the caller.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::intake::CanonicalRequest;

pub mod contract;
pub mod handlers;
pub mod result;

pub use contract::ContractVersion;
pub use result::{Label, PredictionResult};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Prediction service did not respond within {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("{}", service_message(.status, .message))]
    Service { status: u16, message: String },

    #[error("Malformed prediction response: {0}")]
    MalformedResponse(String),

    #[error("Could not reach prediction service: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Prediction request was cancelled")]
    Cancelled,
}

impl PredictError {
    /// A caller-initiated cancellation, such as a form reset, rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PredictError::Cancelled)
    }
}

/// The body text when the service sent one, otherwise the bare status.
fn service_message(status: &u16, message: &str) -> String {
    if message.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        message.to_string()
    }
}

/// Anything that can turn a canonical request into a prediction.
///
/// Carried in `AppState` as `Arc<dyn Predictor>`.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Resolves with `Cancelled` as soon as `cancel` fires.
    async fn predict(
        &self,
        request: &CanonicalRequest,
        cancel: &CancellationToken,
    ) -> Result<PredictionResult, PredictError>;
}

/// HTTP client for `POST {base_url}/predict`.
#[derive(Clone)]
pub struct PredictionClient {
    client: Client,
    endpoint: String,
    contract: ContractVersion,
    timeout: Duration,
}

impl PredictionClient {
    pub fn new(base_url: &str, contract: ContractVersion) -> Result<Self, PredictError> {
        let client = Client::builder().build().map_err(PredictError::Network)?;
        Ok(Self {
            client,
            endpoint: predict_endpoint(base_url),
            contract,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    #[cfg(test)]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn contract(&self) -> ContractVersion {
        self.contract
    }

    async fn send(&self, request: &CanonicalRequest) -> Result<PredictionResult, PredictError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PredictError::Timeout(self.timeout)
                } else {
                    PredictError::Network(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            // The request already failed; a lost body must not mask that.
            let message = response.text().await.unwrap_or_default();
            warn!("Prediction service returned {}: {}", status, message);
            return Err(PredictError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(PredictError::Network)?;
        let result = contract::decode(self.contract, &body)?;

        debug!(
            "Prediction succeeded: label={}, confidence={:.3}, indicators={}",
            result.label,
            result.confidence,
            result.risk_indicators.len()
        );

        Ok(result)
    }
}

#[async_trait]
impl Predictor for PredictionClient {
    async fn predict(
        &self,
        request: &CanonicalRequest,
        cancel: &CancellationToken,
    ) -> Result<PredictionResult, PredictError> {
        debug!("POST {} (contract: {})", self.endpoint, self.contract);

        // Whichever branch loses is dropped, which releases the connection.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Prediction request cancelled by caller");
                Err(PredictError::Cancelled)
            }
            outcome = tokio::time::timeout(self.timeout, self.send(request)) => {
                outcome.unwrap_or_else(|_| {
                    warn!("Prediction request timed out after {:?}", self.timeout);
                    Err(PredictError::Timeout(self.timeout))
                })
            }
        }
    }
}

fn predict_endpoint(base_url: &str) -> String {
    format!("{}/predict", base_url.trim().trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tokio::sync::mpsc;

    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base_url: &str) -> PredictionClient {
        PredictionClient::new(base_url, ContractVersion::Canonical).unwrap()
    }

    #[test]
    fn test_default_timeout_is_45_seconds() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(45));
        assert_eq!(client("http://localhost:5000").timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_endpoint_joins_predict_path() {
        assert_eq!(
            client("http://127.0.0.1:5000").endpoint(),
            "http://127.0.0.1:5000/predict"
        );
        assert_eq!(
            client("https://jobs.example.com/api/").endpoint(),
            "https://jobs.example.com/api/predict"
        );
    }

    #[test]
    fn test_service_error_falls_back_to_status() {
        let err = PredictError::Service {
            status: 502,
            message: String::new(),
        };
        assert_eq!(err.to_string(), "HTTP 502");
    }

    #[test]
    fn test_only_cancellation_is_cancelled() {
        assert!(PredictError::Cancelled.is_cancelled());
        assert!(!PredictError::Timeout(DEFAULT_TIMEOUT).is_cancelled());
        assert!(!PredictError::MalformedResponse("eof".to_string()).is_cancelled());
        assert!(!PredictError::Service {
            status: 500,
            message: String::new(),
        }
        .is_cancelled());
    }

    #[tokio::test]
    async fn test_predict_maps_canonical_response() {
        let app = Router::new().route(
            "/predict",
            post(|| async { Json(json!({"result": "fraud", "score": 0.87})) }),
        );
        let base = spawn_stub(app).await;

        let result = client(&base)
            .predict(&CanonicalRequest::default(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.label, Label::Fraud);
        assert_eq!(result.confidence, 0.87);
        assert!(result.risk_indicators.is_empty());
        assert!(result.details.is_none());
    }

    #[tokio::test]
    async fn test_predict_sends_canonical_body() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
        let app = Router::new().route(
            "/predict",
            post(move |Json(body): Json<Value>| {
                let tx = tx.clone();
                async move {
                    tx.send(body).ok();
                    Json(json!({"result": "legit", "score": 0.2}))
                }
            }),
        );
        let base = spawn_stub(app).await;

        let request = CanonicalRequest {
            title: "Backend Engineer".to_string(),
            description: "Own the payments service".to_string(),
            remote: Some(true),
            ..Default::default()
        };
        client(&base)
            .predict(&request, &CancellationToken::new())
            .await
            .unwrap();

        let seen = rx.recv().await.unwrap();
        assert_eq!(seen["title"], "Backend Engineer");
        assert_eq!(seen["remote"], true);
        assert!(seen["has_company_website"].is_null());
        assert_eq!(seen["benefits"], "");
    }

    #[tokio::test]
    async fn test_non_success_status_carries_body() {
        let app = Router::new().route(
            "/predict",
            post(|| async { (StatusCode::BAD_REQUEST, "bad request") }),
        );
        let base = spawn_stub(app).await;

        let err = client(&base)
            .predict(&CanonicalRequest::default(), &CancellationToken::new())
            .await
            .unwrap_err();

        match &err {
            PredictError::Service { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "bad request");
            }
            other => panic!("expected service error, got {other:?}"),
        }
        assert_eq!(err.to_string(), "bad request");
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let app = Router::new().route("/predict", post(|| async { "definitely not json" }));
        let base = spawn_stub(app).await;

        let err = client(&base)
            .predict(&CanonicalRequest::default(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PredictError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let app = Router::new().route(
            "/predict",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"result": "legit", "score": 0.1}))
            }),
        );
        let base = spawn_stub(app).await;

        let err = client(&base)
            .with_timeout(Duration::from_millis(100))
            .predict(&CanonicalRequest::default(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PredictError::Timeout(d) if d == Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_request() {
        let app = Router::new().route(
            "/predict",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"result": "legit", "score": 0.1}))
            }),
        );
        let base = spawn_stub(app).await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client(&base)
            .predict(&CanonicalRequest::default(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, PredictError::Cancelled));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}"))
            .predict(&CanonicalRequest::default(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PredictError::Network(_)));
    }

    #[tokio::test]
    async fn test_legacy_contract_client() {
        let app = Router::new().route(
            "/predict",
            post(|| async { Json(json!({"result": "Real Job", "probability": 0.71})) }),
        );
        let base = spawn_stub(app).await;

        let result = PredictionClient::new(&base, ContractVersion::Legacy)
            .unwrap()
            .predict(&CanonicalRequest::default(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.label, Label::Legit);
        assert_eq!(result.confidence_percent(), "71.0%");
    }
}
