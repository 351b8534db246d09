use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::prediction::Predictor;
use crate::session::FormSession;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `PredictionClient` in production; swapped for stubs in tests.
    pub predictor: Arc<dyn Predictor>,
    /// The one form session. Never held across the prediction call.
    pub form: Arc<Mutex<FormSession>>,
}

impl AppState {
    pub fn new(config: Config, predictor: Arc<dyn Predictor>) -> Self {
        Self {
            config,
            predictor,
            form: Arc::new(Mutex::new(FormSession::new())),
        }
    }
}
