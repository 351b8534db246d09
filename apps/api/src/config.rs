use anyhow::{anyhow, Context, Result};

use crate::prediction::ContractVersion;

const DEFAULT_PREDICTION_API_BASE_URL: &str = "http://127.0.0.1:5000";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub prediction_api_base_url: String,
    pub prediction_contract: ContractVersion,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let prediction_api_base_url = std::env::var("PREDICTION_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_PREDICTION_API_BASE_URL.to_string());
        reqwest::Url::parse(&prediction_api_base_url).with_context(|| {
            format!("PREDICTION_API_BASE_URL '{prediction_api_base_url}' is not a valid URL")
        })?;

        let prediction_contract = match std::env::var("PREDICTION_CONTRACT") {
            Ok(raw) => raw.parse::<ContractVersion>().map_err(|e| anyhow!(e))?,
            Err(_) => ContractVersion::default(),
        };

        Ok(Config {
            prediction_api_base_url,
            prediction_contract,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
