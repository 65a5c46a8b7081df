use reqwest::Client;

use super::error::GatewayError;
use super::types::{SummaryRequest, SummaryResponse};
use crate::models::Endpoint;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const CLEAR_MEMORY_PATH: &str = "clear-memory";
const GENERIC_API_ERROR: &str = "API request failed";

/// HTTP client for the summarization backend
#[derive(Debug, Clone)]
pub struct SummaryClient {
    client: Client,
    base_url: String,
}

impl Default for SummaryClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl SummaryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: Client::new(), base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// POST `request` to `endpoint` and return the summary text
    pub async fn summarize(&self, endpoint: Endpoint, request: &SummaryRequest) -> Result<String, GatewayError> {
        tracing::info!(endpoint = %endpoint, chars = request.text.chars().count(), "Sending request");

        let response = self.client.post(self.url(endpoint.path())).json(request).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        // The body is parsed before the status is looked at, so a non-JSON
        // error page is a decode failure rather than an API error.
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))?;
        let body = SummaryResponse::from_value(&value);

        if !status.is_success() {
            let message = body.error.unwrap_or_else(|| GENERIC_API_ERROR.to_string());
            tracing::warn!(endpoint = %endpoint, status = status.as_u16(), %message, "Backend returned an error");
            return Err(GatewayError::Api { status: status.as_u16(), message });
        }

        match body.summary_text() {
            Some(summary) => Ok(summary.to_string()),
            None => Err(GatewayError::NoResult { detail: body.error.unwrap_or_default() }),
        }
    }

    /// Ask the backend to forget the conversation
    pub async fn clear_memory(&self) -> Result<(), GatewayError> {
        let response = self.client.post(self.url(CLEAR_MEMORY_PATH)).send().await?;
        let status = response.status();
        if status.is_success() {
            tracing::info!("Backend memory cleared");
            return Ok(());
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| SummaryResponse::from_value(&v).error)
            .unwrap_or_else(|| GENERIC_API_ERROR.to_string());
        Err(GatewayError::Api { status: status.as_u16(), message })
    }
}
