//! Gemini `generateContent` client.

use super::{AnalysisGateway, Completion, GatewayError};
use crate::domain::GatewayConfig;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::thread::sleep;
use std::time::Duration;
use tracing::debug;

const RETRY_BASE_DELAY_SECS: u64 = 1;

/// Finish reasons that mean the candidate was withheld rather than empty.
const BLOCKING_FINISH_REASONS: &[&str] =
    &["SAFETY", "RECITATION", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

pub struct GeminiGateway {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_retries: usize,
}

impl GeminiGateway {
    pub fn new(config: &GatewayConfig, api_key: String) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            max_retries: config.max_retries,
        })
    }

    /// Build from configuration, reading the key from `config.api_key_env`.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GatewayError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn send_with_retry(
        &self,
        make_request: impl Fn() -> RequestBuilder,
    ) -> Result<Response, GatewayError> {
        let max_attempts = self.max_retries + 1;
        for attempt in 0..max_attempts {
            let last = attempt + 1 == max_attempts;
            match make_request().send() {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() || !is_retriable_status(status) || last {
                        return Ok(response);
                    }
                    let delay = retry_delay(attempt);
                    debug!(
                        "Gemini returned {}; retrying in {:?} (attempt {}/{})",
                        status,
                        delay,
                        attempt + 1,
                        max_attempts
                    );
                    sleep(delay);
                }
                Err(err) => {
                    let retriable = err.is_timeout() || err.is_connect();
                    if !retriable || last {
                        return Err(GatewayError::Transport(format!(
                            "{} (after {} attempt(s))",
                            err,
                            attempt + 1
                        )));
                    }
                    let delay = retry_delay(attempt);
                    debug!("Gemini request error: {}; retrying in {:?}", err, delay);
                    sleep(delay);
                }
            }
        }
        Err(GatewayError::Transport("no attempts were made".to_string()))
    }
}

impl AnalysisGateway for GeminiGateway {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn complete(&self, prompt: &str) -> Result<Completion, GatewayError> {
        let url = self.url();
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });
        let response = self.send_with_retry(|| {
            self.client.post(&url).header("x-goog-api-key", &self.api_key).json(&body)
        })?;

        let status = response.status();
        let text = response.text().map_err(|e| GatewayError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(GatewayError::Status { status: status.as_u16(), body: text });
        }
        let value: Value =
            serde_json::from_str(&text).map_err(|e| GatewayError::Malformed(e.to_string()))?;
        let completion = parse_generate_response(&value)?;
        if let Completion::Blocked { reason } = &completion {
            tracing::warn!("Gemini response blocked: {}", reason);
        }
        Ok(completion)
    }
}

fn is_retriable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

fn retry_delay(attempt: usize) -> Duration {
    let multiplier = 1u64.checked_shl(attempt as u32).unwrap_or(u64::MAX);
    Duration::from_secs(RETRY_BASE_DELAY_SECS.saturating_mul(multiplier))
}

/// Interpret a `generateContent` response body.
pub fn parse_generate_response(value: &Value) -> Result<Completion, GatewayError> {
    if !value.is_object() {
        return Err(GatewayError::Malformed("expected a JSON object".to_string()));
    }
    if let Some(reason) = value.pointer("/promptFeedback/blockReason").and_then(Value::as_str) {
        return Ok(Completion::Blocked { reason: reason.to_string() });
    }

    let Some(candidate) = value.pointer("/candidates/0") else {
        return Ok(Completion::Empty);
    };
    let text: String = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .map(|parts| parts.iter().filter_map(|p| p.get("text").and_then(Value::as_str)).collect())
        .unwrap_or_default();
    if !text.is_empty() {
        return Ok(Completion::Text(text));
    }

    match candidate.get("finishReason").and_then(Value::as_str) {
        Some(reason) if BLOCKING_FINISH_REASONS.contains(&reason) => {
            Ok(Completion::Blocked { reason: reason.to_string() })
        }
        _ => Ok(Completion::Empty),
    }
}
