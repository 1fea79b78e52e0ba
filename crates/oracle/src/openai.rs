use std::env;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{Oracle, OracleError, OracleReply};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// `None` when `TIPTRIP_OPENAI_API_KEY` is unset or blank.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("TIPTRIP_OPENAI_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())?;
        let model = env::var("TIPTRIP_OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            env::var("TIPTRIP_OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let temperature = env::var("TIPTRIP_OPENAI_TEMPERATURE")
            .ok()
            .and_then(|value| value.trim().parse::<f32>().ok())
            .map(|value| value.clamp(0.0, 2.0))
            .unwrap_or(0.0);
        let timeout = Duration::from_secs(
            env::var("TIPTRIP_ORACLE_TIMEOUT_SECONDS")
                .ok()
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(20),
        );

        Some(Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            temperature,
            timeout,
        })
    }
}

/// Oracle backed by the OpenAI Responses API.
#[derive(Debug, Clone)]
pub struct OpenAiOracle {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiOracle {
    pub fn new(config: OpenAiConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(6))
            .timeout(config.timeout)
            .build()
            .map_err(|err| OracleError::NotConfigured(format!("failed to build HTTP client: {err}")))?;

        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self, OracleError> {
        let config = OpenAiConfig::from_env().ok_or_else(|| {
            OracleError::NotConfigured("TIPTRIP_OPENAI_API_KEY is not set".to_string())
        })?;
        Self::new(config)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn map_transport_error(&self, err: reqwest::Error) -> OracleError {
        if err.is_timeout() {
            OracleError::Timeout(self.config.timeout)
        } else if err.is_builder() {
            OracleError::MalformedRequest(err.to_string())
        } else {
            OracleError::Connectivity(err.to_string())
        }
    }
}

impl Oracle for OpenAiOracle {
    fn name(&self) -> &str {
        "openai"
    }

    async fn invoke(&self, prompt: &str) -> Result<OracleReply, OracleError> {
        let payload = json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "input": [
                {
                    "role": "user",
                    "content": [
                        { "type": "input_text", "text": prompt }
                    ]
                }
            ]
        });

        let response = self
            .client
            .post(format!("{}/responses", self.config.base_url))
            .bearer_auth(self.config.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "oracle returned non-success status");
            return Err(status_error(status, body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| OracleError::MalformedResponse(format!("invalid JSON body: {err}")))?;

        let text = extract_output_text(&body)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| OracleError::MalformedResponse("output text missing".to_string()))?;

        debug!(model = %self.config.model, chars = text.len(), "oracle replied");
        Ok(OracleReply { text })
    }
}

fn status_error(status: StatusCode, body: String) -> OracleError {
    let detail = format!("status {}: {}", status.as_u16(), body);
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        OracleError::Connectivity(detail)
    } else {
        OracleError::MalformedRequest(detail)
    }
}

fn extract_output_text(payload: &Value) -> Option<String> {
    if let Some(value) = payload.get("output_text").and_then(|value| value.as_str()) {
        return Some(value.to_string());
    }

    let output = payload.get("output")?.as_array()?;
    let chunks = output
        .iter()
        .filter_map(|item| item.get("content").and_then(|value| value.as_array()))
        .flatten()
        .filter(|content| content.get("type").and_then(|value| value.as_str()) == Some("output_text"))
        .filter_map(|content| content.get("text").and_then(|value| value.as_str()))
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    if chunks.is_empty() {
        None
    } else {
        Some(chunks.join("\n\n"))
    }
}
