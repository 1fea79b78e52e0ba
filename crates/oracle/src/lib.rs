mod category;
mod classifier;
mod openai;
mod scripted;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use category::CategoryResolver;
pub use classifier::IntentClassifier;
pub use openai::{OpenAiConfig, OpenAiOracle};
pub use scripted::ScriptedOracle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleReply {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("oracle unreachable: {0}")]
    Connectivity(String),
    #[error("oracle call timed out after {0:?}")]
    Timeout(Duration),
    #[error("oracle rejected the request: {0}")]
    MalformedRequest(String),
    #[error("oracle returned a malformed response: {0}")]
    MalformedResponse(String),
    #[error("oracle is not configured: {0}")]
    NotConfigured(String),
}

/// External text classification/generation service.
pub trait Oracle: Send + Sync {
    fn name(&self) -> &str;
    async fn invoke(&self, prompt: &str) -> Result<OracleReply, OracleError>;
}

/// Bounds a single oracle call. Dropping the returned future abandons the call.
pub async fn invoke_with_timeout<O: Oracle>(
    oracle: &O,
    prompt: &str,
    timeout: Duration,
) -> Result<OracleReply, OracleError> {
    match tokio::time::timeout(timeout, oracle.invoke(prompt)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(oracle = oracle.name(), ?timeout, "oracle call timed out");
            Err(OracleError::Timeout(timeout))
        }
    }
}
