use std::sync::Arc;
use std::time::Duration;

use tiptrip_core::{intent_prompt, Intent};
use tracing::debug;

use crate::{invoke_with_timeout, Oracle, OracleError};

/// Labels a message with one of the eight intents. No retries; oracle errors are
/// returned to the caller untouched.
pub struct IntentClassifier<O> {
    oracle: Arc<O>,
    timeout: Duration,
}

impl<O: Oracle> IntentClassifier<O> {
    pub fn new(oracle: Arc<O>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    pub async fn classify(&self, message: &str) -> Result<Intent, OracleError> {
        let prompt = intent_prompt(message);
        let reply = invoke_with_timeout(self.oracle.as_ref(), &prompt, self.timeout).await?;
        let intent = Intent::from_label(&reply.text);
        debug!(label = %reply.text.trim(), ?intent, "intent classified");
        Ok(intent)
    }
}
