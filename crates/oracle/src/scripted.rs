use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;

use crate::{Oracle, OracleError, OracleReply};

/// Deterministic oracle answering from a queue of canned results. Every prompt is
/// recorded, including calls abandoned by a timeout.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    script: Mutex<VecDeque<Result<String, OracleError>>>,
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push_reply(text);
        self
    }

    pub fn fail(self, error: OracleError) -> Self {
        self.push_error(error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_reply(&self, text: impl Into<String>) {
        self.script.lock().push_back(Ok(text.into()));
    }

    pub fn push_error(&self, error: OracleError) {
        self.script.lock().push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

impl Oracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(&self, prompt: &str) -> Result<OracleReply, OracleError> {
        self.prompts.lock().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().pop_front();
        match next {
            Some(Ok(text)) => Ok(OracleReply { text }),
            Some(Err(error)) => Err(error),
            None => Err(OracleError::MalformedResponse(
                "scripted oracle has no reply left".to_string(),
            )),
        }
    }
}
