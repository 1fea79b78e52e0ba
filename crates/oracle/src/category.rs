use std::sync::Arc;
use std::time::Duration;

use tiptrip_core::{category_prompt, CATEGORIES};
use tracing::debug;

use crate::{invoke_with_timeout, Oracle, OracleError};

/// Asks the oracle to pick a category; only exact vocabulary members are accepted.
pub struct CategoryResolver<O> {
    oracle: Arc<O>,
    vocabulary: Vec<String>,
    timeout: Duration,
}

impl<O: Oracle> CategoryResolver<O> {
    pub fn new(oracle: Arc<O>, timeout: Duration) -> Self {
        Self::with_vocabulary(oracle, CATEGORIES.iter().map(|c| c.to_string()).collect(), timeout)
    }

    pub fn with_vocabulary(oracle: Arc<O>, vocabulary: Vec<String>, timeout: Duration) -> Self {
        Self {
            oracle,
            vocabulary,
            timeout,
        }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub async fn resolve(&self, message: &str) -> Result<Option<String>, OracleError> {
        let prompt = category_prompt(message, self.vocabulary.as_slice());
        let reply = invoke_with_timeout(self.oracle.as_ref(), &prompt, self.timeout).await?;
        let answer = reply.text.trim();

        let category = self
            .vocabulary
            .iter()
            .find(|category| category.as_str() == answer)
            .cloned();
        debug!(answer, matched = category.is_some(), "category resolved");
        Ok(category)
    }
}
