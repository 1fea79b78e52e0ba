use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::budget::DEFAULT_MAX_ERROR_COUNT;

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub max_error_count: u32,
    pub reference_radius_km: f64,
    pub oracle_timeout: Duration,
    pub locale_marker: String,
    pub memory_turns: usize,
    pub excerpt_rows: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_error_count: DEFAULT_MAX_ERROR_COUNT,
            reference_radius_km: 7.0,
            oracle_timeout: Duration::from_secs(20),
            locale_marker: "Ciudad de México".to_string(),
            memory_turns: 6,
            excerpt_rows: 8,
        }
    }
}

impl AgentSettings {
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_error_count: env_or("TIPTRIP_MAX_ERROR_COUNT", defaults.max_error_count),
            reference_radius_km: env_or::<f64>(
                "TIPTRIP_REFERENCE_RADIUS_KM",
                defaults.reference_radius_km,
            )
            .max(0.0),
            oracle_timeout: Duration::from_secs(env_or(
                "TIPTRIP_ORACLE_TIMEOUT_SECONDS",
                defaults.oracle_timeout.as_secs(),
            )),
            locale_marker: env::var("TIPTRIP_LOCALE_MARKER")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.locale_marker),
            memory_turns: env_or("TIPTRIP_MEMORY_TURNS", defaults.memory_turns),
            excerpt_rows: env_or("TIPTRIP_EXCERPT_ROWS", defaults.excerpt_rows),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}
