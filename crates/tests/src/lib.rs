//! Shared fixtures for the cross-crate scenarios under `tests/`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tiptrip_agents::{AgentSettings, ConversationalAgent};
use tiptrip_catalog::PlaceCatalog;
use tiptrip_observability::AppMetrics;
use tiptrip_oracle::ScriptedOracle;
use tiptrip_storage::MemoryStore;

pub const ZOCALO: (f64, f64) = (19.4326, -99.1332);

pub fn dataset_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/places.csv")
}

pub fn load_catalog() -> Arc<PlaceCatalog> {
    Arc::new(PlaceCatalog::from_csv_path(dataset_path()).expect("fixture dataset should load"))
}

pub fn test_settings() -> AgentSettings {
    AgentSettings {
        oracle_timeout: Duration::from_secs(2),
        ..AgentSettings::default()
    }
}

pub struct Harness {
    pub oracle: Arc<ScriptedOracle>,
    pub store: MemoryStore,
    pub agent: ConversationalAgent<ScriptedOracle, MemoryStore>,
}

impl Harness {
    pub fn new(oracle: ScriptedOracle) -> Self {
        Self::with_settings(oracle, test_settings())
    }

    pub fn with_settings(oracle: ScriptedOracle, settings: AgentSettings) -> Self {
        let oracle = Arc::new(oracle);
        let store = MemoryStore::new();
        let agent = ConversationalAgent::new(
            load_catalog(),
            oracle.clone(),
            Arc::new(store.clone()),
            settings,
            AppMetrics::shared(),
        );

        Self {
            oracle,
            store,
            agent,
        }
    }
}
