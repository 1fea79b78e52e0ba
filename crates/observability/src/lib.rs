use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    consultations_total: AtomicU64,
    oracle_calls_total: AtomicU64,
    oracle_failures_total: AtomicU64,
    budget_short_circuits_total: AtomicU64,
    places_recommended_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub consultations_total: u64,
    pub oracle_calls_total: u64,
    pub oracle_failures_total: u64,
    pub budget_short_circuits_total: u64,
    pub places_recommended_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_consultation(&self) {
        self.consultations_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_oracle_call(&self) {
        self.oracle_calls_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_oracle_failure(&self) {
        self.oracle_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_short_circuit(&self) {
        self.budget_short_circuits_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_places_recommended(&self, places: usize) {
        self.places_recommended_total
            .fetch_add(places as u64, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let consultations = self.consultations_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            consultations_total: consultations,
            oracle_calls_total: self.oracle_calls_total.load(Ordering::Relaxed),
            oracle_failures_total: self.oracle_failures_total.load(Ordering::Relaxed),
            budget_short_circuits_total: self.budget_short_circuits_total.load(Ordering::Relaxed),
            places_recommended_total: self.places_recommended_total.load(Ordering::Relaxed),
            avg_latency_millis: if consultations == 0 {
                0.0
            } else {
                latency as f64 / consultations as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,tiptrip_agents=info,tiptrip_oracle=info,tiptrip_catalog=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
