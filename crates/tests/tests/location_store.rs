use std::sync::Arc;

use tiptrip_agents::ConversationalAgent;
use tiptrip_core::{GeoPoint, ReplyOutcome};
use tiptrip_observability::AppMetrics;
use tiptrip_oracle::ScriptedOracle;
use tiptrip_storage::{Store, UserLocationProvider};
use tiptrip_tests::{load_catalog, test_settings, ZOCALO};

#[tokio::test]
async fn sqlite_backed_agent_reads_stored_locations() -> anyhow::Result<()> {
    let store = Store::sqlite("sqlite::memory:").await?;
    store
        .upsert_location(11, GeoPoint::new(ZOCALO.0, ZOCALO.1))
        .await?;

    let oracle = Arc::new(ScriptedOracle::new().reply("ubicacion").reply("ubicacion"));
    let agent = ConversationalAgent::new(
        load_catalog(),
        oracle.clone(),
        Arc::new(store),
        test_settings(),
        AppMetrics::shared(),
    );

    let reply = agent.consult("¿qué hay cerca?", 11, 2).await?;
    let ReplyOutcome::Recommendations { places, .. } = &reply.outcome else {
        panic!("expected recommendations, got {:?}", reply.outcome);
    };
    assert_eq!(places.len(), 4);
    assert_eq!(places.last().map(|place| place.place_name.as_str()), Some("Museo Alfa"));

    let reply = agent.consult("¿qué hay cerca?", 12, 2).await?;
    assert_eq!(reply.outcome, ReplyOutcome::LocationUnavailable { place: None });

    let snapshot = agent.metrics().snapshot();
    assert_eq!(snapshot.consultations_total, 2);
    assert_eq!(snapshot.places_recommended_total, 4);
    assert_eq!(serde_json::to_value(&snapshot)?["oracle_calls_total"], 2);
    Ok(())
}

#[tokio::test]
async fn memory_store_dispatch_matches_direct_use() -> anyhow::Result<()> {
    let store = Store::memory();
    assert_eq!(store.get_coordinates(1).await?, None);

    store.upsert_location(1, GeoPoint::new(19.4, -99.1)).await?;
    assert_eq!(store.get_coordinates(1).await?, Some(GeoPoint::new(19.4, -99.1)));
    Ok(())
}
