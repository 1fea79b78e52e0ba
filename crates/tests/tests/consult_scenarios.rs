use std::time::Duration;

use tiptrip_agents::{AgentSettings, ConsultError};
use tiptrip_core::replies;
use tiptrip_core::{
    GeneralQueryFailure, GeoPoint, Intent, ReplyOutcome, ResolutionFailure, SearchOrigin,
};
use tiptrip_oracle::{OracleError, ScriptedOracle};
use tiptrip_tests::{test_settings, Harness, ZOCALO};

fn zocalo() -> GeoPoint {
    GeoPoint::new(ZOCALO.0, ZOCALO.1)
}

fn place_names(outcome: &ReplyOutcome) -> Vec<&str> {
    match outcome {
        ReplyOutcome::Recommendations { places, .. } => {
            places.iter().map(|place| place.place_name.as_str()).collect()
        }
        other => panic!("expected recommendations, got {other:?}"),
    }
}

fn down() -> OracleError {
    OracleError::Connectivity("connection refused".to_string())
}

#[tokio::test]
async fn greeting_uses_only_the_classification_call() {
    let harness = Harness::new(ScriptedOracle::new().reply("saludo"));

    let reply = harness.agent.consult_default("hola", 1).await.unwrap();

    assert_eq!(reply.reply_text, replies::GREETING);
    assert_eq!(reply.intent, Some(Intent::Greeting));
    assert_eq!(harness.oracle.calls(), 1);
}

#[tokio::test]
async fn museums_near_user_stay_inside_the_default_radius() {
    let harness = Harness::new(ScriptedOracle::new().reply("ubicacion_cercana").reply("Museo"));
    harness.store.set_location(42, zocalo());

    let reply = harness
        .agent
        .consult_default("museos cerca de mi", 42)
        .await
        .unwrap();

    assert_eq!(place_names(&reply.outcome), vec!["Museo Alfa"]);
    match &reply.outcome {
        ReplyOutcome::Recommendations {
            origin,
            category,
            radius_km,
            places,
        } => {
            assert_eq!(origin, &SearchOrigin::User { user_id: 42 });
            assert_eq!(category.as_deref(), Some("Museo"));
            assert_eq!(*radius_km, 7.0);
            assert!((places[0].distance_km - 1.992553).abs() < 1e-3);
        }
        _ => unreachable!(),
    }
    assert!(reply.reply_text.contains("- Museo Alfa a 1.99 km"));
    assert!(reply.reply_text.contains("Calificación: 4.7"));
    assert!(!reply.reply_text.contains("Museo Beta"));
    assert_eq!(harness.oracle.calls(), 2);
}

#[tokio::test]
async fn nearby_lists_every_mapped_place_nearest_first() {
    let harness = Harness::new(ScriptedOracle::new().reply("ubicacion"));
    harness.store.set_location(7, zocalo());

    let reply = harness
        .agent
        .consult("¿qué hay a mi alrededor?", 7, 1)
        .await
        .unwrap();

    assert_eq!(
        place_names(&reply.outcome),
        vec!["Catedral Metropolitana", "Templo Mayor", "Palacio de Bellas Artes"]
    );
    assert!(reply
        .reply_text
        .starts_with("Te recomiendo los siguientes lugares cercanos a tu ubicación:"));
}

#[tokio::test]
async fn empty_radius_result_is_not_an_error() {
    let harness = Harness::new(ScriptedOracle::new().reply("ubicacion_cercana").reply("Teatro"));
    harness.store.set_location(7, zocalo());

    let reply = harness.agent.consult("teatros cerca", 7, 15).await.unwrap();

    assert!(place_names(&reply.outcome).is_empty());
    assert_eq!(reply.reply_text, replies::no_places_found(Some("Teatro")));
}

#[tokio::test]
async fn out_of_range_radius_gets_guidance() {
    let harness = Harness::new(
        ScriptedOracle::new()
            .reply("ubicacion")
            .reply("ubicacion")
            .reply("ubicacion"),
    );
    harness.store.set_location(3, zocalo());

    for radius_km in [0, 16] {
        let reply = harness.agent.consult("lugares cerca", 3, radius_km).await.unwrap();
        assert_eq!(reply.outcome, ReplyOutcome::InvalidRadius { radius_km });
        assert_eq!(reply.reply_text, replies::INVALID_RADIUS);
    }

    let reply = harness.agent.consult("lugares cerca", 3, 15).await.unwrap();
    assert!(matches!(reply.outcome, ReplyOutcome::Recommendations { .. }));
}

#[tokio::test]
async fn unknown_user_location_is_reported_before_radius() {
    let harness = Harness::new(ScriptedOracle::new().reply("ubicacion"));

    let reply = harness.agent.consult("lugares cerca", 99, 40).await.unwrap();

    assert_eq!(reply.outcome, ReplyOutcome::LocationUnavailable { place: None });
    assert_eq!(reply.reply_text, replies::USER_LOCATION_UNAVAILABLE);
}

#[tokio::test]
async fn unrecognised_category_asks_for_clarification() {
    let harness = Harness::new(ScriptedOracle::new().reply("ubicacion_cercana").reply("Estadio"));
    harness.store.set_location(1, zocalo());

    let reply = harness
        .agent
        .consult_default("estadios cerca de mi", 1)
        .await
        .unwrap();

    assert_eq!(
        reply.outcome,
        ReplyOutcome::Clarification {
            reason: ResolutionFailure::Category
        }
    );
    assert_eq!(reply.reply_text, replies::CATEGORY_CLARIFICATION);
}

#[tokio::test]
async fn missing_reference_place_asks_for_clarification() {
    let harness = Harness::new(ScriptedOracle::new().reply("lugares_referencia"));

    let reply = harness
        .agent
        .consult_default("que hay cerca del zocalo", 1)
        .await
        .unwrap();

    assert_eq!(
        reply.outcome,
        ReplyOutcome::Clarification {
            reason: ResolutionFailure::ReferencePlace
        }
    );
    assert_eq!(reply.reply_text, replies::REFERENCE_CLARIFICATION);
    assert_eq!(harness.agent.metrics().snapshot().places_recommended_total, 0);
}

#[tokio::test]
async fn reference_place_search_uses_the_fixed_radius() {
    let harness = Harness::new(ScriptedOracle::new().reply("lugares_referencia"));

    let reply = harness
        .agent
        .consult("¿Qué lugares hay cerca del Ángel de la Independencia?", 1, 1)
        .await
        .unwrap();

    let ReplyOutcome::Recommendations {
        origin,
        radius_km,
        places,
        ..
    } = &reply.outcome
    else {
        panic!("expected recommendations, got {:?}", reply.outcome);
    };

    assert_eq!(
        origin,
        &SearchOrigin::ReferencePlace {
            name: "Ángel de la Independencia".to_string()
        }
    );
    assert_eq!(*radius_km, 7.0);
    assert_eq!(places[0].place_name, "Ángel de la Independencia");
    assert_eq!(places[0].distance_km, 0.0);
    assert!(places.iter().all(|place| place.distance_km <= 7.0));
    assert!(places.windows(2).all(|pair| pair[0].distance_km <= pair[1].distance_km));
    assert!(!places.iter().any(|place| place.place_name == "Museo Beta"));
    assert!(reply
        .reply_text
        .starts_with("Te recomiendo los siguientes lugares cercanos a Ángel de la Independencia:"));
}

#[tokio::test]
async fn deflections_do_not_touch_the_budget() {
    let harness = Harness::new(
        ScriptedOracle::new()
            .reply("irrelevante")
            .reply("algo raro")
            .reply("despedida"),
    );
    harness.agent.budget().increment();

    let irrelevant = harness.agent.consult_default("¿quién ganó el partido?", 1).await.unwrap();
    let unknown = harness.agent.consult_default("asdf", 1).await.unwrap();
    let farewell = harness.agent.consult_default("adiós", 1).await.unwrap();

    assert_eq!(irrelevant.reply_text, replies::IRRELEVANT);
    assert_eq!(unknown.intent, Some(Intent::Unknown));
    assert_eq!(unknown.reply_text, replies::UNKNOWN);
    assert_eq!(farewell.reply_text, replies::FAREWELL);
    assert_eq!(harness.agent.budget().count(), 1);
}

#[tokio::test]
async fn classification_failure_propagates() {
    let harness = Harness::new(ScriptedOracle::new().fail(down()));

    let err = harness.agent.consult_default("hola", 1).await.unwrap_err();

    assert!(matches!(err, ConsultError::Classification(OracleError::Connectivity(_))));
    assert_eq!(harness.agent.budget().count(), 0);
    assert!(harness.agent.memory().recent(1).is_empty());
}

#[tokio::test]
async fn slow_classification_times_out() {
    let settings = AgentSettings {
        oracle_timeout: Duration::from_millis(20),
        ..test_settings()
    };
    let harness = Harness::with_settings(
        ScriptedOracle::new()
            .with_delay(Duration::from_millis(300))
            .reply("saludo"),
        settings,
    );

    let err = harness.agent.consult_default("hola", 1).await.unwrap_err();
    assert!(matches!(
        err,
        ConsultError::Classification(OracleError::Timeout(timeout)) if timeout == Duration::from_millis(20)
    ));
}

#[tokio::test]
async fn five_general_failures_short_circuit_the_sixth_call() {
    let mut oracle = ScriptedOracle::new();
    for _ in 0..5 {
        oracle = oracle.reply("informacion_general").fail(down());
    }
    let harness = Harness::new(oracle);

    for attempt in 1..=5 {
        let reply = harness
            .agent
            .consult_default("¿cuál es la historia del Zócalo?", 1)
            .await
            .unwrap();
        assert_eq!(
            reply.outcome,
            ReplyOutcome::Apology {
                failure: GeneralQueryFailure::Connectivity
            }
        );
        assert_eq!(harness.agent.budget().count(), attempt);
    }
    assert_eq!(harness.oracle.calls(), 10);

    let reply = harness
        .agent
        .consult_default("¿cuál es la historia del Zócalo?", 1)
        .await
        .unwrap();

    assert_eq!(reply.outcome, ReplyOutcome::Unavailable);
    assert_eq!(reply.reply_text, replies::UNAVAILABLE);
    assert_eq!(harness.oracle.calls(), 10);
    assert_eq!(harness.agent.metrics().snapshot().budget_short_circuits_total, 1);
}

#[tokio::test]
async fn general_success_resets_the_budget() {
    let mut oracle = ScriptedOracle::new();
    for _ in 0..4 {
        oracle = oracle
            .reply("informacion_general")
            .fail(OracleError::MalformedResponse("truncated".to_string()));
    }
    let oracle = oracle
        .reply("informacion_general")
        .reply("La Catedral Metropolitana se construyó entre 1573 y 1813.")
        .reply("informacion_general")
        .fail(down());
    let harness = Harness::new(oracle);

    for _ in 0..4 {
        harness.agent.consult_default("historia de la catedral", 5).await.unwrap();
    }
    assert_eq!(harness.agent.budget().count(), 4);

    let reply = harness.agent.consult_default("historia de la catedral", 5).await.unwrap();
    assert_eq!(reply.outcome, ReplyOutcome::Generated);
    assert!(reply.reply_text.starts_with("La Catedral Metropolitana"));
    assert_eq!(harness.agent.budget().count(), 0);

    harness.agent.consult_default("historia de la catedral", 5).await.unwrap();
    assert_eq!(harness.agent.budget().count(), 1);
    assert!(!harness.agent.budget().exhausted());
}

#[tokio::test]
async fn general_prompt_excludes_rows_outside_the_city() {
    let harness = Harness::new(
        ScriptedOracle::new()
            .reply("informacion_general")
            .reply("Puedes visitar el Templo Mayor."),
    );

    harness
        .agent
        .consult_default("háblame de zonas arqueológicas", 2)
        .await
        .unwrap();

    let prompt = harness.oracle.prompts().pop().unwrap();
    assert!(prompt.contains("- Templo Mayor (Zona arqueológica):"));
    assert!(!prompt.contains("Cholula"));
}

#[tokio::test]
async fn missing_locale_rows_answer_without_locking_anyone_out() {
    let settings = AgentSettings {
        locale_marker: "Oaxaca".to_string(),
        ..test_settings()
    };
    let mut oracle = ScriptedOracle::new();
    for _ in 0..5 {
        oracle = oracle.reply("informacion_general");
    }
    let harness = Harness::with_settings(oracle.reply("saludo"), settings);

    for _ in 0..5 {
        let reply = harness.agent.consult_default("¿qué visitar?", 1).await.unwrap();
        assert_eq!(reply.outcome, ReplyOutcome::NoInformation);
        assert_eq!(reply.reply_text, replies::NO_INFORMATION);
    }
    assert_eq!(harness.agent.budget().count(), 0);
    assert_eq!(harness.oracle.calls(), 5);

    let reply = harness.agent.consult_default("hola", 2).await.unwrap();
    assert_eq!(reply.outcome, ReplyOutcome::Canned);
    assert_eq!(reply.reply_text, replies::GREETING);
    assert_eq!(harness.oracle.calls(), 6);
}

#[tokio::test]
async fn concurrent_failures_are_all_counted() {
    let oracle = ScriptedOracle::new().with_delay(Duration::from_millis(10));
    for _ in 0..3 {
        oracle.push_reply("informacion_general");
    }
    for _ in 0..3 {
        oracle.push_error(down());
    }
    let harness = Harness::new(oracle);

    let (a, b, c) = tokio::join!(
        harness.agent.consult_default("historia", 1),
        harness.agent.consult_default("historia", 2),
        harness.agent.consult_default("historia", 3),
    );

    for reply in [a, b, c] {
        assert!(matches!(reply.unwrap().outcome, ReplyOutcome::Apology { .. }));
    }
    assert_eq!(harness.agent.budget().count(), 3);
}
