use tiptrip_catalog::{ReferencePlaceResolver, RecommendationEngine};
use tiptrip_core::GeoPoint;
use tiptrip_tests::{load_catalog, ZOCALO};

#[test]
fn fixture_dataset_loads_every_named_row() {
    let catalog = load_catalog();
    assert_eq!(catalog.len(), 8);
    assert!(catalog.lookup("casa de los azulejos").unwrap().coordinates().is_none());
    assert_eq!(catalog.lookup("CHOLULA").unwrap().punctuation, Some(4.6));
}

#[test]
fn resolver_matches_accent_free_references() {
    let catalog = load_catalog();
    let resolver = ReferencePlaceResolver::default();

    let place = resolver.resolve("lugares cerca del angel de la independencia", &catalog);
    assert_eq!(place.map(|place| place.name.as_str()), Some("Ángel de la Independencia"));
    assert!(resolver.resolve("que hay cerca del zocalo", &catalog).is_none());
}

#[test]
fn unmapped_places_never_appear_in_results() {
    let engine = RecommendationEngine::new(load_catalog());
    let places = engine.recommend(GeoPoint::new(ZOCALO.0, ZOCALO.1), 15.0, Some("arquitectura"));
    assert!(places.is_empty());
}
