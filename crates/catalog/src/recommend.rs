use std::sync::Arc;

use tiptrip_core::{geodesic_distance_km, GeoPoint, Recommendation, RecommendationResult};

use crate::PlaceCatalog;

#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: Arc<PlaceCatalog>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<PlaceCatalog>) -> Self {
        Self { catalog }
    }

    /// Mapped places within `radius_km` of `origin`, nearest first, ties in catalog order.
    /// An empty result is a valid answer.
    pub fn recommend(
        &self,
        origin: GeoPoint,
        radius_km: f64,
        category: Option<&str>,
    ) -> RecommendationResult {
        let candidates = match category {
            Some(category) => self.catalog.filter_by_category_substring(category),
            None => self.catalog.all().iter().collect(),
        };

        let mut places = candidates
            .into_iter()
            .filter_map(|place| {
                let distance_km = geodesic_distance_km(origin, place.coordinates()?);
                (distance_km <= radius_km).then(|| Recommendation {
                    place_name: place.name.clone(),
                    distance_km,
                })
            })
            .collect::<Vec<_>>();

        places.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        places
    }
}
