use std::collections::HashSet;

use tiptrip_core::{normalize_text, PlaceRecord};
use tracing::debug;

use crate::similarity::similarity_ratio;
use crate::tokenize::tokenize;
use crate::PlaceCatalog;

pub const DEFAULT_SIMILARITY_CUTOFF: f64 = 0.5;

/// Finds the catalog place a free-text message refers to.
#[derive(Debug, Clone, Copy)]
pub struct ReferencePlaceResolver {
    cutoff: f64,
}

impl Default for ReferencePlaceResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_CUTOFF)
    }
}

impl ReferencePlaceResolver {
    pub fn new(cutoff: f64) -> Self {
        Self {
            cutoff: cutoff.clamp(0.0, 1.0),
        }
    }

    /// Only names sharing a token with the message are scored. The best score at or
    /// above the cutoff wins. Equal scores go to the greater normalized name, and the
    /// earliest catalog entry among identical normalized names.
    pub fn resolve<'c>(&self, message: &str, catalog: &'c PlaceCatalog) -> Option<&'c PlaceRecord> {
        let normalized = normalize_text(message);
        let message_tokens = tokenize(&normalized).into_iter().collect::<HashSet<_>>();
        if message_tokens.is_empty() {
            return None;
        }

        let index = catalog.name_index();
        let mut best: Option<(f64, usize)> = None;
        for (position, entry) in index.iter().enumerate() {
            if entry.tokens.is_disjoint(&message_tokens) {
                continue;
            }

            let score = similarity_ratio(&entry.normalized, &normalized);
            if score < self.cutoff {
                continue;
            }
            let better = best.map_or(true, |(best_score, best_position)| {
                score > best_score
                    || (score == best_score && entry.normalized > index[best_position].normalized)
            });
            if better {
                best = Some((score, position));
            }
        }

        let (score, position) = best?;
        let place = &catalog.all()[position];
        debug!(place = %place.name, score, "reference place resolved");
        Some(place)
    }
}
