mod recommend;
mod resolver;
mod similarity;
mod tokenize;

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tiptrip_core::{normalize_text, PlaceRecord};
use tracing::{info, warn};

pub use recommend::RecommendationEngine;
pub use resolver::{ReferencePlaceResolver, DEFAULT_SIMILARITY_CUTOFF};
pub use similarity::similarity_ratio;
pub use tokenize::tokenize;

/// Dataset failures. All of them are boot-time and fatal.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed reading place dataset {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed place dataset")]
    Csv(#[from] csv::Error),
    #[error("duplicate place name in dataset: {0}")]
    DuplicateName(String),
    #[error("place dataset contains no places")]
    Empty,
}

#[derive(Debug, Clone)]
pub(crate) struct NameIndexEntry {
    pub(crate) normalized: String,
    pub(crate) tokens: HashSet<String>,
}

/// Read-only, insertion-ordered set of places. Names are unique after case-folding.
#[derive(Debug, Clone)]
pub struct PlaceCatalog {
    places: Vec<PlaceRecord>,
    by_name: HashMap<String, usize>,
    name_index: Vec<NameIndexEntry>,
}

#[derive(Debug, Deserialize)]
struct PlaceRow {
    #[serde(default)]
    name: String,
    #[serde(default)]
    classification: String,
    #[serde(default)]
    latitude: String,
    #[serde(default)]
    longitude: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    punctuation: String,
}

impl PlaceCatalog {
    pub fn from_records(records: Vec<PlaceRecord>) -> Result<Self, CatalogError> {
        if records.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut by_name = HashMap::with_capacity(records.len());
        let mut name_index = Vec::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            if by_name.insert(fold_name(&record.name), position).is_some() {
                return Err(CatalogError::DuplicateName(record.name.clone()));
            }

            let normalized = normalize_text(&record.name);
            let tokens = tokenize(&normalized).into_iter().collect::<HashSet<_>>();
            name_index.push(NameIndexEntry { normalized, tokens });
        }

        Ok(Self {
            places: records,
            by_name,
            name_index,
        })
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let catalog = Self::from_csv_reader(file)?;
        info!(path = %path.display(), places = catalog.len(), "place catalog loaded");
        Ok(catalog)
    }

    /// Columns are matched by header; unknown columns are ignored. Non-numeric
    /// coordinates or ratings become `None`; rows without a name are skipped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (line, row) in csv_reader.deserialize::<PlaceRow>().enumerate() {
            let row = row?;
            if row.name.is_empty() {
                warn!(row = line + 1, "skipping dataset row without a name");
                continue;
            }

            records.push(PlaceRecord {
                name: row.name,
                classification: row.classification,
                latitude: coerce_number(&row.latitude),
                longitude: coerce_number(&row.longitude),
                description: row.description,
                punctuation: coerce_number(&row.punctuation),
            });
        }

        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn all(&self) -> &[PlaceRecord] {
        &self.places
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.places.iter().map(|place| place.name.as_str())
    }

    /// Case-insensitive exact match.
    pub fn lookup(&self, name: &str) -> Option<&PlaceRecord> {
        self.position(name).map(|position| &self.places[position])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(&fold_name(name)).copied()
    }

    /// Case-insensitive substring match against `classification`, catalog order kept.
    pub fn filter_by_category_substring(&self, text: &str) -> Vec<&PlaceRecord> {
        let needle = text.to_lowercase();
        self.places
            .iter()
            .filter(|place| place.classification.to_lowercase().contains(&needle))
            .collect()
    }

    pub(crate) fn name_index(&self) -> &[NameIndexEntry] {
        &self.name_index
    }
}

fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn coerce_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}
