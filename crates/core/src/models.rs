use serde::{Deserialize, Serialize};

pub const MIN_RADIUS_KM: i64 = 1;
pub const MAX_RADIUS_KM: i64 = 15;
pub const DEFAULT_RADIUS_KM: i64 = 7;

/// Closed vocabulary the category resolver may answer with.
pub const CATEGORIES: &[&str] = &[
    "Museo",
    "Monumento",
    "Centro cultural",
    "Zona arqueológica",
    "Iglesia",
    "Jardín",
    "Escultura",
    "Mural",
    "Arquitectura",
    "Planetario",
    "Galería",
    "Teatro",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    pub classification: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: String,
    pub punctuation: Option<f64>,
}

impl PlaceRecord {
    /// `None` for unmapped places; those never take part in distance operations.
    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Farewell,
    Nearby,
    NearbyCategory,
    ReferencePlace,
    GeneralInfo,
    Irrelevant,
    Unknown,
}

impl Intent {
    pub const ALL: [Intent; 8] = [
        Intent::Greeting,
        Intent::Farewell,
        Intent::Nearby,
        Intent::NearbyCategory,
        Intent::ReferencePlace,
        Intent::GeneralInfo,
        Intent::Irrelevant,
        Intent::Unknown,
    ];

    /// Maps an oracle label onto the closed intent set. Only surrounding whitespace and
    /// case are ignored; anything else unrecognised is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim().to_lowercase();

        match trimmed.as_str() {
            "saludo" => Self::Greeting,
            "despedida" => Self::Farewell,
            "ubicacion" => Self::Nearby,
            "ubicacion_cercana" => Self::NearbyCategory,
            "lugares_referencia" => Self::ReferencePlace,
            "informacion_general" => Self::GeneralInfo,
            "irrelevante" => Self::Irrelevant,
            _ => Self::Unknown,
        }
    }

    /// Label the oracle is instructed to answer with.
    pub fn label(self) -> &'static str {
        match self {
            Self::Greeting => "saludo",
            Self::Farewell => "despedida",
            Self::Nearby => "ubicacion",
            Self::NearbyCategory => "ubicacion_cercana",
            Self::ReferencePlace => "lugares_referencia",
            Self::GeneralInfo => "informacion_general",
            Self::Irrelevant => "irrelevante",
            Self::Unknown => "desconocido",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub place_name: String,
    pub distance_km: f64,
}

/// Ascending by distance, ties in catalog order.
pub type RecommendationResult = Vec<Recommendation>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchOrigin {
    User { user_id: i64 },
    ReferencePlace { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionFailure {
    Category,
    ReferencePlace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneralQueryFailure {
    Connectivity,
    MalformedResponse,
    EmptyDataset,
    Unclassified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyOutcome {
    Canned,
    Recommendations {
        origin: SearchOrigin,
        category: Option<String>,
        radius_km: f64,
        places: RecommendationResult,
    },
    Clarification {
        reason: ResolutionFailure,
    },
    LocationUnavailable {
        place: Option<String>,
    },
    InvalidRadius {
        radius_km: i64,
    },
    Generated,
    NoInformation,
    Apology {
        failure: GeneralQueryFailure,
    },
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReply {
    pub reply_text: String,
    pub intent: Option<Intent>,
    pub outcome: ReplyOutcome,
}

impl AgentReply {
    pub fn new(intent: Option<Intent>, outcome: ReplyOutcome, reply_text: impl Into<String>) -> Self {
        Self {
            reply_text: reply_text.into(),
            intent,
            outcome,
        }
    }
}

impl std::fmt::Display for AgentReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reply_text)
    }
}
