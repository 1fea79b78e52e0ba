pub mod geo;
pub mod intent;
pub mod models;
pub mod replies;
pub mod text;

pub use geo::geodesic_distance_km;
pub use intent::{category_prompt, general_info_prompt, intent_prompt};
pub use models::*;
pub use text::{collapse_whitespace, normalize_text};
