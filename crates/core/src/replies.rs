use crate::models::{GeneralQueryFailure, PlaceRecord, Recommendation, SearchOrigin};

pub const GREETING: &str =
    "¡Hola! ¿En qué puedo ayudarte hoy con información turística sobre la Ciudad de México?";
pub const FAREWELL: &str = "Gracias por usar Tip Trip. ¡Espero que tengas un excelente día! 😊";
pub const IRRELEVANT: &str = "Lo siento, no estoy seguro de haber entendido tu pregunta. Recuerda que estoy aquí para proporcionarte información sobre turismo en la Ciudad de México. ¡No dudes en intentarlo de nuevo!";
pub const UNKNOWN: &str =
    "Lo siento, no pude entender tu intención. Por favor, intenta formular tu pregunta de otra manera.";
pub const UNAVAILABLE: &str =
    "Lo siento, por el momento no puedo ayudarte. Por favor, intenta de nuevo más tarde.";
pub const USER_LOCATION_UNAVAILABLE: &str = "No se pudo obtener la ubicación del usuario.";
pub const INVALID_RADIUS: &str = "Por favor, ingresa un radio de búsqueda entre 1 y 15 kilómetros.";
pub const CATEGORY_CLARIFICATION: &str = "Lo siento, no pude determinar la categoría de sitio que te interesa. Por favor, especifica una categoría como 'Museo', 'Monumento', 'Centro cultural', etc.";
pub const NO_INFORMATION: &str = "Lo siento, no tengo información específica sobre ese tema, pero puedo recomendarte lugares turísticos en la Ciudad de México.";
pub const REFERENCE_CLARIFICATION: &str = "Por favor, especifica un lugar de referencia.";

pub fn apology(failure: GeneralQueryFailure) -> &'static str {
    match failure {
        GeneralQueryFailure::Connectivity => "Lo siento, hubo un problema de conexión con el servidor. Por favor, intenta de nuevo en unos momentos.",
        GeneralQueryFailure::MalformedResponse => "Lo siento, no entendí completamente tu pregunta. ¿Podrías formularla de otra manera?",
        GeneralQueryFailure::EmptyDataset => "Lo siento, parece que hubo un problema al procesar los datos. Intenta preguntar nuevamente.",
        GeneralQueryFailure::Unclassified => "Lo siento, ocurrió un error inesperado. Por favor, intenta de nuevo.",
    }
}

pub fn place_location_unavailable(place_name: &str) -> String {
    format!("No pude encontrar la ubicación de {place_name}.")
}

pub fn no_places_found(category: Option<&str>) -> String {
    match category {
        Some(category) => format!(
            "Lo siento, no encontré sitios de la categoría '{category}' en el radio especificado."
        ),
        None => "Lo siento, no encontré sitios turísticos en el radio especificado.".to_string(),
    }
}

/// Renders a non-empty recommendation list. `details` resolves a place name to its record;
/// category searches append rating and description when available.
pub fn render_recommendations<'a>(
    origin: &SearchOrigin,
    category: Option<&str>,
    places: &[Recommendation],
    details: impl Fn(&str) -> Option<&'a PlaceRecord>,
) -> String {
    let mut text = match (origin, category) {
        (SearchOrigin::User { .. }, Some(category)) => format!(
            "Te recomiendo los siguientes lugares de la categoría '{category}' cercanos a tu ubicación:\n"
        ),
        (SearchOrigin::User { .. }, None) => {
            "Te recomiendo los siguientes lugares cercanos a tu ubicación:\n".to_string()
        }
        (SearchOrigin::ReferencePlace { name }, _) => {
            format!("Te recomiendo los siguientes lugares cercanos a {name}:\n")
        }
    };

    for place in places {
        text.push_str(&format!("- {} a {:.2} km\n", place.place_name, place.distance_km));

        if category.is_none() {
            continue;
        }
        if let Some(record) = details(&place.place_name) {
            if let Some(rating) = record.punctuation {
                text.push_str(&format!("  Calificación: {rating:.1}\n"));
            }
            let description = record.description.trim();
            if !description.is_empty() {
                text.push_str(&format!("  {description}\n"));
            }
        }
    }

    text
}
