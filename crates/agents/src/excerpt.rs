use tiptrip_catalog::{tokenize, PlaceCatalog};
use tiptrip_core::{normalize_text, PlaceRecord};

const DESCRIPTION_CHARS: usize = 240;

/// Places whose description mentions `locale_marker`, ranked by how many of the
/// question's longer words they contain. Ties keep catalog order.
pub fn catalog_excerpt<'c>(
    catalog: &'c PlaceCatalog,
    question: &str,
    locale_marker: &str,
    limit: usize,
) -> Vec<&'c PlaceRecord> {
    let marker = normalize_text(locale_marker);
    let keywords = tokenize(&normalize_text(question))
        .into_iter()
        .filter(|token| token.chars().count() > 3)
        .collect::<Vec<_>>();

    let mut ranked = catalog
        .all()
        .iter()
        .filter(|place| normalize_text(&place.description).contains(&marker))
        .map(|place| {
            let haystack = normalize_text(&format!(
                "{} {} {}",
                place.name, place.classification, place.description
            ));
            let hits = keywords
                .iter()
                .filter(|keyword| haystack.contains(keyword.as_str()))
                .count();
            (hits, place)
        })
        .collect::<Vec<_>>();

    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked.into_iter().take(limit).map(|(_, place)| place).collect()
}

pub fn render_excerpt(places: &[&PlaceRecord]) -> String {
    places
        .iter()
        .map(|place| {
            let description = place.description.trim();
            let description = match description.char_indices().nth(DESCRIPTION_CHARS) {
                Some((cut, _)) => format!("{}...", &description[..cut]),
                None => description.to_string(),
            };
            format!("- {} ({}): {}", place.name, place.classification, description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
