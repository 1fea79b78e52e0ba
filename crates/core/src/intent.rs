//! Prompts sent to the oracle. Labels and examples are in Spanish because the
//! assistant serves visitors of Mexico City.

use crate::models::Intent;

pub fn intent_prompt(message: &str) -> String {
    format!(
        r#"Analiza el siguiente mensaje y responde con una palabra clave que describa su intención, basándote en las siguientes categorías:

- Responde: '{greeting}', si el mensaje es un saludo o muestra intención de iniciar una conversación.
  Ejemplos: hola, buenos días, ¿cómo estás?, ¿qué tal?

- Responde: '{farewell}', si el mensaje es una despedida o indica que la conversación está terminando.
  Ejemplos: adiós, hasta luego, gracias por tu ayuda, nos vemos

- Responde: '{nearby}', si el mensaje pregunta por sitios cercanos al usuario sin mencionar una categoría ni el nombre de algún sitio.
  Ejemplos: ¿Qué lugares hay cerca de mí?, ¿Qué me queda cerca?, ¿Qué es lo más cercano a mi ubicación actual?

- Responde: '{nearby_category}', si el mensaje pregunta por sitios cercanos al usuario de una categoría en especial.
  Ejemplos: Recomiéndame zonas arqueológicas cerca de mí, ¿Cuál es la iglesia más cercana?, ¿Qué museos me quedan cerca?

- Responde: '{reference}', si el mensaje pregunta por sitios cercanos a otro sitio que menciona.
  Ejemplos: ¿Qué lugares hay cerca del Zócalo?, ¿Qué lugares hay cerca del Ángel?

- Responde: '{general}', si el mensaje trata sobre información turística general: museos, estatuas, esculturas, murales, arquitectura, centros culturales, zonas arqueológicas, jardines, iglesias, nombres de esos sitios o agradecimientos por la información.
  Ejemplos: ¿Hay visitas nocturnas en el Castillo de Chapultepec?, ¿Cuál es el museo mejor calificado?, ¿Cuántos museos hay en la ciudad?

- Responde: '{irrelevant}', si el mensaje no tiene que ver con los temas anteriores.
  Ejemplos: ¿Qué es Python?, ¿Qué son las matemáticas?, ¿Qué es la contabilidad?

Responde solo con la palabra clave, sin agregar nada más.

Mensaje: "{message}""#,
        greeting = Intent::Greeting.label(),
        farewell = Intent::Farewell.label(),
        nearby = Intent::Nearby.label(),
        nearby_category = Intent::NearbyCategory.label(),
        reference = Intent::ReferencePlace.label(),
        general = Intent::GeneralInfo.label(),
        irrelevant = Intent::Irrelevant.label(),
        message = message,
    )
}

pub fn category_prompt<S: AsRef<str>>(message: &str, vocabulary: &[S]) -> String {
    let categories = vocabulary
        .iter()
        .map(|category| category.as_ref())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Dada la siguiente lista de categorías o clasificaciones:
{categories}

Determina a cuál de estas categorías pertenece el siguiente mensaje del usuario. Responde solo con el nombre exacto de la categoría de la lista, sin agregar nada más.

Mensaje del usuario: "{message}""#
    )
}

/// `excerpt` and `history` are pre-rendered; either may be empty.
pub fn general_info_prompt(question: &str, excerpt: &str, history: &str) -> String {
    let mut prompt = String::from(
        "Eres un guía turístico experto y apasionado, especializado en brindar información sobre destinos turísticos de la Ciudad de México. Tu tono debe ser amable, entusiasta y profesional.\n\
         Tu objetivo es ofrecer información, datos precisos, datos interesantes y brindar una buena experiencia.\n\
         Usa un lenguaje inclusivo y acogedor. Si la consulta está fuera de tu ámbito, guía al usuario amablemente hacia los temas que puedes abordar.\n",
    );

    if !excerpt.is_empty() {
        prompt.push_str("\nSitios del catálogo que pueden ser relevantes:\n");
        prompt.push_str(excerpt);
        prompt.push('\n');
    }

    if !history.is_empty() {
        prompt.push_str("\nConversación reciente:\n");
        prompt.push_str(history);
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        "\nPregunta del usuario: \"{question}\"\nResponde al usuario de manera informativa y útil."
    ));
    prompt
}
