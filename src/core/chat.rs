use crate::domain::ports::Clock;
use crate::utils::text::fold_diacritics;
use chrono::{DateTime, Utc};

pub const GREETING: &str = "¡Hola! Soy el asistente de EatyFy. ¿En qué puedo ayudarte hoy? Puedo recomendarte restaurantes, responder preguntas sobre la app o ayudarte con tu presupuesto.";

const FALLBACK_REPLY: &str = "¡Estoy aquí para ayudarte! Puedo recomendarte restaurantes por ciudad, ayudarte con presupuestos, explicarte cómo funciona la app, o responder cualquier pregunta sobre EatyFy. ¿Qué te gustaría saber?";

// first matching rule wins
const RULES: &[(&[&str], &str)] = &[
    (
        &["pasto", "restaurante"],
        "¡Excelente! En Pasto tienes muchas opciones deliciosas. Te recomiendo probar La Cabaña, Sulerna o La Finca Paisa - todos con precios accesibles. ¿Te gustaría que te ayude a buscar restaurantes específicos por tipo de comida o presupuesto?",
    ),
    (
        &["presupuesto", "precio"],
        "¡Claro! EatyFy te ayuda a encontrar restaurantes que se ajusten a tu presupuesto. Puedes filtrar por rangos de precio desde $25.000 hasta $100.000 por persona. ¿Cuál es tu presupuesto aproximado?",
    ),
    (
        &["hola", "buenos"],
        "¡Hola! Soy EatyBot, tu asistente en EatyFy. Estoy aquí para ayudarte a descubrir los mejores restaurantes en Colombia. ¿En qué ciudad estás o qué tipo de comida te gustaría probar?",
    ),
    (
        &["mapa", "ubicacion"],
        "¡Genial! EatyFy tiene mapas interactivos con OpenStreetMap para que encuentres fácilmente los restaurantes. Cada restaurante muestra su ubicación exacta para que no te pierdas.",
    ),
];

/// Canned keyword replies; stands in for a chat backend.
pub fn reply(input: &str) -> &'static str {
    let folded = fold_diacritics(input);
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| folded.contains(k)))
        .map(|(_, answer)| *answer)
        .unwrap_or(FALLBACK_REPLY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Conversation transcript, opened with the assistant's greeting.
pub struct ChatSession<C: Clock> {
    clock: C,
    messages: Vec<ChatMessage>,
}

impl<C: Clock> ChatSession<C> {
    pub fn new(clock: C) -> Self {
        let greeting = ChatMessage {
            speaker: Speaker::Assistant,
            content: GREETING.to_string(),
            timestamp: clock.now(),
        };
        Self {
            clock,
            messages: vec![greeting],
        }
    }

    /// Blank input is ignored and returns `None`.
    pub fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }
        self.push(Speaker::User, input.to_string());
        self.push(Speaker::Assistant, reply(input).to_string());
        self.messages.last()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, speaker: Speaker, content: String) {
        self.messages.push(ChatMessage {
            speaker,
            content,
            timestamp: self.clock.now(),
        });
    }
}
