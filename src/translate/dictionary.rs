use crate::error::Result;
use crate::language::Language;
use crate::translate::Translator;
use async_trait::async_trait;
use std::time::Duration;

/// The phrases the demo dictionary knows, keyed by source language.
/// Entries mirror each other so known phrases round-trip between the two
/// locales.
const ENTRIES: &[(Language, &str, &str)] = &[
    (Language::English, "Hello", "Hola"),
    (Language::English, "How are you?", "¿Cómo estás?"),
    (Language::English, "I am learning Spanish", "Estoy aprendiendo español"),
    (Language::English, "What are you doing?", "¿Qué estás haciendo?"),
    (Language::English, "I love chatting with you", "Me encanta chatear contigo"),
    (Language::Spanish, "Hola", "Hello"),
    (Language::Spanish, "¿Cómo estás?", "How are you?"),
    (Language::Spanish, "Estoy aprendiendo inglés", "I am learning English"),
    (Language::Spanish, "¿Qué estás haciendo?", "What are you doing?"),
    (Language::Spanish, "Me encanta chatear contigo", "I love chatting with you"),
];

/// Static bilingual dictionary with a simulated network delay.
///
/// This is the mock end of the `Translator` seam: a lookup over a fixed
/// phrase table. A miss is not an error, it degrades to a marked fallback
/// embedding the original text, so callers and tests can tell a resolved
/// translation from an unresolved one.
#[derive(Debug, Clone)]
pub struct DictionaryTranslator {
    delay: Duration,
}

impl DictionaryTranslator {
    /// Default simulated latency, matching what a modest translation API
    /// round trip looks like.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

    pub fn new() -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
        }
    }

    /// Override the simulated delay. Tests use zero.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    fn lookup(text: &str, from: Language) -> Option<&'static str> {
        ENTRIES
            .iter()
            .find(|(lang, source, _)| *lang == from && *source == text)
            .map(|(_, _, translated)| *translated)
    }

    /// Fallback for phrases absent from the table.
    pub fn fallback(text: &str) -> String {
        format!("[Mock translation of: {}]", text)
    }
}

impl Default for DictionaryTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for DictionaryTranslator {
    async fn resolve(&self, text: &str, from: Language, _to: Language) -> Result<String> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(Self::lookup(text, from)
            .map(|t| t.to_string())
            .unwrap_or_else(|| Self::fallback(text)))
    }

    fn name(&self) -> &str {
        "dictionary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> DictionaryTranslator {
        DictionaryTranslator::with_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn known_entry_english_to_spanish() {
        let t = instant();
        let result = t
            .resolve("Hello", Language::English, Language::Spanish)
            .await
            .unwrap();
        assert_eq!(result, "Hola");
    }

    #[tokio::test]
    async fn known_entry_spanish_to_english() {
        let t = instant();
        let result = t
            .resolve("Hola", Language::Spanish, Language::English)
            .await
            .unwrap();
        assert_eq!(result, "Hello");
    }

    #[tokio::test]
    async fn known_phrases_round_trip() {
        let t = instant();
        let es = t
            .resolve("How are you?", Language::English, Language::Spanish)
            .await
            .unwrap();
        assert_eq!(es, "¿Cómo estás?");
        let en = t
            .resolve(&es, Language::Spanish, Language::English)
            .await
            .unwrap();
        assert_eq!(en, "How are you?");
    }

    #[tokio::test]
    async fn missing_entry_degrades_to_marked_fallback() {
        let t = instant();
        let result = t
            .resolve("Bonjour", Language::English, Language::Spanish)
            .await
            .unwrap();
        assert!(result.contains("Bonjour"));
        assert_eq!(result, "[Mock translation of: Bonjour]");
    }

    #[tokio::test]
    async fn lookup_is_keyed_by_source_language() {
        // "Hello" is an English entry; resolving it as Spanish is a miss.
        let t = instant();
        let result = t
            .resolve("Hello", Language::Spanish, Language::English)
            .await
            .unwrap();
        assert_eq!(result, DictionaryTranslator::fallback("Hello"));
    }

    #[tokio::test]
    async fn default_delay_is_applied() {
        tokio::time::pause();
        let t = DictionaryTranslator::new();
        let start = tokio::time::Instant::now();
        t.resolve("Hello", Language::English, Language::Spanish)
            .await
            .unwrap();
        assert!(start.elapsed() >= DictionaryTranslator::DEFAULT_DELAY);
    }
}
