//! Air-quality assistant: builds prompts from current conditions and asks the completion service.

use crate::api::CompletionProvider;
use crate::error::Result;
use crate::models::{AqiLevel, LocationSnapshot};
use crate::normalize::Locale;
use tracing::{error, info};

/// Shown to the user when the chat completion fails.
pub const FALLBACK_ANSWER: &str =
    "Sorry, I can't answer right now. Please try again later.";

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

/// Describes the assistant role and the current conditions at a location.
pub fn build_context(snapshot: &LocationSnapshot, locale: Locale) -> String {
    let aqi = match snapshot.aqi {
        Some(aqi) => format!("{} ({})", aqi, AqiLevel::for_aqi(aqi).level),
        None => "n/a".to_string(),
    };

    format!(
        "You are an assistant specialised in air quality (AQI).\n\
         Current data:\n\
         - Location: {name}\n\
         - AQI: {aqi}\n\
         - PM2.5: {pm25} µg/m³\n\
         - PM10: {pm10} µg/m³\n\
         - Temperature: {temperature}°C\n\
         - Humidity: {humidity}%\n\
         - Last update: {updated}\n\
         \n\
         Answer in {language}, concisely and practically. Give specific health advice based on this data.\n\
         Be precise and avoid generalities. If the question is not about air quality, politely say you can only answer air quality questions.\n\
         Do not exceed 150 words. Answer in plain text without markdown formatting.",
        name = snapshot.name,
        pm25 = or_na(snapshot.pm25),
        pm10 = or_na(snapshot.pm10),
        temperature = or_na(snapshot.temperature),
        humidity = or_na(snapshot.humidity),
        updated = or_na(snapshot.last_updated.as_deref()),
        language = locale.language(),
    )
}

/// A user question asked within `context`.
pub fn question_prompt(context: &str, question: &str) -> String {
    format!("{context}\n\nUser question: {}", question.trim())
}

/// A request for short practical tips at the given AQI.
pub fn tips_prompt(context: &str, aqi: Option<u16>) -> String {
    format!(
        "{context}\n\nQuestion: Give me 2 to 3 practical tips for an environment with AQI {}. \
         Do not exceed 70 words.",
        or_na(aqi)
    )
}

/// Asks questions about the conditions at one location.
pub struct Assistant<P: CompletionProvider> {
    provider: P,
    locale: Locale,
}

impl<P: CompletionProvider> Assistant<P> {
    pub fn new(provider: P, locale: Locale) -> Self {
        Self { provider, locale }
    }

    /// Answers a chat question; a failed completion yields [`FALLBACK_ANSWER`].
    pub async fn ask(&self, snapshot: &LocationSnapshot, question: &str) -> String {
        let prompt = question_prompt(&build_context(snapshot, self.locale), question);
        info!("Asking assistant about {}", snapshot.name);
        match self.provider.complete(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                error!("Assistant completion failed: {}", e);
                FALLBACK_ANSWER.to_string()
            },
        }
    }

    /// Health tips for the current AQI.
    pub async fn tips(&self, snapshot: &LocationSnapshot) -> Result<String> {
        let prompt = tips_prompt(&build_context(snapshot, self.locale), snapshot.aqi);
        info!("Requesting health tips for {}", snapshot.name);
        self.provider.complete(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDataProvider;
    use crate::error::AppError;
    use crate::models::Coordinates;
    use crate::normalize::LabelFormatter;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    /// Records prompts and replies with a canned answer or an error.
    #[derive(Clone, Default)]
    struct MockProvider {
        prompts: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl CompletionProvider for MockProvider {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                Err(AppError::Completion("service down".to_string()))
            } else {
                Ok("Wear a mask.".to_string())
            }
        }
    }

    fn snapshot() -> LocationSnapshot {
        let coords = Coordinates::new(6.3665, 2.4185).unwrap();
        let mut snapshot = MockDataProvider::new(LabelFormatter::default()).snapshot(coords, Utc::now());
        snapshot.aqi = Some(160);
        snapshot.humidity = None;
        snapshot
    }

    #[test]
    fn test_context_contains_conditions() {
        let context = build_context(&snapshot(), Locale::En);
        assert!(context.contains("- Location: Demo location"));
        assert!(context.contains("- AQI: 160 (Unhealthy)"));
        assert!(context.contains("- PM2.5: 22 µg/m³"));
        assert!(context.contains("- Humidity: n/a%"));
        assert!(context.contains("Answer in English"));
    }

    #[test]
    fn test_prompts_append_question() {
        let prompt = question_prompt("CTX", "  Can I jog today? ");
        assert_eq!(prompt, "CTX\n\nUser question: Can I jog today?");
        assert!(tips_prompt("CTX", Some(42)).contains("AQI 42"));
        assert!(tips_prompt("CTX", None).contains("AQI n/a"));
    }

    #[tokio::test]
    async fn test_ask_returns_completion() {
        let provider = MockProvider::default();
        let assistant = Assistant::new(provider.clone(), Locale::Fr);

        let answer = assistant.ask(&snapshot(), "Can I jog?").await;

        assert_eq!(answer, "Wear a mask.");
        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].ends_with("User question: Can I jog?"));
        assert!(prompts[0].contains("Answer in French"));
    }

    #[tokio::test]
    async fn test_ask_falls_back_on_failure() {
        let provider = MockProvider {
            fail: true,
            ..Default::default()
        };
        let assistant = Assistant::new(provider, Locale::Fr);

        assert_eq!(assistant.ask(&snapshot(), "hello").await, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_tips_propagate_failure() {
        let provider = MockProvider {
            fail: true,
            ..Default::default()
        };
        let assistant = Assistant::new(provider, Locale::En);

        let err = assistant.tips(&snapshot()).await.unwrap_err();
        assert!(matches!(err, AppError::Completion(_)));
    }
}
