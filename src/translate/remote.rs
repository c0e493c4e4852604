use crate::error::{Error, Result};
use crate::language::Language;
use crate::translate::Translator;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// HTTP translation provider.
///
/// Speaks the LibreTranslate-style API: `POST {base}/translate` with
/// `{q, source, target}` JSON, optional API key. This is the real end of the
/// `Translator` seam the dictionary mock stands in for; unlike the
/// dictionary it can fail, and failures surface as `Error::Translation`.
#[derive(Clone)]
pub struct RemoteTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl RemoteTranslator {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(Error::Translation(
                "Translation API base URL is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Translation(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build a provider from `TRANSLATE_API_URL` and (optionally)
    /// `TRANSLATE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("TRANSLATE_API_URL").map_err(|_| {
            Error::Translation("TRANSLATE_API_URL environment variable not set".to_string())
        })?;
        let api_key = std::env::var("TRANSLATE_API_KEY").ok();
        Self::new(base_url, api_key)
    }
}

#[async_trait]
impl Translator for RemoteTranslator {
    async fn resolve(&self, text: &str, from: Language, to: Language) -> Result<String> {
        let url = format!("{}/translate", self.base_url);

        let mut body = json!({
            "q": text,
            "source": from.tag(),
            "target": to.tag(),
            "format": "text",
        });
        if let Some(key) = &self.api_key {
            body["api_key"] = json!(key);
        }

        debug!("-> Translation request to {} ({} -> {})", url, from, to);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Translation(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Translation(format!(
                "Provider returned {}: {}",
                status, detail
            )));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| Error::Translation(format!("Malformed provider response: {}", e)))?;

        Ok(parsed.translated_text)
    }

    fn name(&self) -> &str {
        "remote"
    }
}
