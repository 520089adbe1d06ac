//! AI narration client.
//!
//! Turns an indicator snapshot into a prompt, posts it to the AI relay
//! (`POST {relay}/api/ai`) and extracts the first completion's text. Never
//! fails: transport or relay errors become a fixed fallback message.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use common::{Error, NarrationRequest, Narrator, Result};

pub const INCONCLUSIVE: &str = "Analysis inconclusive.";
pub const CONNECTIVITY_FALLBACK: &str = "AI connectivity interruption. Rely on technical indicators.";

/// Build the analysis prompt sent to the model.
pub fn build_prompt(request: &NarrationRequest) -> String {
    format!(
        "You are an expert Forex and Binary Options technical analyst. \
         Keep the response under 50 words and do not give financial advice.\n\
         Analyze pair: {}\n\
         Current Price: {}\n\
         RSI (14): {:.2}\n\
         Stochastic %K: {:.2}\n\
         Short-term Trend: {}\n\
         Identify the best entry point (CALL or PUT) and explain why based on the momentum and trend.",
        request.pair_name, request.price, request.rsi, request.stoch_k, request.trend
    )
}

/// Text of `choices[0].message.content`, if present and non-empty.
pub fn extract_text(body: &serde_json::Value) -> Option<String> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// [`Narrator`] backed by the AI relay endpoint.
pub struct RelayNarrator {
    relay_url: String,
    http: Client,
}

impl RelayNarrator {
    pub fn new(relay_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            relay_url: relay_url.into(),
            http,
        })
    }

    /// Post `prompt` to the relay and return the raw provider JSON.
    pub async fn ask(&self, prompt: &str) -> Result<serde_json::Value> {
        let resp = self
            .http
            .post(&self.relay_url)
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body: RelayError = resp.json().await.unwrap_or_default();
            return Err(Error::Http(format!(
                "relay returned {status}: {}",
                body.error.unwrap_or_default()
            )));
        }

        resp.json().await.map_err(|e| Error::Http(e.to_string()))
    }
}

#[async_trait]
impl Narrator for RelayNarrator {
    async fn narrate(&self, request: &NarrationRequest) -> String {
        let prompt = build_prompt(request);
        match self.ask(&prompt).await {
            Ok(body) => match extract_text(&body) {
                Some(text) => {
                    debug!(pair = %request.pair_name, chars = text.len(), "Narration received");
                    text
                }
                None => {
                    warn!(pair = %request.pair_name, "Relay response had no completion text");
                    INCONCLUSIVE.to_string()
                }
            },
            Err(e) => {
                warn!(pair = %request.pair_name, error = %e, "Narration request failed");
                CONNECTIVITY_FALLBACK.to_string()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RelayError {
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Trend;

    fn request() -> NarrationRequest {
        NarrationRequest {
            pair_name: "AUD/CHF (OTC)".into(),
            price: 0.58213,
            rsi: 71.23456,
            stoch_k: 88.0,
            trend: Trend::Up,
        }
    }

    #[test]
    fn prompt_carries_rounded_indicators() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("Analyze pair: AUD/CHF (OTC)"));
        assert!(prompt.contains("Current Price: 0.58213"));
        assert!(prompt.contains("RSI (14): 71.23"));
        assert!(prompt.contains("Stochastic %K: 88.00"));
        assert!(prompt.contains("Short-term Trend: UP"));
        assert!(prompt.contains("(CALL or PUT)"));
    }

    #[test]
    fn extracts_first_choice() {
        let body = json!({
            "choices": [
                { "message": { "role": "assistant", "content": " Bearish engulfing, PUT. " } },
                { "message": { "content": "ignored" } }
            ]
        });
        assert_eq!(extract_text(&body).as_deref(), Some("Bearish engulfing, PUT."));
    }

    #[test]
    fn missing_or_empty_content_is_none() {
        assert!(extract_text(&json!({})).is_none());
        assert!(extract_text(&json!({ "choices": [] })).is_none());
        assert!(extract_text(&json!({ "choices": [{ "message": { "content": "" } }] })).is_none());
        assert!(extract_text(&json!({ "error": { "message": "quota" } })).is_none());
    }
}
