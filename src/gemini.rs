use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::Settings;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("gemini returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed reply: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

impl<'a> GeminiRequest<'a> {
    /// A single-turn request: the text is the whole payload
    fn single_turn(text: &'a str) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text }],
            }],
        }
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a reply.
///
/// Any missing step, wrong JSON type, or empty string yields `None`.
pub fn reply_text(payload: &Value) -> Option<&str> {
    payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .filter(|text| !text.is_empty())
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Endpoint URL without the key query parameter
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send `text` as a single-turn prompt and return the reply text, if any.
    #[instrument(skip_all, fields(model = %self.model))]
    pub async fn generate(&self, text: &str) -> Result<Option<String>, GeminiError> {
        let url = self.endpoint();
        debug!(%url, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&GeminiRequest::single_turn(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Status { status, body });
        }

        let body = response.text().await?;
        let payload: Value = serde_json::from_str(&body)?;
        debug!(%status, bytes = body.len(), "reply received");

        Ok(reply_text(&payload).map(str::to_string))
    }
}
