//! Generated product descriptions.
//!
//! Calls the Gemini `generateContent` endpoint with a short marketing prompt.
//! [`DescriptionClient::describe`] never fails: an empty answer and a failed
//! call each map to a fixed fallback sentence.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{instrument, warn};
use uhsin_core::Category;

use crate::config::DescriptionConfig;

/// Used when the model answers with no text.
pub const EMPTY_RESPONSE_FALLBACK: &str =
    "A high-quality accessory designed for your modern tech lifestyle.";

/// Used when the service is unconfigured or the call fails.
pub const ERROR_FALLBACK: &str =
    "Premium electronic accessory built for performance and durability.";

/// Errors from the description service.
#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("invalid API key header")]
    InvalidKey,
}

/// Client for the generative description service.
#[derive(Clone)]
pub struct DescriptionClient {
    inner: Arc<DescriptionClientInner>,
}

struct DescriptionClientInner {
    client: reqwest::Client,
    url: String,
}

impl std::fmt::Debug for DescriptionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptionClient")
            .field("url", &self.inner.url)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<String>()
            .trim()
            .to_owned()
    }
}

/// The prompt sent for a product.
#[must_use]
pub fn prompt(name: &str, category: Category) -> String {
    format!(
        "Generate a compelling 20-word product description for a premium electronic accessory \
         named \"{name}\" in the \"{category}\" category. Focus on reliability and modern design."
    )
}

impl DescriptionClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &DescriptionConfig) -> Result<Self, DescribeError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(config.api_key.expose_secret())
                .map_err(|_| DescribeError::InvalidKey)?,
        );

        let client = reqwest::Client::builder().default_headers(headers).build()?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            config.endpoint.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            inner: Arc::new(DescriptionClientInner { client, url }),
        })
    }

    /// Ask the model for a description.
    ///
    /// Returns the trimmed model text, which may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`DescribeError`] on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn generate(&self, name: &str, category: Category) -> Result<String, DescribeError> {
        let prompt = prompt(name, category);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
        };

        let response = self.inner.client.post(&self.inner.url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DescribeError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.text())
    }

    /// A description that is never empty.
    pub async fn describe(&self, name: &str, category: Category) -> String {
        match self.generate(name, category).await {
            Ok(text) if text.is_empty() => EMPTY_RESPONSE_FALLBACK.to_owned(),
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "description generation failed, using fallback");
                ERROR_FALLBACK.to_owned()
            }
        }
    }
}
