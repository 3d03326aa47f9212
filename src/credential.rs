//! API key diagnostics for OpenAI-compatible services.
//!
//! [`CredentialChecker`] makes one cheap authenticated request (`GET /models`)
//! and classifies the outcome. A key that checks out can be followed up with
//! [`CredentialChecker::check_functional`], a one-input embedding request that
//! confirms the API does real work. Neither returns an error: every failure
//! mode, including transport failures, is reported as a [`CredentialStatus`].

use std::fmt;

use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::embedding::openai_text_embedder::OPENAI_API_BASE;

/// Model used by the follow-up embedding request.
pub const FUNCTIONAL_CHECK_MODEL: &str = "text-embedding-3-small";

const FUNCTIONAL_CHECK_INPUT: &str = "Say this is a test";

/// Outcome of a credential check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum CredentialStatus {
    Valid,
    InvalidKey,
    MissingKey,
    RateLimited,
    OtherError(String),
}

impl CredentialStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, CredentialStatus::Valid)
    }

    /// Human-readable summary.
    pub fn message(&self) -> String {
        match self {
            CredentialStatus::Valid => "API key is valid and working".to_string(),
            CredentialStatus::InvalidKey => {
                "Invalid API key. Please check your key and try again".to_string()
            }
            CredentialStatus::MissingKey => "No API key provided".to_string(),
            CredentialStatus::RateLimited => {
                "Rate limited, the key could not be verified".to_string()
            }
            CredentialStatus::OtherError(reason) => format!("Error: {reason}"),
        }
    }
}

impl fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extract `error.message` from an OpenAI-style error body, else the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Map an HTTP response to a [`CredentialStatus`].
pub fn classify_status(status: StatusCode, body: &str) -> CredentialStatus {
    if status.is_success() {
        return CredentialStatus::Valid;
    }

    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED if message.contains("didn't provide an API key") => {
            CredentialStatus::MissingKey
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CredentialStatus::InvalidKey,
        StatusCode::TOO_MANY_REQUESTS => CredentialStatus::RateLimited,
        _ if message.is_empty() => CredentialStatus::OtherError(format!("HTTP {status}")),
        _ => CredentialStatus::OtherError(format!("HTTP {status}: {message}")),
    }
}

#[derive(Debug, Serialize)]
struct FunctionalRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

/// Classify a response, reading its body for the error message.
async fn classify_response(response: Response) -> CredentialStatus {
    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            debug!("Failed to read {status} response body: {e}");
            String::new()
        }
    };
    classify_status(status, &body)
}

fn usable_key(api_key: Option<&str>) -> Option<&str> {
    api_key.map(str::trim).filter(|key| !key.is_empty())
}

/// Validates API keys against an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct CredentialChecker {
    client: Client,
    base_url: String,
}

impl Default for CredentialChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialChecker {
    /// Checker for the public OpenAI API.
    pub fn new() -> Self {
        Self::with_base_url(OPENAI_API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check a key. A blank or absent key is reported without a request.
    pub async fn check(&self, api_key: Option<&str>) -> CredentialStatus {
        let Some(api_key) = usable_key(api_key) else {
            return CredentialStatus::MissingKey;
        };

        let url = format!("{}/models", self.base_url);
        debug!("Checking API key against {url}");

        match self.client.get(&url).bearer_auth(api_key).send().await {
            Ok(response) => classify_response(response).await,
            Err(e) => CredentialStatus::OtherError(format!("request failed: {e}")),
        }
    }

    /// Embed one short input with `model` to confirm the API answers real
    /// requests. Meant to follow a [`check`](Self::check) that came back valid.
    pub async fn check_functional(&self, api_key: Option<&str>, model: &str) -> CredentialStatus {
        let Some(api_key) = usable_key(api_key) else {
            return CredentialStatus::MissingKey;
        };

        let url = format!("{}/embeddings", self.base_url);
        debug!("Sending a one-input embedding request with '{model}' to {url}");

        let request = FunctionalRequest {
            model,
            input: [FUNCTIONAL_CHECK_INPUT],
        };
        match self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => classify_response(response).await,
            Err(e) => CredentialStatus::OtherError(format!("request failed: {e}")),
        }
    }
}
