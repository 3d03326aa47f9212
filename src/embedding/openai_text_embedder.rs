//! OpenAI API-based text embedder implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{Result, TermweaveError};
use crate::vector::Vector;

/// Default API root for OpenAI-compatible services.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Models accepted by [`OpenAITextEmbedder::new`].
pub const SUPPORTED_MODELS: &[&str] = &[
    "text-embedding-3-small",
    "text-embedding-3-large",
    "text-embedding-ada-002",
];

/// Request structure for OpenAI Embeddings API.
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    /// Model identifier to use for embeddings.
    model: &'a str,
    /// Input texts to embed (batch).
    input: &'a [&'a str],
    /// Optional custom dimension (only for newer models).
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

/// Response structure from OpenAI Embeddings API.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

/// Individual embedding data from API response.
#[derive(Debug, Deserialize)]
struct EmbeddingData {
    /// Position of the input this embedding belongs to.
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

/// OpenAI API-based text embedder.
///
/// Requires an API key and network access. All failures after construction
/// (transport, non-success status, malformed body) are provider errors.
///
/// # Examples
///
/// ```no_run
/// use termweave::embedding::{OpenAITextEmbedder, TextEmbedder};
///
/// # async fn example() -> termweave::error::Result<()> {
/// let embedder = OpenAITextEmbedder::new(
///     std::env::var("OPENAI_API_KEY").unwrap_or_default(),
///     "text-embedding-3-small".to_string(),
/// )?;
///
/// let vectors = embedder.embed_batch(&["NYC", "New York"]).await?;
/// assert_eq!(vectors.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenAITextEmbedder {
    client: Client,
    api_key: String,
    model: String,
    dimension: usize,
    base_url: String,
}

impl OpenAITextEmbedder {
    /// Create a new OpenAI embedder.
    ///
    /// # Supported Models
    ///
    /// - `text-embedding-3-small` - 1536 dimensions, fast and cost-effective
    /// - `text-embedding-3-large` - 3072 dimensions, highest quality
    /// - `text-embedding-ada-002` - 1536 dimensions, legacy model
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the model name is not recognized or
    /// the API key is blank.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let dimension = Self::default_dimension(&model).ok_or_else(|| {
            TermweaveError::invalid_config(format!(
                "Unknown OpenAI embedding model: {}. Supported models: {}",
                model,
                SUPPORTED_MODELS.join(", ")
            ))
        })?;

        Self::with_dimension(api_key, model, dimension)
    }

    /// Create an embedder with a custom dimension.
    ///
    /// The `text-embedding-3-*` models accept reduced dimensions for lower
    /// cost and storage.
    pub fn with_dimension(api_key: String, model: String, dimension: usize) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(TermweaveError::invalid_config(
                "an API key is required for OpenAI embedding models (set OPENAI_API_KEY)",
            ));
        }
        if dimension == 0 {
            return Err(TermweaveError::invalid_config(
                "embedding dimension must be greater than zero",
            ));
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            model,
            dimension,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Point the embedder at another OpenAI-compatible API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Check whether a model id is one of [`SUPPORTED_MODELS`].
    pub fn accepts_model_id(model: &str) -> bool {
        Self::default_dimension(model).is_some()
    }

    /// Standard embedding dimension for each supported model.
    fn default_dimension(model: &str) -> Option<usize> {
        match model {
            "text-embedding-3-small" => Some(1536),
            "text-embedding-3-large" => Some(3072),
            "text-embedding-ada-002" => Some(1536),
            _ => None,
        }
    }

    async fn request(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        let dimensions = match Self::default_dimension(&self.model) {
            Some(default) if default == self.dimension => None,
            _ => Some(self.dimension),
        };

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions,
        };

        let http_response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TermweaveError::provider(format!("OpenAI API request failed: {e}")))?;

        let status = http_response.status();
        let response_text = http_response.text().await.map_err(|e| {
            TermweaveError::provider(format!("Failed to read response text: {e}"))
        })?;

        if !status.is_success() {
            return Err(TermweaveError::provider(format!(
                "OpenAI API error (status {status}): {response_text}"
            )));
        }

        let response: EmbeddingResponse = serde_json::from_str(&response_text).map_err(|e| {
            TermweaveError::provider(format!(
                "Failed to parse OpenAI response: {e}. Response text: {response_text}"
            ))
        })?;

        if response.data.len() != texts.len() {
            return Err(TermweaveError::provider(format!(
                "OpenAI returned {} embeddings for {} inputs",
                response.data.len(),
                texts.len()
            )));
        }

        let mut data = response.data;
        // Entries carry their input position; keep the output aligned with `texts`.
        data.sort_by_key(|d| d.index.unwrap_or(usize::MAX));

        data.into_iter()
            .map(|d| {
                let vector = Vector::new(d.embedding);
                vector.validate_dimension(self.dimension)?;
                Ok(vector)
            })
            .collect()
    }
}

#[async_trait]
impl TextEmbedder for OpenAITextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        self.request(&[text])
            .await?
            .pop()
            .ok_or_else(|| TermweaveError::provider("No embedding in response"))
    }

    /// Embed every text with a single API request.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model
    }
}
