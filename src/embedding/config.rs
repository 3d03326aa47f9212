//! Provider selection from configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::embedding::hashing_text_embedder::HashingTextEmbedder;
use crate::embedding::openai_text_embedder::{OpenAITextEmbedder, SUPPORTED_MODELS};
use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{Result, TermweaveError};

/// Compute device requested for the embedding model.
///
/// Only local providers care about it; remote providers ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Cpu,
    #[serde(alias = "cuda")]
    Gpu,
}

impl FromStr for Device {
    type Err = TermweaveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "gpu" | "cuda" => Ok(Device::Gpu),
            other => Err(TermweaveError::invalid_config(format!(
                "Unknown device: {other}. Expected 'cpu' or 'gpu'"
            ))),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Gpu => write!(f, "gpu"),
        }
    }
}

/// Everything needed to construct an embedding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedderConfig {
    /// Model identifier, e.g. `hashing-trigram` or `text-embedding-3-small`.
    pub model: String,
    pub device: Device,
    /// API key for remote models.
    pub api_key: Option<String>,
    /// API root for remote models; defaults to the public OpenAI endpoint.
    pub api_base_url: Option<String>,
}

impl EmbedderConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            device: Device::Cpu,
            api_key: None,
            api_base_url: None,
        }
    }
}

/// Create the embedding provider named by `config.model`.
///
/// # Errors
///
/// Configuration errors for an unknown model id, a GPU request to a CPU-only
/// provider, or a remote model without an API key.
pub fn create_embedder(config: &EmbedderConfig) -> Result<Box<dyn TextEmbedder>> {
    let model = config.model.trim();

    if HashingTextEmbedder::accepts_model_id(model) {
        if config.device != Device::Cpu {
            return Err(TermweaveError::invalid_config(format!(
                "model '{model}' only runs on cpu, got device '{}'",
                config.device
            )));
        }
        return Ok(Box::new(HashingTextEmbedder::from_model_id(model)?));
    }

    if OpenAITextEmbedder::accepts_model_id(model) {
        let api_key = config.api_key.clone().unwrap_or_default();
        let mut embedder = OpenAITextEmbedder::new(api_key, model.to_string())?;
        if let Some(base_url) = &config.api_base_url {
            embedder = embedder.with_base_url(base_url.as_str());
        }
        return Ok(Box::new(embedder));
    }

    Err(TermweaveError::invalid_config(format!(
        "Unknown embedding model: '{model}'. Supported models: hashing-trigram[-<dim>], {}",
        SUPPORTED_MODELS.join(", ")
    )))
}
