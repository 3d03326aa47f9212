//! Text embedding providers for semantic expansion.
//!
//! This module provides a trait-based interface for converting text to
//! vector embeddings, plus three providers:
//!
//! - [`HashingTextEmbedder`] - deterministic local embeddings from hashed
//!   words and character n-grams (model id `hashing-trigram`)
//! - [`OpenAITextEmbedder`] - OpenAI Embeddings API (cloud-based)
//! - [`PrecomputedTextEmbedder`] - a fixed text to vector table
//!
//! Providers are usually created from configuration with
//! [`create_embedder`], which rejects unknown model ids and device selectors
//! up front.
//!
//! # Custom Implementation
//!
//! ```
//! use async_trait::async_trait;
//! use termweave::embedding::TextEmbedder;
//! use termweave::error::Result;
//! use termweave::vector::Vector;
//!
//! struct MyEmbedder {
//!     dimension: usize,
//! }
//!
//! #[async_trait]
//! impl TextEmbedder for MyEmbedder {
//!     async fn embed(&self, _text: &str) -> Result<Vector> {
//!         Ok(Vector::new(vec![0.0; self.dimension]))
//!     }
//!
//!     fn dimension(&self) -> usize {
//!         self.dimension
//!     }
//! }
//! ```

pub mod config;
pub mod hashing_text_embedder;
pub mod openai_text_embedder;
pub mod precomputed;
pub mod text_embedder;

pub use config::{Device, EmbedderConfig, create_embedder};
pub use hashing_text_embedder::HashingTextEmbedder;
pub use openai_text_embedder::OpenAITextEmbedder;
pub use precomputed::PrecomputedTextEmbedder;
pub use text_embedder::TextEmbedder;
