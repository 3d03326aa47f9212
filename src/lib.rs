//! # termweave
//!
//! Expands a search term into related terms by combining a synonym table
//! with embedding-similarity lookups.
//!
//! ## Features
//!
//! - Case-insensitive synonym tables with defaults for common locations
//! - Exact and substring table matching
//! - Semantic expansion through pluggable embedding providers
//! - A local hashing embedder that needs no network access
//! - OpenAI-compatible remote embeddings and API key diagnostics

pub mod cli;
pub mod credential;
pub mod embedding;
pub mod error;
pub mod expansion;
pub mod synonym;
pub mod vector;

pub mod prelude {
    pub use crate::embedding::{HashingTextEmbedder, TextEmbedder};
    pub use crate::error::{Result, TermweaveError};
    pub use crate::expansion::{ExpanderConfig, Expansion, ExpansionPolicy, TermExpander};
    pub use crate::synonym::{SynonymTable, default_synonyms};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
