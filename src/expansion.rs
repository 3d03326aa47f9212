//! Term expansion from synonym tables and embedding similarity.
//!
//! # Architecture
//!
//! - [`TermExpander`]: owns the synonym table, the embedding provider and the
//!   precomputed [`EmbeddingIndex`]; runs the exact, substring and semantic
//!   passes
//! - [`TermExpanderBuilder`]: fluent construction; builds the index once
//! - [`ExpanderConfig`]: serde configuration, loadable from JSON
//! - [`ExpansionPolicy`]: which passes run and whether the input term is kept
//!
//! # Example
//!
//! ```
//! use termweave::embedding::HashingTextEmbedder;
//! use termweave::expansion::TermExpander;
//!
//! # tokio_test::block_on(async {
//! let mut expander = TermExpander::builder()
//!     .embedder(HashingTextEmbedder::default())
//!     .custom_synonyms([("boston", vec!["Beantown", "The Hub"])])
//!     .build()
//!     .await
//!     .unwrap();
//!
//! let terms = expander.expand("NYC").await;
//! assert!(terms.contains("the big apple"));
//!
//! expander.add_mapping("austin", ["ATX", "Live Music Capital"]);
//! assert!(expander.expand("Austin").await.contains("atx"));
//! # });
//! ```

mod builder;
mod config;
mod expander;
mod index;
mod types;

pub use builder::TermExpanderBuilder;
pub use config::{API_KEY_ENV, DEFAULT_MODEL, DEFAULT_SIMILARITY_THRESHOLD, ExpanderConfig};
pub use expander::{IntoTerms, TermExpander};
pub use index::EmbeddingIndex;
pub use types::{Expansion, ExpansionPolicy, ExpansionType, MatchMode, SemanticMode};
