//! Builder for creating TermExpander instances.

use log::{debug, warn};

use crate::embedding::TextEmbedder;
use crate::error::Result;
use crate::synonym::{MergePolicy, SynonymTable, default_synonyms};

use super::config::DEFAULT_SIMILARITY_THRESHOLD;
use super::expander::{TermExpander, validate_threshold};
use super::index::EmbeddingIndex;
use super::types::{ExpansionPolicy, MatchMode, SemanticMode};

/// Builder for creating [`TermExpander`] instances.
///
/// Starts from [`default_synonyms`], no embedding provider, a threshold of
/// [`DEFAULT_SIMILARITY_THRESHOLD`] and the default [`ExpansionPolicy`].
///
/// # Example
///
/// ```rust
/// use termweave::embedding::HashingTextEmbedder;
/// use termweave::expansion::{MatchMode, TermExpander};
///
/// # tokio_test::block_on(async {
/// let expander = TermExpander::builder()
///     .embedder(HashingTextEmbedder::default())
///     .custom_synonyms([("philly", vec!["Philadelphia"])])
///     .match_mode(MatchMode::Substring)
///     .threshold(0.8)
///     .build()
///     .await
///     .unwrap();
///
/// assert!(expander.expand("Philly").await.contains("philadelphia"));
/// # });
/// ```
pub struct TermExpanderBuilder {
    synonyms: SynonymTable,
    custom: SynonymTable,
    embedder: Option<Box<dyn TextEmbedder>>,
    threshold: f32,
    policy: ExpansionPolicy,
    merge_policy: Option<MergePolicy>,
}

impl Default for TermExpanderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TermExpanderBuilder {
    /// Create a new builder seeded with the default synonyms.
    pub fn new() -> Self {
        Self {
            synonyms: default_synonyms(),
            custom: SynonymTable::new(),
            embedder: None,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            policy: ExpansionPolicy::default(),
            merge_policy: None,
        }
    }

    /// Replace the base table (the defaults, unless already replaced).
    pub fn synonyms(mut self, table: SynonymTable) -> Self {
        self.synonyms = table;
        self
    }

    /// Start from an empty table instead of the defaults.
    pub fn without_default_synonyms(self) -> Self {
        self.synonyms(SynonymTable::new())
    }

    /// Merge extra mappings on top of the base table.
    ///
    /// Values already present for a key are skipped.
    pub fn custom_synonyms<I, K, V, S>(mut self, mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.custom.merge(mapping);
        self
    }

    /// Merge every entry of `table` on top of the base table.
    pub fn synonym_table(mut self, table: &SynonymTable) -> Self {
        self.custom.merge_table(table);
        self
    }

    /// Set the embedding provider used for the index and semantic pass.
    pub fn embedder<E: TextEmbedder + 'static>(self, embedder: E) -> Self {
        self.boxed_embedder(Box::new(embedder))
    }

    /// Set an already boxed embedding provider.
    pub fn boxed_embedder(mut self, embedder: Box<dyn TextEmbedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Minimum cosine similarity for semantic matches (default: 0.75).
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn policy(mut self, policy: ExpansionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn match_mode(mut self, match_mode: MatchMode) -> Self {
        self.policy.match_mode = match_mode;
        self
    }

    pub fn semantic_mode(mut self, semantic_mode: SemanticMode) -> Self {
        self.policy.semantic_mode = semantic_mode;
        self
    }

    /// Keep the normalized input term in results (default: true).
    pub fn include_original(mut self, include_original: bool) -> Self {
        self.policy.include_original = include_original;
        self
    }

    /// How [`TermExpander::add_mapping`] treats existing keys.
    pub fn merge_policy(mut self, merge_policy: MergePolicy) -> Self {
        self.merge_policy = Some(merge_policy);
        self
    }

    /// Build the `TermExpander` instance.
    ///
    /// The embedding index is computed here, once. If the provider fails the
    /// expander is still returned, with an empty stale index, so expansion
    /// degrades to table matches.
    ///
    /// # Errors
    ///
    /// A threshold outside `[0, 1]`.
    pub async fn build(self) -> Result<TermExpander> {
        validate_threshold(self.threshold)?;

        let mut synonyms = self.synonyms;
        if let Some(merge_policy) = self.merge_policy {
            synonyms.set_merge_policy(merge_policy);
        }
        synonyms.merge_table(&self.custom);

        let index = match &self.embedder {
            Some(embedder) => match EmbeddingIndex::build(&synonyms, embedder.as_ref()).await {
                Ok(index) => index,
                Err(e) => {
                    warn!(
                        "Failed to build embedding index with {}: {}; \
                         semantic expansion is unavailable until the index is rebuilt",
                        embedder.name(),
                        e
                    );
                    let mut index = EmbeddingIndex::empty();
                    index.mark_stale();
                    index
                }
            },
            None => {
                debug!("No embedding provider configured, semantic expansion disabled");
                EmbeddingIndex::empty()
            }
        };

        Ok(TermExpander {
            synonyms,
            embedder: self.embedder,
            index,
            threshold: self.threshold,
            policy: self.policy,
        })
    }
}
