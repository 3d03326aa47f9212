//! Core TermExpander implementation.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};

use crate::embedding::{TextEmbedder, create_embedder};
use crate::error::{Result, TermweaveError};
use crate::synonym::{SynonymTable, normalize_term};

use super::builder::TermExpanderBuilder;
use super::config::ExpanderConfig;
use super::index::EmbeddingIndex;
use super::types::{Expansion, ExpansionPolicy, ExpansionType, MatchMode, SemanticMode};

/// Inputs accepted by [`TermExpander::expand_many`]: a single term or any
/// sequence of terms.
pub trait IntoTerms {
    fn into_terms(self) -> Vec<String>;
}

impl IntoTerms for &str {
    fn into_terms(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoTerms for String {
    fn into_terms(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoTerms for &String {
    fn into_terms(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<S: AsRef<str>> IntoTerms for Vec<S> {
    fn into_terms(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>> IntoTerms for &[S] {
    fn into_terms(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>, const N: usize> IntoTerms for [S; N] {
    fn into_terms(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

/// Accumulates expansions; the first provenance recorded for a term wins.
struct ExpansionCollector<'a> {
    original: &'a str,
    include_original: bool,
    entries: BTreeMap<String, Expansion>,
}

impl<'a> ExpansionCollector<'a> {
    fn new(original: &'a str, include_original: bool) -> Self {
        Self {
            original,
            include_original,
            entries: BTreeMap::new(),
        }
    }

    /// Returns true if `term` was new and is not the original input.
    fn push(
        &mut self,
        term: &str,
        expansion_type: ExpansionType,
        source: &str,
        confidence: f32,
    ) -> bool {
        let is_original = term == self.original;
        if is_original && !self.include_original {
            return false;
        }
        if self.entries.contains_key(term) {
            return false;
        }

        self.entries.insert(
            term.to_string(),
            Expansion {
                term: term.to_string(),
                expansion_type,
                source: source.to_string(),
                confidence,
            },
        );
        !is_original
    }

    fn into_expansions(self) -> Vec<Expansion> {
        self.entries.into_values().collect()
    }
}

/// Expands search terms through a synonym table and embedding similarity.
///
/// The expander owns its embedding provider for its whole lifetime; the
/// embedding index is built once at construction and rebuilt only through
/// [`rebuild_index`](Self::rebuild_index).
pub struct TermExpander {
    pub(super) synonyms: SynonymTable,
    pub(super) embedder: Option<Box<dyn TextEmbedder>>,
    pub(super) index: EmbeddingIndex,
    pub(super) threshold: f32,
    pub(super) policy: ExpansionPolicy,
}

impl std::fmt::Debug for TermExpander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermExpander")
            .field("synonyms", &self.synonyms.len())
            .field("embedder", &self.embedder.as_ref().map(|e| e.name()))
            .field("index", &self.index.len())
            .field("threshold", &self.threshold)
            .field("policy", &self.policy)
            .finish()
    }
}

/// Reject thresholds outside `[0, 1]` (including NaN).
pub(super) fn validate_threshold(threshold: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(TermweaveError::invalid_config(format!(
            "similarity threshold must be within [0, 1], got {threshold}"
        )));
    }
    Ok(())
}

impl TermExpander {
    /// Create a new builder seeded with the default synonyms.
    pub fn builder() -> TermExpanderBuilder {
        TermExpanderBuilder::new()
    }

    /// Construct an expander from configuration.
    ///
    /// Creates the embedding provider named by `config.model`, loads the
    /// synonym file if one is set, and builds the embedding index.
    pub async fn from_config(config: &ExpanderConfig) -> Result<Self> {
        config.validate()?;

        let embedder = create_embedder(&config.embedder_config())?;
        let mut builder = TermExpanderBuilder::new()
            .boxed_embedder(embedder)
            .threshold(config.threshold)
            .policy(config.policy())
            .merge_policy(config.merge_policy);

        if !config.use_default_synonyms {
            builder = builder.synonyms(SynonymTable::new());
        }
        if let Some(path) = &config.synonyms_file {
            builder = builder.synonym_table(&SynonymTable::load_from_file(path)?);
        }

        builder.custom_synonyms(&config.custom_synonyms).build().await
    }

    /// Expand a term into the set of related terms.
    ///
    /// Blank input yields an empty set. Provider failures are logged and the
    /// result falls back to table matches.
    pub async fn expand(&self, term: &str) -> BTreeSet<String> {
        self.expand_detailed(term)
            .await
            .into_iter()
            .map(|expansion| expansion.term)
            .collect()
    }

    /// Expand a term, reporting how each result was found.
    ///
    /// Results are sorted by term.
    pub async fn expand_detailed(&self, term: &str) -> Vec<Expansion> {
        let normalized = normalize_term(term);
        if normalized.is_empty() {
            return Vec::new();
        }

        let mut collector = ExpansionCollector::new(&normalized, self.policy.include_original);
        collector.push(&normalized, ExpansionType::Original, &normalized, 1.0);

        let mut table_hit = false;
        for value in self.synonyms.lookup(&normalized) {
            table_hit |= collector.push(value, ExpansionType::Exact, &normalized, 1.0);
        }

        if self.policy.match_mode == MatchMode::Substring {
            for key in self.synonyms.matching_keys(&normalized) {
                if key == normalized {
                    continue;
                }
                table_hit |= collector.push(key, ExpansionType::Substring, key, 1.0);
                for value in self.synonyms.lookup(key) {
                    table_hit |= collector.push(value, ExpansionType::Substring, key, 1.0);
                }
            }
        }

        let run_semantic = match self.policy.semantic_mode {
            SemanticMode::Disabled => false,
            SemanticMode::Always => true,
            SemanticMode::Fallback => !table_hit,
        };

        if run_semantic {
            match self.semantic_matches(&normalized).await {
                Ok(matches) => {
                    for (similar, score) in matches {
                        collector.push(&similar, ExpansionType::Semantic, &similar, score);
                        for value in self.synonyms.lookup(&similar) {
                            collector.push(value, ExpansionType::Semantic, &similar, score);
                        }
                    }
                }
                Err(e) => {
                    warn!("Could not get semantic expansion for '{normalized}': {e}");
                }
            }
        }

        collector.into_expansions()
    }

    /// Expand several terms and return the sorted, deduplicated union.
    ///
    /// Accepts a single term (`"NYC"`) or any sequence of terms.
    pub async fn expand_many<T: IntoTerms>(&self, terms: T) -> Vec<String> {
        let mut union = BTreeSet::new();
        for term in terms.into_terms() {
            union.extend(self.expand(&term).await);
        }
        union.into_iter().collect()
    }

    /// Add expansions for a term using the table's merge policy.
    ///
    /// The embedding index is marked stale, not rebuilt.
    pub fn add_mapping<I, S>(&mut self, term: &str, expansions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.synonyms.add(term, expansions) {
            self.index.mark_stale();
        }
    }

    /// Merge a mapping of term -> expansions, skipping duplicate values.
    ///
    /// The embedding index is marked stale, not rebuilt.
    pub fn add_synonyms<I, K, V, S>(&mut self, mapping: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.synonyms.merge(mapping) {
            self.index.mark_stale();
        }
    }

    /// Expansions stored in the table for a term.
    pub fn lookup(&self, term: &str) -> &[String] {
        self.synonyms.lookup(term)
    }

    /// Re-embed every term of the current table.
    ///
    /// Unlike construction, a provider failure here is returned to the
    /// caller and the previous index is kept.
    pub async fn rebuild_index(&mut self) -> Result<()> {
        let Some(embedder) = &self.embedder else {
            return Ok(());
        };
        self.index = EmbeddingIndex::build(&self.synonyms, embedder.as_ref()).await?;
        Ok(())
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    /// True when the table changed after the index was built.
    pub fn index_is_stale(&self) -> bool {
        self.index.is_stale()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Change the similarity threshold; must be within `[0, 1]`.
    pub fn set_threshold(&mut self, threshold: f32) -> Result<()> {
        validate_threshold(threshold)?;
        self.threshold = threshold;
        Ok(())
    }

    pub fn policy(&self) -> ExpansionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ExpansionPolicy) {
        self.policy = policy;
    }

    /// Name of the embedding provider, if one is attached.
    pub fn embedder_name(&self) -> Option<&str> {
        self.embedder.as_ref().map(|e| e.name())
    }

    async fn semantic_matches(&self, text: &str) -> Result<Vec<(String, f32)>> {
        let Some(embedder) = &self.embedder else {
            return Ok(Vec::new());
        };
        if self.index.is_empty() {
            debug!("Embedding index is empty, skipping semantic pass for '{text}'");
            return Ok(Vec::new());
        }

        let query = embedder.embed(text).await?;
        if !query.is_valid() {
            return Err(TermweaveError::provider(format!(
                "{} produced a non-finite embedding for '{}'",
                embedder.name(),
                text
            )));
        }

        self.index.find_similar(&query, self.threshold)
    }
}
