//! Precomputed embeddings for every term in a synonym table.

use std::collections::BTreeMap;

use log::debug;

use crate::embedding::TextEmbedder;
use crate::error::{Result, TermweaveError};
use crate::synonym::SynonymTable;
use crate::vector::{Vector, cosine_similarity};

/// Term -> vector map covering every key and value of a synonym table.
///
/// Built in one batched provider call and read-only afterwards. When the
/// table changes the index is only marked stale; callers rebuild it
/// explicitly.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingIndex {
    vectors: BTreeMap<String, Vector>,
    dimension: Option<usize>,
    stale: bool,
}

impl EmbeddingIndex {
    /// An index with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Embed every term of `table` with `embedder`.
    ///
    /// # Errors
    ///
    /// Provider errors from the batch call, a batch whose length does not
    /// match the input, vectors with mixed dimensions, or non-finite values.
    pub async fn build(table: &SynonymTable, embedder: &dyn TextEmbedder) -> Result<Self> {
        let terms = table.terms();
        if terms.is_empty() {
            return Ok(Self::empty());
        }

        let texts: Vec<&str> = terms.iter().map(String::as_str).collect();
        let vectors = embedder.embed_batch(&texts).await?;

        if vectors.len() != terms.len() {
            return Err(TermweaveError::provider(format!(
                "{} returned {} embeddings for {} terms",
                embedder.name(),
                vectors.len(),
                terms.len()
            )));
        }

        let dimension = vectors[0].dimension();
        let mut index = BTreeMap::new();
        for (term, vector) in terms.into_iter().zip(vectors) {
            vector.validate_dimension(dimension)?;
            if !vector.is_valid() {
                return Err(TermweaveError::provider(format!(
                    "{} produced a non-finite embedding for '{}'",
                    embedder.name(),
                    term
                )));
            }
            index.insert(term, vector);
        }

        debug!(
            "Built embedding index with {} terms (dimension {}) using {}",
            index.len(),
            dimension,
            embedder.name()
        );

        Ok(Self {
            vectors: index,
            dimension: Some(dimension),
            stale: false,
        })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimension shared by all vectors, if any were indexed.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vectors.contains_key(term)
    }

    pub fn get(&self, term: &str) -> Option<&Vector> {
        self.vectors.get(term)
    }

    /// True once the source table changed after the last build.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Every indexed term whose cosine similarity to `query` is at least
    /// `threshold`, highest score first (ties by term).
    ///
    /// All qualifying entries are returned; there is no cap.
    pub fn find_similar(&self, query: &Vector, threshold: f32) -> Result<Vec<(String, f32)>> {
        let mut matches = Vec::new();
        for (term, vector) in &self.vectors {
            let score = cosine_similarity(&query.data, &vector.data)?;
            if score >= threshold {
                matches.push((term.clone(), score));
            }
        }

        matches.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(matches)
    }
}
