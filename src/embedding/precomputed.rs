//! Embedder backed by pre-computed vectors.
//!
//! [`PrecomputedTextEmbedder`] answers from a fixed text -> vector table and
//! never computes anything. It is useful when vectors were produced offline
//! by another system, and in tests that need exact control over
//! similarities. Asking for a text that is not in the table is a provider
//! error, just like an unreachable remote model.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{Result, TermweaveError};
use crate::synonym::normalize_term;
use crate::vector::Vector;

/// Text embedder that looks vectors up instead of computing them.
///
/// Keys are normalized like synonym terms, so lookups are case-insensitive.
///
/// ```
/// use termweave::embedding::{PrecomputedTextEmbedder, TextEmbedder};
///
/// let embedder = PrecomputedTextEmbedder::new(2)
///     .with_vector("nyc", vec![1.0, 0.0]).unwrap()
///     .with_vector("New York", vec![0.9, 0.1]).unwrap();
///
/// assert_eq!(embedder.dimension(), 2);
/// assert!(embedder.contains("new york"));
/// ```
#[derive(Debug, Clone)]
pub struct PrecomputedTextEmbedder {
    vectors: HashMap<String, Vector>,
    dimension: usize,
}

impl PrecomputedTextEmbedder {
    /// Create an empty table for vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            vectors: HashMap::new(),
            dimension,
        }
    }

    /// Insert a vector, replacing any previous one for the same text.
    pub fn insert(&mut self, text: &str, data: Vec<f32>) -> Result<()> {
        let vector = Vector::new(data);
        vector
            .validate_dimension(self.dimension)
            .map_err(|e| TermweaveError::invalid_argument(format!("'{text}': {e}")))?;
        self.vectors.insert(normalize_term(text), vector);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_vector(mut self, text: &str, data: Vec<f32>) -> Result<Self> {
        self.insert(text, data)?;
        Ok(self)
    }

    /// Load vectors from a JSON object of text -> array of numbers.
    ///
    /// The dimension is taken from the first vector; every other vector must
    /// match it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let table: HashMap<String, Vec<f32>> = serde_json::from_str(&content)?;

        let dimension = table.values().next().map(Vec::len).unwrap_or(0);
        let mut embedder = Self::new(dimension);
        for (text, data) in table {
            embedder.insert(&text, data)?;
        }
        Ok(embedder)
    }

    /// Check whether a vector exists for the text.
    pub fn contains(&self, text: &str) -> bool {
        self.vectors.contains_key(&normalize_term(text))
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

#[async_trait]
impl TextEmbedder for PrecomputedTextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        self.vectors
            .get(&normalize_term(text))
            .cloned()
            .ok_or_else(|| TermweaveError::provider(format!("no precomputed vector for '{text}'")))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "precomputed"
    }
}
