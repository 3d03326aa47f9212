//! Hashing-based text embedder (no model files, no network).
//!
//! Text is lower-cased and broken into features:
//!
//! 1. whole words (Unicode word boundaries), weighted double
//! 2. character trigrams of the padded text
//! 3. character bigrams of the padded text
//!
//! Each feature is hashed (FNV-1a) to a bucket in `[0, dimension)` and
//! added with a sign taken from the top bit of the hash, which keeps
//! collisions from piling up in one direction. The result is L2-normalized.
//! Texts that share spelling share buckets, so abbreviations and their
//! expansions are only close when they overlap lexically.

use async_trait::async_trait;
use unicode_segmentation::UnicodeSegmentation;

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{Result, TermweaveError};
use crate::vector::Vector;

/// Model id prefix for this embedder.
pub const HASHING_MODEL: &str = "hashing-trigram";

/// Bucket count used when the model id has no `-<dim>` suffix.
pub const DEFAULT_HASHING_DIMENSION: usize = 256;

/// Largest accepted bucket count.
pub const MAX_HASHING_DIMENSION: usize = 65_536;

const WORD_WEIGHT: f32 = 2.0;
const TRIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.5;

/// Deterministic embedder hashing words and character n-grams.
#[derive(Debug, Clone)]
pub struct HashingTextEmbedder {
    dimension: usize,
    name: String,
}

impl Default for HashingTextEmbedder {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_HASHING_DIMENSION,
            name: HASHING_MODEL.to_string(),
        }
    }
}

impl HashingTextEmbedder {
    /// Create an embedder with the given number of buckets, at most
    /// [`MAX_HASHING_DIMENSION`].
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(TermweaveError::invalid_config(
                "hashing embedder dimension must be greater than zero",
            ));
        }
        if dimension > MAX_HASHING_DIMENSION {
            return Err(TermweaveError::invalid_config(format!(
                "hashing embedder dimension {dimension} exceeds {MAX_HASHING_DIMENSION}"
            )));
        }

        Ok(Self {
            dimension,
            name: format!("{HASHING_MODEL}-{dimension}"),
        })
    }

    /// Create an embedder from a model id: `hashing-trigram` or
    /// `hashing-trigram-<dimension>`.
    pub fn from_model_id(model: &str) -> Result<Self> {
        let Some(rest) = model.strip_prefix(HASHING_MODEL) else {
            return Err(TermweaveError::invalid_config(format!(
                "not a hashing model id: {model}"
            )));
        };

        if rest.is_empty() {
            return Ok(Self::default());
        }

        let dimension = rest
            .strip_prefix('-')
            .and_then(|dim| dim.parse::<usize>().ok())
            .ok_or_else(|| {
                TermweaveError::invalid_config(format!(
                    "invalid hashing model id '{model}', expected {HASHING_MODEL}-<dimension>"
                ))
            })?;

        Self::new(dimension)
    }

    /// Check whether a model id names this embedder.
    pub fn accepts_model_id(model: &str) -> bool {
        model.starts_with(HASHING_MODEL)
    }

    /// Compute the embedding synchronously.
    pub fn embed_text(&self, text: &str) -> Vector {
        let mut buckets = vec![0.0f32; self.dimension];
        let normalized = text.trim().to_lowercase();

        for word in normalized.unicode_words() {
            self.add_feature(&mut buckets, b'w', word, WORD_WEIGHT);
        }

        let padded: Vec<char> = format!("__{}__", normalized.replace(char::is_whitespace, "_"))
            .chars()
            .collect();

        let mut gram = String::with_capacity(12);
        for window in padded.windows(3) {
            gram.clear();
            gram.extend(window);
            self.add_feature(&mut buckets, b't', &gram, TRIGRAM_WEIGHT);
        }
        for window in padded.windows(2) {
            gram.clear();
            gram.extend(window);
            self.add_feature(&mut buckets, b'b', &gram, BIGRAM_WEIGHT);
        }

        let mut vector = Vector::new(buckets);
        vector.normalize();
        vector
    }

    fn add_feature(&self, buckets: &mut [f32], kind: u8, feature: &str, weight: f32) {
        let hash = fnv1a(kind, feature);
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        buckets[bucket] += sign * weight;
    }
}

/// FNV-1a over a feature-kind tag followed by the feature bytes.
#[inline]
fn fnv1a(kind: u8, feature: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in std::iter::once(kind).chain(feature.bytes()) {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[async_trait]
impl TextEmbedder for HashingTextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        Ok(self.embed_text(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::cosine_similarity;

    fn similarity(embedder: &HashingTextEmbedder, a: &str, b: &str) -> f32 {
        cosine_similarity(&embedder.embed_text(a).data, &embedder.embed_text(b).data).unwrap()
    }

    #[test]
    fn test_deterministic() {
        let embedder = HashingTextEmbedder::default();
        assert_eq!(embedder.embed_text("New York"), embedder.embed_text("New York"));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let embedder = HashingTextEmbedder::default();
        assert_eq!(embedder.embed_text("  NEW YORK "), embedder.embed_text("new york"));
    }

    #[test]
    fn test_dimension_and_unit_norm() {
        let embedder = HashingTextEmbedder::new(64).unwrap();
        let vector = embedder.embed_text("the big apple");

        assert_eq!(vector.dimension(), 64);
        assert!((vector.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_lexical_overlap_ranks_higher() {
        let embedder = HashingTextEmbedder::default();
        let close = similarity(&embedder, "new york", "new york city");
        let far = similarity(&embedder, "new york", "tokyo");

        assert!(close > far, "close={close} far={far}");
        assert!(close > 0.5, "close={close}");
    }

    #[test]
    fn test_model_ids() {
        assert_eq!(
            HashingTextEmbedder::from_model_id("hashing-trigram")
                .unwrap()
                .dimension,
            DEFAULT_HASHING_DIMENSION
        );

        let embedder = HashingTextEmbedder::from_model_id("hashing-trigram-512").unwrap();
        assert_eq!(embedder.dimension, 512);
        assert_eq!(embedder.name(), "hashing-trigram-512");

        assert!(HashingTextEmbedder::from_model_id("hashing-trigram-0").is_err());
        assert!(HashingTextEmbedder::from_model_id("hashing-trigram-big").is_err());
        assert!(HashingTextEmbedder::from_model_id("all-MiniLM-L6-v2").is_err());
    }

    #[test]
    fn test_dimension_upper_bound() {
        let embedder = HashingTextEmbedder::new(MAX_HASHING_DIMENSION).unwrap();
        assert_eq!(embedder.dimension, MAX_HASHING_DIMENSION);

        assert!(matches!(
            HashingTextEmbedder::new(MAX_HASHING_DIMENSION + 1),
            Err(TermweaveError::InvalidConfig(_))
        ));
        assert!(matches!(
            HashingTextEmbedder::from_model_id("hashing-trigram-18446744073709551615"),
            Err(TermweaveError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_embed_batch_matches_embed() {
        let embedder = HashingTextEmbedder::default();
        let batch = embedder.embed_batch(&["paris", "london"]).await.unwrap();

        assert_eq!(batch[0], embedder.embed("paris").await.unwrap());
        assert_eq!(batch[1], embedder.embed("london").await.unwrap());
    }
}
