//! Cosine similarity between embedding vectors.

use crate::error::{Result, TermweaveError};

/// Calculate the cosine similarity (normalized dot product) of two vectors.
///
/// Returns a value in `[-1, 1]`. Zero vectors have similarity `0.0` with
/// everything, so they never pass a positive threshold.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(TermweaveError::provider(format!(
            "Vector dimensions must match for similarity calculation: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0))
}
