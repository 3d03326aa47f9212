//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod fake_openai;

use termweave::embedding::PrecomputedTextEmbedder;

/// Two-dimensional vectors with known cosine similarities:
/// "big apple" scores 0.8 against "nyc"/"new york", "gotham" 0.6.
pub fn city_embedder() -> PrecomputedTextEmbedder {
    let mut embedder = PrecomputedTextEmbedder::new(2);
    for (text, data) in [
        ("nyc", vec![1.0, 0.0]),
        ("new york", vec![1.0, 0.0]),
        ("la", vec![0.0, 1.0]),
        ("los angeles", vec![0.0, 1.0]),
        ("big apple", vec![0.8, 0.6]),
        ("gotham", vec![0.6, 0.8]),
    ] {
        embedder.insert(text, data).unwrap();
    }
    embedder
}
