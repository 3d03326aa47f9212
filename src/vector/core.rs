//! Core data structures for vector comparison.
//!
//! This module contains the vector representation produced by embedding
//! providers and the cosine similarity used to threshold semantic matches.

pub mod distance;
pub mod vector;
