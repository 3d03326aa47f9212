//! Dense vectors and the similarity math used by semantic expansion.
//!
//! # Module Structure
//!
//! - `core`: Core data structures (vector, distance)

pub mod core;

pub use self::core::distance::cosine_similarity;
pub use self::core::vector::Vector;
