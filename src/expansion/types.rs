//! Common types and enums for term expansion.

use serde::{Deserialize, Serialize};

/// How a term entered an expansion result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionType {
    /// The normalized input term itself.
    Original,
    /// The input equals a synonym table key.
    Exact,
    /// A table key contains, or is contained in, the input.
    Substring,
    /// Embedding similarity reached the threshold.
    Semantic,
}

/// A single expanded term with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expansion {
    /// The expanded term (normalized).
    pub term: String,
    /// Type of expansion.
    pub expansion_type: ExpansionType,
    /// Table key or index term that produced this expansion.
    pub source: String,
    /// 1.0 for table matches, the cosine similarity for semantic ones.
    pub confidence: f32,
}

/// Which table lookups run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Only a key equal to the input matches.
    #[default]
    Exact,
    /// Equality plus containment in either direction.
    Substring,
}

/// When the semantic pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticMode {
    /// Only when the table contributed nothing.
    #[default]
    Fallback,
    /// On every call, in addition to table matches.
    Always,
    /// Never.
    #[serde(alias = "off")]
    Disabled,
}

/// Switches controlling [`TermExpander::expand`](super::TermExpander::expand).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionPolicy {
    pub match_mode: MatchMode,
    pub semantic_mode: SemanticMode,
    /// Keep the normalized input term in the result.
    pub include_original: bool,
}

impl Default for ExpansionPolicy {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::Exact,
            semantic_mode: SemanticMode::Fallback,
            include_original: true,
        }
    }
}
