//! Synonym table: canonical term to ordered alternates.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TermweaveError};

/// Normalize a term for storage and lookup: trim whitespace, lower-case.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// How [`SynonymTable::add`] treats a key that already has expansions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Append new expansions, skipping ones already present.
    #[default]
    Append,
    /// Replace the existing expansions.
    Overwrite,
}

/// On-disk synonym formats accepted by [`SynonymTable::load_from_file`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SynonymFile {
    /// `{ "nyc": ["New York", "The Big Apple"], "mia": "Miami" }`
    Mapping(BTreeMap<String, OneOrMany>),
    /// `[["ml", "machine learning"], ["ai", "artificial intelligence"]]`
    Groups(Vec<Vec<String>>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Mapping from a lower-cased canonical term to its alternates.
///
/// Keys are unique, every key's alternates are unique, and both are stored
/// normalized so lookups are case-insensitive. Entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymTable {
    entries: BTreeMap<String, Vec<String>>,
    merge_policy: MergePolicy,
}

impl SynonymTable {
    /// Create an empty table using [`MergePolicy::Append`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with the given merge policy.
    pub fn with_merge_policy(merge_policy: MergePolicy) -> Self {
        Self {
            entries: BTreeMap::new(),
            merge_policy,
        }
    }

    /// Build a table from `(term, expansions)` pairs.
    pub fn from_mapping<I, K, V, S>(mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        table.merge(mapping);
        table
    }

    /// Build a table from synonym groups.
    ///
    /// Every term in a group maps to all other terms of that group, so
    /// `["big", "large", "huge"]` yields `big -> [large, huge]`,
    /// `large -> [big, huge]` and `huge -> [big, large]`.
    pub fn from_groups<G, S>(groups: G) -> Self
    where
        G: IntoIterator<Item = Vec<S>>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for group in groups {
            table.add_group(&group);
        }
        table
    }

    /// Parse a JSON synonym document (mapping or group list).
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: SynonymFile = serde_json::from_str(content).map_err(|e| {
            TermweaveError::synonym(format!(
                "expected an object of term -> synonyms or an array of synonym groups: {e}"
            ))
        })?;

        Ok(match file {
            SynonymFile::Mapping(mapping) => Self::from_mapping(
                mapping
                    .into_iter()
                    .map(|(term, values)| (term, values.into_vec())),
            ),
            SynonymFile::Groups(groups) => Self::from_groups(groups),
        })
    }

    /// Load a synonym table from a JSON file.
    ///
    /// Two layouts are accepted:
    ///
    /// ```json
    /// { "boston": ["Beantown", "The Hub"], "mia": "Miami" }
    /// ```
    ///
    /// ```json
    /// [["ml", "machine learning"], ["ai", "artificial intelligence"]]
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content).map_err(|e| {
            TermweaveError::synonym(format!(
                "Failed to parse synonym file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Serialize the table as a JSON object of term -> synonyms.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&self.entries)?)
    }

    /// The policy applied by [`add`](Self::add).
    pub fn merge_policy(&self) -> MergePolicy {
        self.merge_policy
    }

    /// Change the policy applied by [`add`](Self::add).
    pub fn set_merge_policy(&mut self, merge_policy: MergePolicy) {
        self.merge_policy = merge_policy;
    }

    /// Add expansions for a term, following the table's merge policy.
    ///
    /// Blank terms are ignored. Blank expansions are skipped. Returns `true`
    /// if the table changed.
    pub fn add<I, S>(&mut self, term: impl AsRef<str>, expansions: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.merge_policy {
            MergePolicy::Append => self.append(term.as_ref(), expansions),
            MergePolicy::Overwrite => self.overwrite(term.as_ref(), expansions),
        }
    }

    /// Merge a mapping into the table.
    ///
    /// Always appends with value-level deduplication, whatever the merge
    /// policy, so merging the same mapping twice is the same as merging it
    /// once. Returns `true` if the table changed.
    pub fn merge<I, K, V, S>(&mut self, mapping: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut changed = false;
        for (term, expansions) in mapping {
            changed |= self.append(term.as_ref(), expansions);
        }
        changed
    }

    /// Merge every entry of another table into this one.
    pub fn merge_table(&mut self, other: &SynonymTable) -> bool {
        self.merge(other.iter())
    }

    /// Get the expansions stored for a term, or an empty slice.
    pub fn lookup(&self, term: &str) -> &[String] {
        self.entries
            .get(&normalize_term(term))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check whether a term is a key of the table.
    pub fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(&normalize_term(term))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Every distinct key and value in the table, sorted.
    pub fn terms(&self) -> Vec<String> {
        let mut terms = BTreeSet::new();
        for (key, values) in &self.entries {
            terms.insert(key.clone());
            terms.extend(values.iter().cloned());
        }
        terms.into_iter().collect()
    }

    /// Keys equal to the term, contained in it, or containing it.
    ///
    /// `term` must already be normalized.
    pub fn matching_keys<'a>(&'a self, term: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.keys()
            .filter(move |key| term.contains(key) || key.contains(term))
    }

    fn append<I, S>(&mut self, term: &str, expansions: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = normalize_term(term);
        if key.is_empty() {
            return false;
        }

        let mut changed = !self.entries.contains_key(&key);
        let values = self.entries.entry(key).or_default();
        for expansion in expansions {
            let value = normalize_term(expansion.as_ref());
            if !value.is_empty() && !values.contains(&value) {
                values.push(value);
                changed = true;
            }
        }
        changed
    }

    fn overwrite<I, S>(&mut self, term: &str, expansions: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = normalize_term(term);
        if key.is_empty() {
            return false;
        }

        let mut values: Vec<String> = Vec::new();
        for expansion in expansions {
            let value = normalize_term(expansion.as_ref());
            if !value.is_empty() && !values.contains(&value) {
                values.push(value);
            }
        }

        self.entries.insert(key, values.clone()) != Some(values)
    }

    fn add_group<S: AsRef<str>>(&mut self, group: &[S]) {
        for (i, term) in group.iter().enumerate() {
            let others = group
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, other)| other.as_ref());
            self.append(term.as_ref(), others);
        }
    }
}
