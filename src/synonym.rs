//! Synonym tables for term expansion.
//!
//! A [`SynonymTable`] maps a canonical, lower-cased term to an ordered list of
//! alternate spellings and names. The built-in defaults live in
//! [`default_synonyms`] and are handed to the expander explicitly, so tests
//! and applications can start from any fixture they like.
//!
//! # Example
//!
//! ```
//! use termweave::synonym::{SynonymTable, default_synonyms};
//!
//! let mut table = default_synonyms();
//! table.add("austin", ["ATX", "Live Music Capital"]);
//!
//! assert!(table.lookup("NYC").contains(&"the big apple".to_string()));
//! assert_eq!(table.lookup("Austin"), ["atx", "live music capital"]);
//! ```

pub mod defaults;
pub mod table;

pub use defaults::{LOCATION_SYNONYMS, TRAVEL_TERMS, default_synonyms};
pub use table::{MergePolicy, SynonymTable, normalize_term};
