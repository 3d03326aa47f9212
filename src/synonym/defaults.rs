//! Built-in synonym defaults.

use super::table::SynonymTable;

/// City, country and region abbreviations.
pub const LOCATION_SYNONYMS: &[(&str, &[&str])] = &[
    // US cities
    (
        "NYC",
        &[
            "New York",
            "New York City",
            "NYC",
            "The Big Apple",
            "Manhattan",
            "NY",
        ],
    ),
    ("LA", &["Los Angeles", "City of Angels"]),
    ("SF", &["San Francisco", "The City", "Frisco"]),
    ("CHI", &["Chicago", "Windy City"]),
    ("MIA", &["Miami"]),
    ("LAS", &["Las Vegas", "Vegas"]),
    // International
    ("LON", &["London", "London, UK", "London, England"]),
    ("PAR", &["Paris", "Paris, France"]),
    ("TYO", &["Tokyo", "Tokyo, Japan"]),
    ("SYD", &["Sydney", "Sydney, Australia"]),
    // Countries
    ("US", &["USA", "United States", "United States of America"]),
    (
        "UK",
        &["United Kingdom", "Great Britain", "Britain", "England", "GB"],
    ),
];

/// Travel vocabulary.
pub const TRAVEL_TERMS: &[(&str, &[&str])] = &[
    ("hotel", &["accommodation", "lodging", "inn", "motel"]),
    ("flight", &["airfare", "airline ticket", "plane ticket"]),
    ("vacation", &["holiday", "trip", "getaway"]),
    ("beach", &["seaside", "shore", "coast"]),
    ("mountain", &["alpine", "highland", "peak"]),
];

/// Build a fresh table holding every built-in default.
///
/// Each call returns an independent table; mutating it never affects later
/// calls.
pub fn default_synonyms() -> SynonymTable {
    let mut table = SynonymTable::new();
    for (term, expansions) in LOCATION_SYNONYMS.iter().chain(TRAVEL_TERMS) {
        table.add(term, expansions.iter());
    }
    table
}
