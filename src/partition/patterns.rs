//! Compiled classification patterns, built once and shared read-only.

use once_cell::sync::Lazy;
use regex::Regex;

const US_STATE_ABBREVIATIONS: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY", "DC", "PR", "GU", "VI", "AS", "MP",
];

const US_STATE_NAMES: &[&str] = &[
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
    "District of Columbia",
];

/// Bullet characters recognised at the start of a list item.
pub const BULLET_CHARS: &str = "-*•‣◦▪●○·⁃";

/// A line made only of dashes, underscores or equals signs.
pub static PAGE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-_=]{3,}$").expect("Invalid page break regex"));

/// Bullet marker followed by whitespace. The match covers marker and spacing.
pub static BULLET_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^[{}]\s+", regex::escape(BULLET_CHARS))).expect("Invalid bullet regex")
});

/// `1.`, `12)`, `(3)`, `a.`, `b)`, `B)`, `iv.` followed by whitespace.
/// A capital letter needs `)` so that initials like `E. coli` stay prose.
pub static ENUMERATED_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?(?:(?:\d{1,3}|[a-z]|[ivx]{1,4}|[IVX]{1,4})[.)]|[A-Z]\))\s+\S")
        .expect("Invalid enumerator regex")
});

/// `City, ST 12345` or `City, State 12345-6789`, matching the whole text.
pub static CITY_STATE_ZIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^[a-z][a-z.'\- ]{{0,40}},\s*(?:{}|{})\.?,?\s+\d{{5}}(?:-\d{{4}})?$",
        US_STATE_ABBREVIATIONS.join("|"),
        US_STATE_NAMES.join("|"),
    ))
    .expect("Invalid city/state/zip regex")
});

/// An uppercase state abbreviation followed by a ZIP token, anywhere in the text.
pub static STATE_ZIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?:{})\s+\d{{5}}(?:-\d{{4}})?\b",
        US_STATE_ABBREVIATIONS.join("|")
    ))
    .expect("Invalid state/zip regex")
});
