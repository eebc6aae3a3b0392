use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

/// A single regex match inside an element's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegexMatch {
    pub text: String,
    /// Start offset in characters, relative to the element text.
    pub start: usize,
    /// End offset in characters (exclusive).
    pub end: usize,
}

/// Metadata attached to an element. Absent fields are `None` and are
/// omitted when serialized, so a suppressed record serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ElementMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_directory: Option<String>,
    /// Last-modified time of the source, or the caller's override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex_metadata: Option<BTreeMap<String, Vec<RegexMatch>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_as_html: Option<String>,
}

impl ElementMetadata {
    /// Number of populated fields.
    #[must_use]
    pub fn populated_fields(&self) -> usize {
        [
            self.filename.is_some(),
            self.file_directory.is_some(),
            self.date.is_some(),
            self.regex_metadata.is_some(),
            self.text_as_html.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.populated_fields() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        let m = ElementMetadata::default();
        assert!(m.is_empty());
        assert_eq!(serde_json::to_string(&m).unwrap(), "{}");
    }

    #[test]
    fn counts_populated_fields() {
        let m = ElementMetadata {
            filename: Some("a.txt".into()),
            file_directory: Some("docs".into()),
            ..Default::default()
        };
        assert_eq!(m.populated_fields(), 2);
        assert!(!m.is_empty());
    }

    #[test]
    fn serializes_date_as_iso() {
        let date = NaiveDateTime::parse_from_str("2023-04-01 08:30:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let m = ElementMetadata {
            date: Some(date),
            ..Default::default()
        };
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"date":"2023-04-01T08:30:00"}"#);
    }
}
