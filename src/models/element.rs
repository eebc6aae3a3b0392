use serde::Serialize;

use crate::ingest::hasher;
use crate::models::metadata::ElementMetadata;

/// The semantic type of a partitioned element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementKind {
    Title,
    NarrativeText,
    ListItem,
    Address,
    /// Only produced by tabular extractors, never by the text engine.
    Table,
    UncategorizedText,
}

impl ElementKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::NarrativeText => "NarrativeText",
            Self::ListItem => "ListItem",
            Self::Address => "Address",
            Self::Table => "Table",
            Self::UncategorizedText => "UncategorizedText",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, metadata-carrying unit of a partitioned document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    /// Content hash of `text`; identical text always yields the same id.
    pub element_id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub metadata: ElementMetadata,
}

impl Element {
    pub fn new(kind: ElementKind, text: impl Into<String>, metadata: ElementMetadata) -> Self {
        let text = text.into();
        Self {
            element_id: hasher::element_id(&text),
            text,
            kind,
            metadata,
        }
    }

    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
