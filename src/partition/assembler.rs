use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::error::{Result, TextpartError};
use crate::models::{Element, ElementKind, ElementMetadata, RegexMatch};

/// Compiled `label -> pattern` table applied to every element's text.
#[derive(Debug, Clone, Default)]
pub struct RegexMetadata {
    patterns: Vec<(String, Regex)>,
}

impl RegexMetadata {
    /// Compile every pattern up front. An invalid pattern is a configuration error.
    pub fn compile(patterns: &BTreeMap<String, String>) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|(label, pattern)| {
                Regex::new(pattern)
                    .map(|re| (label.clone(), re))
                    .map_err(|e| {
                        TextpartError::Config(format!("invalid regex for '{label}': {e}"))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// All non-overlapping matches per label, with character offsets.
    /// Labels without a match are left out; no matches at all yields `None`.
    #[must_use]
    pub fn extract(&self, text: &str) -> Option<BTreeMap<String, Vec<RegexMatch>>> {
        let mut found = BTreeMap::new();
        for (label, re) in &self.patterns {
            let matches: Vec<RegexMatch> = re
                .find_iter(text)
                .map(|m| {
                    let start = text[..m.start()].chars().count();
                    RegexMatch {
                        text: m.as_str().to_string(),
                        start,
                        end: start + m.as_str().chars().count(),
                    }
                })
                .collect();
            if !matches.is_empty() {
                found.insert(label.clone(), matches);
            }
        }
        (!found.is_empty()).then_some(found)
    }
}

/// Document-level metadata shared by every element of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub filename: Option<String>,
    pub file_directory: Option<String>,
    pub date: Option<NaiveDateTime>,
}

impl DocumentMetadata {
    /// Resolve filename, directory and date for a document.
    ///
    /// With `include_path` the filename keeps its directory (the source
    /// path as given, or the source's directory joined with the override)
    /// and no separate directory is recorded. Otherwise the name, override
    /// first, is split into base name and directory.
    #[must_use]
    pub fn resolve(
        source_path: Option<&Path>,
        filename_override: Option<&str>,
        include_path: bool,
        date_override: Option<NaiveDateTime>,
        last_modified: Option<NaiveDateTime>,
    ) -> Self {
        let (filename, file_directory) = if include_path {
            let filename = match (source_path, filename_override) {
                (Some(source), Some(name)) => Some(
                    source
                        .parent()
                        .unwrap_or_else(|| Path::new(""))
                        .join(name)
                        .to_string_lossy()
                        .into_owned(),
                ),
                (Some(source), None) => Some(source.to_string_lossy().into_owned()),
                (None, Some(name)) => Some(name.to_string()),
                (None, None) => None,
            };
            (filename, None)
        } else {
            let name = filename_override.map(Path::new).or(source_path);
            match name {
                Some(name) => split_name(name),
                None => (None, None),
            }
        };

        Self {
            filename,
            file_directory,
            date: date_override.or(last_modified),
        }
    }
}

fn split_name(name: &Path) -> (Option<String>, Option<String>) {
    let filename = name
        .file_name()
        .map(|f| f.to_string_lossy().into_owned());
    let directory = name
        .parent()
        .map(|d| d.to_string_lossy().into_owned())
        .filter(|d| !d.is_empty());
    (filename, directory)
}

/// Builds final elements from classified segments.
#[derive(Debug, Clone)]
pub struct MetadataAssembler {
    include_metadata: bool,
    document: DocumentMetadata,
    regex: RegexMetadata,
}

impl MetadataAssembler {
    #[must_use]
    pub fn new(include_metadata: bool, document: DocumentMetadata, regex: RegexMetadata) -> Self {
        Self {
            include_metadata,
            document,
            regex,
        }
    }

    #[must_use]
    pub fn assemble(&self, kind: ElementKind, text: String) -> Element {
        let metadata = if self.include_metadata {
            ElementMetadata {
                filename: self.document.filename.clone(),
                file_directory: self.document.file_directory.clone(),
                date: self.document.date,
                regex_metadata: self.regex.extract(&text),
                text_as_html: None,
            }
        } else {
            ElementMetadata::default()
        };
        Element::new(kind, text, metadata)
    }
}
