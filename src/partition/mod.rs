//! Plain-text partitioning engine.
//!
//! Raw text flows through four stages: the segmenter cuts it into
//! paragraphs, the normalizer enforces the size bounds, the classifier
//! types each segment and the assembler attaches metadata.

pub mod assembler;
pub mod classifier;
pub mod grouping;
pub mod normalizer;
pub mod patterns;
pub mod segmenter;

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime, SubsecRound};
use tracing::debug;

use crate::error::{Result, TextpartError};
use crate::ingest::decoder;
use crate::models::{Element, ElementKind};

pub use assembler::{DocumentMetadata, MetadataAssembler, RegexMetadata};
pub use classifier::{Classification, ElementClassifier, RuleClassifier};
pub use grouping::{BrokenParagraphGrouper, ParagraphGrouper};
pub use normalizer::{PartitionBounds, DEFAULT_MAX_PARTITION, DEFAULT_MIN_PARTITION};
pub use segmenter::BoundaryRule;

/// Knobs for one partitioning run.
#[derive(Clone)]
pub struct PartitionOptions {
    pub min_partition: usize,
    pub max_partition: usize,
    pub boundary: BoundaryRule,
    /// Overrides `boundary` when set.
    pub grouper: Option<Arc<dyn ParagraphGrouper>>,
    /// Replaces the rule classifier when set.
    pub classifier: Option<Arc<dyn ElementClassifier>>,
    /// Label to pattern.
    pub regex_metadata: BTreeMap<String, String>,
    pub include_metadata: bool,
    pub metadata_filename: Option<String>,
    pub include_path_in_metadata_filename: bool,
    pub metadata_date: Option<NaiveDateTime>,
}

impl PartitionOptions {
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_partition: DEFAULT_MIN_PARTITION,
            max_partition: DEFAULT_MAX_PARTITION,
            boundary: BoundaryRule::default(),
            grouper: None,
            classifier: None,
            regex_metadata: BTreeMap::new(),
            include_metadata: true,
            metadata_filename: None,
            include_path_in_metadata_filename: false,
            metadata_date: None,
        }
    }

    #[must_use]
    pub fn with_bounds(mut self, min_partition: usize, max_partition: usize) -> Self {
        self.min_partition = min_partition;
        self.max_partition = max_partition;
        self
    }

    #[must_use]
    pub fn with_boundary(mut self, boundary: BoundaryRule) -> Self {
        self.boundary = boundary;
        self
    }

    #[must_use]
    pub fn with_grouper(mut self, grouper: impl ParagraphGrouper + 'static) -> Self {
        self.grouper = Some(Arc::new(grouper));
        self
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: impl ElementClassifier + 'static) -> Self {
        self.classifier = Some(Arc::new(classifier));
        self
    }

    #[must_use]
    pub fn with_regex(mut self, label: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.regex_metadata.insert(label.into(), pattern.into());
        self
    }

    #[must_use]
    pub fn without_metadata(mut self) -> Self {
        self.include_metadata = false;
        self
    }

    #[must_use]
    pub fn with_metadata_filename(mut self, name: impl Into<String>) -> Self {
        self.metadata_filename = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_path_in_filename(mut self) -> Self {
        self.include_path_in_metadata_filename = true;
        self
    }

    #[must_use]
    pub fn with_metadata_date(mut self, date: NaiveDateTime) -> Self {
        self.metadata_date = Some(date);
        self
    }

    pub fn bounds(&self) -> Result<PartitionBounds> {
        PartitionBounds::new(self.min_partition, self.max_partition)
    }
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PartitionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionOptions")
            .field("min_partition", &self.min_partition)
            .field("max_partition", &self.max_partition)
            .field("boundary", &self.boundary)
            .field("grouper", &self.grouper.is_some())
            .field("classifier", &self.classifier.is_some())
            .field("regex_metadata", &self.regex_metadata)
            .field("include_metadata", &self.include_metadata)
            .field("metadata_filename", &self.metadata_filename)
            .field(
                "include_path_in_metadata_filename",
                &self.include_path_in_metadata_filename,
            )
            .field("metadata_date", &self.metadata_date)
            .finish()
    }
}

/// Input candidates. Exactly one of `text`, `file` or `filename` must be set.
#[derive(Default)]
pub struct Sources<'a> {
    pub text: Option<&'a str>,
    pub file: Option<&'a mut dyn Read>,
    pub filename: Option<&'a Path>,
    /// Encoding label for `file` and `filename`; detected when absent.
    pub encoding: Option<&'a str>,
}

impl<'a> Sources<'a> {
    #[must_use]
    pub fn text(text: &'a str) -> Self {
        Self {
            text: Some(text),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn file(reader: &'a mut dyn Read) -> Self {
        Self {
            file: Some(reader),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn filename(path: &'a Path) -> Self {
        Self {
            filename: Some(path),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: &'a str) -> Self {
        self.encoding = Some(encoding);
        self
    }

    fn resolve(self) -> Result<(Source<'a>, Option<&'a str>)> {
        let source = match (self.text, self.file, self.filename) {
            (Some(text), None, None) => Source::Text(text),
            (None, Some(reader), None) => Source::Reader(reader),
            (None, None, Some(path)) => Source::Path(path),
            (None, None, None) => {
                return Err(TextpartError::Config(
                    "one of text, file or filename must be provided".into(),
                ))
            }
            _ => {
                return Err(TextpartError::Config(
                    "only one of text, file or filename may be provided".into(),
                ))
            }
        };
        Ok((source, self.encoding))
    }
}

enum Source<'a> {
    Text(&'a str),
    Reader(&'a mut dyn Read),
    Path(&'a Path),
}

/// Partition a plain-text document into typed, size-bounded elements.
pub fn partition_text(sources: Sources<'_>, options: &PartitionOptions) -> Result<Vec<Element>> {
    let (source, encoding) = sources.resolve()?;
    let bounds = options.bounds()?;
    let regex = RegexMetadata::compile(&options.regex_metadata)?;

    let (text, source_path, last_modified) = match source {
        Source::Text(text) => (text.to_string(), None, None),
        Source::Reader(reader) => (decoder::read_to_text(reader, encoding)?.text, None, None),
        Source::Path(path) => {
            let mut file = File::open(path).map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => TextpartError::FileNotFound {
                    path: path.display().to_string(),
                },
                _ => TextpartError::Io(e),
            })?;
            let decoded = decoder::read_to_text(&mut file, encoding)?;
            debug!(path = %path.display(), encoding = decoded.encoding, "decoded file");
            (decoded.text, Some(path), modified_time(path))
        }
    };

    let document = DocumentMetadata::resolve(
        source_path,
        options.metadata_filename.as_deref(),
        options.include_path_in_metadata_filename,
        options.metadata_date,
        last_modified,
    );
    let assembler = MetadataAssembler::new(options.include_metadata, document, regex);

    let grouper: Option<&dyn ParagraphGrouper> = match &options.grouper {
        Some(grouper) => Some(grouper.as_ref()),
        None => None,
    };
    let paragraphs = segmenter::segment(&text, options.boundary, grouper);
    // Page breaks split the text into runs that never merge across the break.
    let mut segments = Vec::with_capacity(paragraphs.len());
    for run in paragraphs.split(|p| classifier::is_page_break(p)) {
        segments.extend(normalizer::normalize(run, bounds));
    }
    debug!(
        paragraphs = paragraphs.len(),
        segments = segments.len(),
        "segmented text"
    );

    let rules: &dyn ElementClassifier = match &options.classifier {
        Some(custom) => custom.as_ref(),
        None => &RuleClassifier,
    };
    let elements: Vec<Element> = segments
        .into_iter()
        .filter_map(|segment| match rules.classify(&segment) {
            Classification::PageBreak => None,
            Classification::Element(ElementKind::ListItem) => {
                let text = classifier::clean_bullets(&segment).to_string();
                Some(assembler.assemble(ElementKind::ListItem, text))
            }
            Classification::Element(kind) => Some(assembler.assemble(kind, segment)),
        })
        .collect();

    debug!(elements = elements.len(), "partitioned document");
    Ok(elements)
}

/// File modification time in local time, truncated to whole seconds.
fn modified_time(path: &Path) -> Option<NaiveDateTime> {
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(
        DateTime::<Local>::from(modified)
            .naive_local()
            .trunc_subsecs(0),
    )
}
