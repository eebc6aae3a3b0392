use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::ingest::scanner::{Scanner, SkippedFile};
use crate::models::Element;
use crate::partition::{partition_text, PartitionOptions, Sources};

/// Result of partitioning one document in a batch. Exactly one of
/// `elements` and `error` is set.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    pub path: String,
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<Element>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentOutcome {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub documents: Vec<DocumentOutcome>,
    pub skipped: Vec<SkippedFile>,
    pub succeeded: usize,
    pub failed: usize,
    pub elements: usize,
}

/// Partition every text file under the scanner root in parallel.
///
/// A document that fails is recorded with its error and the rest of the
/// batch continues. Output order follows the sorted relative paths.
pub fn partition_directory(
    scanner: &Scanner,
    options: &PartitionOptions,
    encoding: Option<&str>,
) -> Result<BatchReport> {
    let scan = scanner.scan()?;
    info!(
        root = %scanner.root().display(),
        files = scan.files.len(),
        skipped = scan.skipped.len(),
        "starting batch"
    );

    let documents: Vec<DocumentOutcome> = scan
        .files
        .par_iter()
        .map(|file| {
            let sources = Sources {
                filename: Some(file.path.as_path()),
                encoding,
                ..Sources::default()
            };
            match partition_text(sources, options) {
                Ok(elements) => DocumentOutcome {
                    path: file.relative_path.clone(),
                    hash: file.hash.clone(),
                    elements: Some(elements),
                    error: None,
                },
                Err(e) => {
                    warn!(path = %file.relative_path, error = %e, "failed to partition document");
                    DocumentOutcome {
                        path: file.relative_path.clone(),
                        hash: file.hash.clone(),
                        elements: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    let failed = documents.iter().filter(|d| !d.is_ok()).count();
    let elements = documents
        .iter()
        .filter_map(|d| d.elements.as_ref())
        .map(Vec::len)
        .sum();
    info!(
        documents = documents.len(),
        failed, elements, "batch complete"
    );

    Ok(BatchReport {
        succeeded: documents.len() - failed,
        failed,
        elements,
        documents,
        skipped: scan.skipped,
    })
}
