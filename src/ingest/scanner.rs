use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Result, TextpartError};
use crate::ingest::hasher;

/// Extensions treated as plain text when no list is configured.
pub const DEFAULT_TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "rst", "log"];

/// Reason why a file was left out of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Extension is not in the configured text list.
    UnsupportedExtension,
    /// File exceeds the configured size limit.
    TooLarge,
    /// IO error while reading metadata or hashing.
    IoError,
}

impl SkipReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::UnsupportedExtension => "unsupported_extension",
            SkipReason::TooLarge => "too_large",
            SkipReason::IoError => "io_error",
        }
    }
}

/// A text file selected for partitioning.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub relative_path: String,
    /// SHA-256 of the raw bytes.
    pub hash: String,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub relative_path: String,
    pub reason: SkipReason,
}

/// Outcome of walking a directory, both lists sorted by relative path.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub files: Vec<ScannedFile>,
    pub skipped: Vec<SkippedFile>,
}

/// Parallel directory scanner that respects .gitignore.
pub struct Scanner {
    root: PathBuf,
    extensions: Vec<String>,
    exclude_patterns: Vec<String>,
    /// Maximum file size in bytes (0 = unlimited).
    max_file_size_bytes: u64,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_TEXT_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            exclude_patterns: Vec::new(),
            max_file_size_bytes: 0,
        }
    }

    /// Replace the accepted extensions (case-insensitive, without dot).
    #[must_use]
    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    #[must_use]
    pub fn with_exclude_patterns(mut self, patterns: &[String]) -> Self {
        self.exclude_patterns = patterns.to_vec();
        self
    }

    #[must_use]
    pub fn with_max_file_size(mut self, max_size_mb: u32) -> Self {
        self.max_file_size_bytes = u64::from(max_size_mb) * 1024 * 1024;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the root and hash every accepted file in parallel.
    pub fn scan(&self) -> Result<ScanReport> {
        if !self.root.is_dir() {
            return Err(TextpartError::FileNotFound {
                path: self.root.display().to_string(),
            });
        }

        let entries: Vec<PathBuf> = WalkBuilder::new(&self.root)
            .hidden(true) // skip hidden dirs like .git
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .follow_links(false) // Prevent symlink loops
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                !matches!(
                    name.as_ref(),
                    "node_modules" | "target" | ".textpart" | ".git" | "vendor"
                )
            })
            .build()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
            .map(ignore::DirEntry::into_path)
            .filter(|path| !self.is_excluded(path))
            .collect();

        let outcomes: Vec<std::result::Result<ScannedFile, SkippedFile>> =
            entries.par_iter().map(|path| self.inspect(path)).collect();

        let mut report = ScanReport::default();
        for outcome in outcomes {
            match outcome {
                Ok(file) => report.files.push(file),
                Err(skipped) => report.skipped.push(skipped),
            }
        }
        report
            .files
            .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        report
            .skipped
            .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(report)
    }

    fn inspect(&self, path: &Path) -> std::result::Result<ScannedFile, SkippedFile> {
        let relative_path = self.relative_path(path);
        let skip = |reason| SkippedFile {
            relative_path: relative_path.clone(),
            reason,
        };

        if !self.is_text_extension(path) {
            return Err(skip(SkipReason::UnsupportedExtension));
        }
        let size = path
            .metadata()
            .map_err(|_| skip(SkipReason::IoError))?
            .len();
        if self.max_file_size_bytes > 0 && size > self.max_file_size_bytes {
            return Err(skip(SkipReason::TooLarge));
        }
        let hash = hasher::hash_file(path).map_err(|_| skip(SkipReason::IoError))?;

        Ok(ScannedFile {
            path: path.to_path_buf(),
            relative_path,
            hash,
            size,
        })
    }

    fn is_text_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let relative = self.relative_path(path);
        self.exclude_patterns
            .iter()
            .map(|pattern| pattern.trim_end_matches('/'))
            .any(|pattern| !pattern.is_empty() && relative.contains(pattern))
    }

    fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}
