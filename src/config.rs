use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TextpartError};
use crate::ingest::scanner::{Scanner, DEFAULT_TEXT_EXTENSIONS};
use crate::partition::{
    BoundaryRule, BrokenParagraphGrouper, PartitionOptions, DEFAULT_MAX_PARTITION,
    DEFAULT_MIN_PARTITION,
};

/// Default directory name for textpart settings.
const TEXTPART_DIR: &str = ".textpart";
/// Config filename.
const CONFIG_FILE: &str = "config.toml";

/// Project-level configuration resolved from the working directory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the settings apply to.
    pub project_root: PathBuf,
    /// Path to the `.textpart/` directory.
    pub textpart_dir: PathBuf,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// User settings loaded from config.toml.
    pub settings: UserSettings,
}

/// User-configurable settings from .textpart/config.toml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub partition: PartitionSettings,
    pub scan: ScanSettings,
    pub output: OutputSettings,
}

/// Defaults for every partitioning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionSettings {
    pub min_partition: usize,
    pub max_partition: usize,
    pub boundary: BoundaryRule,
    /// Re-join soft-wrapped lines before size normalization.
    pub group_broken_paragraphs: bool,
    pub include_metadata: bool,
    pub include_path_in_metadata_filename: bool,
    /// Encoding label for file input; detected when unset.
    pub encoding: Option<String>,
    /// Label to regex pattern.
    pub regex_metadata: BTreeMap<String, String>,
}

impl Default for PartitionSettings {
    fn default() -> Self {
        Self {
            min_partition: DEFAULT_MIN_PARTITION,
            max_partition: DEFAULT_MAX_PARTITION,
            boundary: BoundaryRule::default(),
            group_broken_paragraphs: false,
            include_metadata: true,
            include_path_in_metadata_filename: false,
            encoding: None,
            regex_metadata: BTreeMap::new(),
        }
    }
}

/// Batch directory walk settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Extensions treated as plain text (without dot).
    pub extensions: Vec<String>,
    /// Path fragments to exclude from batches.
    pub exclude_patterns: Vec<String>,
    /// Maximum file size in MB (files larger are skipped, 0 = unlimited).
    pub max_file_size_mb: u32,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_TEXT_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            exclude_patterns: vec![
                "node_modules/".into(),
                ".git/".into(),
                "target/".into(),
            ],
            max_file_size_mb: 10,
        }
    }
}

/// Output-related settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output format: "minified" (default) or "pretty".
    pub format: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: "minified".into(),
        }
    }
}

impl OutputSettings {
    #[must_use]
    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
    }
}

impl PartitionSettings {
    /// Build engine options from the file settings.
    #[must_use]
    pub fn to_options(&self) -> PartitionOptions {
        let mut options = PartitionOptions::default()
            .with_bounds(self.min_partition, self.max_partition)
            .with_boundary(self.boundary);
        if self.group_broken_paragraphs {
            options = options.with_grouper(BrokenParagraphGrouper);
        }
        options.include_metadata = self.include_metadata;
        options.include_path_in_metadata_filename = self.include_path_in_metadata_filename;
        options.regex_metadata = self.regex_metadata.clone();
        options
    }
}

impl Config {
    /// Create config for a given project root.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let textpart_dir = project_root.join(TEXTPART_DIR);
        let config_path = textpart_dir.join(CONFIG_FILE);

        // Invalid or missing files fall back to defaults
        let settings = Self::load_settings(&config_path).unwrap_or_default();

        Self {
            project_root,
            textpart_dir,
            config_path,
            settings,
        }
    }

    /// Create config from the current working directory.
    pub fn from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| TextpartError::Config(format!("cannot get cwd: {e}")))?;
        Ok(Self::new(cwd))
    }

    /// Load settings from config.toml if it exists.
    fn load_settings(config_path: &Path) -> Option<UserSettings> {
        if !config_path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(config_path).ok()?;
        match toml::from_str(&content) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "ignoring invalid config");
                None
            }
        }
    }

    /// Save current settings to config.toml.
    pub fn save_settings(&self) -> Result<()> {
        self.ensure_dir()?;
        let content = toml::to_string_pretty(&self.settings)
            .map_err(|e| TextpartError::Config(format!("failed to serialize settings: {e}")))?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Ensure the `.textpart/` directory exists.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.textpart_dir)?;
        Ok(())
    }

    #[must_use]
    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }

    /// Convert an absolute path to a project-relative path string.
    #[must_use]
    pub fn relative_path(&self, abs: &Path) -> String {
        abs.strip_prefix(&self.project_root)
            .unwrap_or(abs)
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Scanner for `root` configured from the scan settings.
    #[must_use]
    pub fn scanner(&self, root: impl Into<PathBuf>) -> Scanner {
        let scan = &self.settings.scan;
        Scanner::new(root)
            .with_extensions(&scan.extensions)
            .with_exclude_patterns(&scan.exclude_patterns)
            .with_max_file_size(scan.max_file_size_mb)
    }
}
