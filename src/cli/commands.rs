use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};

use crate::config::PartitionSettings;
use crate::error::{Result, TextpartError};
use crate::partition::{BoundaryRule, PartitionOptions};

#[derive(Parser)]
#[command(
    name = "textpart",
    version,
    about = "Partition plain text into typed, size-bounded elements",
    after_help = "Settings are read from .textpart/config.toml in the current directory \
                  (create it with 'textpart init'). Command-line flags override file settings. \
                  Set RUST_LOG or pass -v for diagnostics on stderr."
)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Partition one document and print its elements as JSON.
    ///
    /// Reads PATH, or the --text argument, or standard input with --stdin.
    /// Exactly one input must be given.
    Partition {
        /// File to partition
        path: Option<String>,
        /// Partition this text instead of a file
        #[arg(long)]
        text: Option<String>,
        /// Read the document from standard input
        #[arg(long)]
        stdin: bool,
        #[command(flatten)]
        opts: PartitionArgs,
    },

    /// Partition every text file under a directory.
    ///
    /// Respects .gitignore and the scan settings. A document that fails is
    /// reported with its error and does not stop the batch.
    Batch {
        /// Directory to walk
        #[arg(default_value = ".")]
        dir: String,
        #[command(flatten)]
        opts: PartitionArgs,
    },

    /// Classify a single segment without normalization
    Classify {
        /// Segment text
        text: String,
    },

    /// Write the default .textpart/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Flags shared by `partition` and `batch`. Unset flags fall back to the
/// config file.
#[derive(clap::Args, Debug, Default)]
pub struct PartitionArgs {
    /// Encoding label for file input (e.g. utf-8, utf-16, windows-1252)
    #[arg(long)]
    pub encoding: Option<String>,
    /// Minimum segment length in characters
    #[arg(long)]
    pub min_partition: Option<usize>,
    /// Maximum segment length in characters
    #[arg(long)]
    pub max_partition: Option<usize>,
    /// Re-join soft-wrapped lines into paragraphs
    #[arg(long)]
    pub group_paragraphs: bool,
    /// Split paragraphs on blank lines only
    #[arg(long)]
    pub blank_line_boundaries: bool,
    /// Record regex matches as LABEL=PATTERN (repeatable)
    #[arg(long = "regex", value_name = "LABEL=PATTERN")]
    pub regex: Vec<String>,
    /// Omit metadata from every element
    #[arg(long)]
    pub no_metadata: bool,
    /// Filename to record instead of the source path
    #[arg(long)]
    pub metadata_filename: Option<String>,
    /// Keep the directory in the recorded filename
    #[arg(long)]
    pub include_path: bool,
    /// Date to record, e.g. 2023-04-01T08:30:00
    #[arg(long)]
    pub metadata_date: Option<String>,
    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl PartitionArgs {
    /// Merge flags over the file settings.
    pub fn to_options(&self, settings: &PartitionSettings) -> Result<PartitionOptions> {
        let mut settings = settings.clone();
        if let Some(min) = self.min_partition {
            settings.min_partition = min;
        }
        if let Some(max) = self.max_partition {
            settings.max_partition = max;
        }
        if self.group_paragraphs {
            settings.group_broken_paragraphs = true;
        }
        if self.blank_line_boundaries {
            settings.boundary = BoundaryRule::BlankLine;
        }
        if self.no_metadata {
            settings.include_metadata = false;
        }
        if self.include_path {
            settings.include_path_in_metadata_filename = true;
        }
        for entry in &self.regex {
            let (label, pattern) = entry.split_once('=').ok_or_else(|| {
                TextpartError::Config(format!("--regex expects LABEL=PATTERN, got '{entry}'"))
            })?;
            settings
                .regex_metadata
                .insert(label.to_string(), pattern.to_string());
        }

        let mut options = settings.to_options();
        options.metadata_filename.clone_from(&self.metadata_filename);
        options.metadata_date = self
            .metadata_date
            .as_deref()
            .map(parse_date)
            .transpose()?;
        Ok(options)
    }

    /// Encoding flag, else the configured one.
    #[must_use]
    pub fn encoding<'a>(&'a self, settings: &'a PartitionSettings) -> Option<&'a str> {
        self.encoding.as_deref().or(settings.encoding.as_deref())
    }
}

/// Accepts `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or a bare date.
fn parse_date(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|e| TextpartError::Config(format!("invalid --metadata-date '{s}': {e}")))
}
