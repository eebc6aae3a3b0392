// Pedantic lint configuration for the crate.
// Most of these are reasonable but too strict for this codebase:
// - cast_precision_loss: Ratios over character counts are approximate by nature
// - missing_errors_doc: Error handling is self-evident from Result types
// - missing_panics_doc: Panics are limited to compile-time constant regexes
// - items_after_statements: Output structs are clearer near their usage
// - too_many_lines: The CLI option plumbing needs cohesive logic
// - similar_names: Variable naming is contextually clear
// - option_if_let_else: if-let is often clearer
// - fn_params_excessive_bools: CLI flags are naturally boolean
// - needless_pass_by_value: Sometimes clearer semantically
// - match_same_arms: Combined arms can reduce readability
// - module_name_repetitions: Types like `PartitionOptions` read better in use sites
#![allow(
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::items_after_statements,
    clippy::too_many_lines,
    clippy::similar_names,
    clippy::option_if_let_else,
    clippy::fn_params_excessive_bools,
    clippy::needless_pass_by_value,
    clippy::match_same_arms,
    clippy::module_name_repetitions
)]

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod partition;

pub use error::{Result, TextpartError};
pub use models::{Element, ElementKind, ElementMetadata};
pub use partition::{partition_text, PartitionOptions, Sources};
