use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextpartError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("cannot decode input as {encoding}: {detail}")]
    Decode { encoding: String, detail: String },

    #[error("config error: {0}")]
    Config(String),
}

impl TextpartError {
    /// Whether the error is user-fixable configuration rather than bad input.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, TextpartError>;
