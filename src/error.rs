use arrow::error::ArrowError;
use thiserror::Error;

/// The upload could not be read as a table at all.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file is empty or has no header row")]
    NoHeader,

    #[error("file is not valid UTF-8 text: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("malformed CSV: {0}")]
    Malformed(#[from] ArrowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An aggregate cannot be computed for this table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("missing column `{0}`")]
    MissingColumn(&'static str),
}

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("building filtered table: {0}")]
    Arrow(#[from] ArrowError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("rendering data overview: {0}")]
    Overview(#[from] ArrowError),
}
