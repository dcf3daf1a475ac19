// error.rs - Error type shared by the converter, codecs and query engine

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("unknown format '{name}'. Valid types: {valid}")]
    UnknownFormat { name: String, valid: String },

    #[error("format '{0}' can only be used for output")]
    OutputOnlyFormat(String),

    #[error("invalid query: {0}")]
    Query(String),

    #[error("failed to open '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to create '{path}': {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to parse {format} input: {message}")]
    Parse { format: String, message: String },

    #[error("failed to write {format} output: {message}")]
    Write { format: String, message: String },

    #[error("query result is not a sequence record: {0}")]
    NotARecord(String),

    #[error("record '{0}' has no quality scores for a quality format")]
    MissingQuality(String),

    #[error("invalid location: {0}")]
    Location(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    pub fn parse(format: &str, err: impl std::fmt::Display) -> Self {
        ConvertError::Parse {
            format: format.to_string(),
            message: err.to_string(),
        }
    }

    pub fn write(format: &str, err: impl std::fmt::Display) -> Self {
        ConvertError::Write {
            format: format.to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
