use crate::edit::EditError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("invalid declaration pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: EditError,
    },

    #[error(transparent)]
    Edit(#[from] EditError),
}
