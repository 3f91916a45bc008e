//! Error type shared by the index, matcher and resolution layers.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToxError {
    #[error("{}: Not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("{}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid regex: {0}")]
    Regex(#[from] regex::Error),

    #[error("no index applies to {}", .0.display())]
    NoIndex(PathBuf),

    #[error("{}: index already exists", .0.display())]
    IndexExists(PathBuf),

    #[error("{}: index is protected", .0.display())]
    Protected(PathBuf),
}

impl ToxError {
    /// Wrap an I/O failure together with the path it concerns.
    pub fn fs(path: impl AsRef<Path>, source: io::Error) -> Self {
        ToxError::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ToxError>;
