//! Typed errors raised by the core components.
//!
//! Orchestration (indexing, batching, `main`) works in `anyhow::Result` and
//! wraps these with context; the leaf modules return them directly so callers
//! can tell configuration problems apart from container or render failures.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input file {0:?} does not end in .root (optionally .canv.root or .root.N)")]
    InvalidInputName(String),

    #[error("invalid filter pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no input files given")]
    NoInputs,

    #[error("container {path}: {message}")]
    Container { path: String, message: String },

    #[error("render {full_path}: {message}")]
    Render { full_path: String, message: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn container(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Container {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn render(full_path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Render {
            full_path: full_path.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
