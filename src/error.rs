use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A line that is neither blank, a comment, nor a section header, and has no `=`.
    #[error("line {line} has wrong format: {content}")]
    Syntax { line: usize, content: String },
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read input")]
    ReadInput {
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{what} is null or empty")]
    NullElement { what: &'static str },

    // Never produced: inserting an existing key overwrites it.
    #[error("duplicate element: {name}")]
    DuplicateElement { name: String },

    #[error("index {index} is out of range for {len} sections")]
    IndexOutOfRange { index: usize, len: usize },
}
