//! Error types for signature parsing and document generation.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while scanning a raw parameter list.
///
/// Offsets are byte offsets into the scanned text. These errors are local to a
/// single initializer: the caller leaves that initializer untouched and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// Bracket depth never returned to zero before the end of the text.
    #[error("unterminated nesting: {depth} bracket(s) still open, outermost opened at offset {offset}")]
    UnterminatedNesting { depth: usize, offset: usize },

    /// A string literal was still open at the end of the text.
    #[error("unterminated string literal opened with {quote} at offset {offset}")]
    UnterminatedStringLiteral { quote: String, offset: usize },

    /// A closing bracket appeared while no bracket was open.
    #[error("unbalanced closing '{ch}' at offset {offset}")]
    UnbalancedCloser { ch: char, offset: usize },
}

/// Errors raised by the document collaborator and file handling.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The parameter list of an initializer could not be scanned.
    #[error("Failed to parse {class_name}.{method}: {source}")]
    Signature {
        class_name: String,
        method: String,
        #[source]
        source: SignatureError,
    },

    /// Cursor mode reached another function or class before any initializer.
    #[error("Line {line} is not inside an __init__ method (found {found:?} first)")]
    NotInsideInitializer { line: usize, found: String },

    /// Cursor mode reached the top of the document without finding an initializer.
    #[error("No __init__ method found above line {line}")]
    NoInitializerAbove { line: usize },

    /// The initializer body sits on its header line, so there is no line to insert before.
    #[error("{class_name}.__init__ at line {line} has its body on the header line")]
    InlineBody { class_name: String, line: usize },

    /// The requested line does not exist in the document.
    #[error("Line {line} is out of range (document has {total} lines)")]
    LineOutOfRange { line: usize, total: usize },

    /// The ast-grep rule used to enumerate classes could not be built.
    #[error("Invalid structural rule: {0}")]
    Rule(String),

    /// A configuration file could not be parsed.
    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A filesystem operation failed.
    #[error("Failed to {operation} '{path}': {source}")]
    FileSystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerationError {
    /// Build a [`GenerationError::FileSystem`] with the failing operation and path.
    pub fn file_system(
        operation: impl Into<String>,
        path: impl AsRef<Path>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Attach the class and method name to a scanning failure.
    pub fn signature(
        class_name: impl Into<String>,
        method: impl Into<String>,
        source: SignatureError,
    ) -> Self {
        Self::Signature {
            class_name: class_name.into(),
            method: method.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GenerationError>;
