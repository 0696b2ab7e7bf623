//! Error taxonomy for the pipeline components.
//!
//! Each component surfaces its own error enum; nothing is recovered
//! locally. The driver collects them all under [`HarnessError`], logs a
//! distinguishing message per category and maps every one of them to
//! exit code 1.

use thiserror::Error;

use dom_engine_traits::NodeKind;

/// Document loading failures
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("malformed markup: {0}")]
    MalformedMarkup(String),

    #[error("engine failure: {0}")]
    EngineFailure(String),
}

/// Fragment import failures
#[derive(Error, Debug)]
pub enum ImportError {
    /// The destination handle is not a document node
    #[error("import destination is not a document")]
    NullDestination,

    #[error("malformed source: {0}")]
    MalformedSource(String),

    /// A per-node import failed; remaining siblings were not attempted
    #[error("import aborted after {imported} node(s): {reason}")]
    PartialImportFailure { imported: usize, reason: String },
}

/// Query evaluation failures
#[derive(Error, Debug)]
pub enum QueryError {
    /// The snapshot was empty
    #[error("no result")]
    NoMatch,

    /// The snapshot contained a node that is not an element
    #[error("result contains a non-element node: {0}")]
    NonElementResult(NodeKind),

    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    #[error("engine failure: {0}")]
    EngineFailure(String),
}

/// Serialization failures
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("engine failure: {0}")]
    EngineFailure(String),
}

/// Top-level error for the driver's catch-all
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// The two import strategies produced different fragments
    #[error("import strategies produced different fragments")]
    StrategyMismatch,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
