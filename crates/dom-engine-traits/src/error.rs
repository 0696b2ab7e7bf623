//! Error types for DOM engine operations

/// Result type for DOM engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for all DOM engine operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// XML parsing failed
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// XPath compilation failed
    #[error("XPath compilation error: {0}")]
    Expression(String),

    /// XPath evaluation failed
    #[error("XPath evaluation error: {0}")]
    Evaluation(String),

    /// Node access or mutation failed
    #[error("node access error: {0}")]
    NodeAccess(String),

    /// Serialization failed
    #[error("serialization error: {0}")]
    Serialize(String),

    /// Requested feature is not supported by this engine
    #[error("feature not supported: {0}")]
    Unsupported(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a new node access error
    pub fn node_access<S: Into<String>>(msg: S) -> Self {
        Error::NodeAccess(msg.into())
    }

    /// Create a new serialization error
    pub fn serialize<S: Into<String>>(msg: S) -> Self {
        Error::Serialize(msg.into())
    }

    /// Create a new unsupported-feature error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::Unsupported(msg.into())
    }
}
