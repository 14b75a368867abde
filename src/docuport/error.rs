use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocuportError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Container name '{0}' matches more than one container")]
    AmbiguousName(String),

    #[error("Index value rejected: {0}")]
    Validation(String),

    #[error("Transfer rejected: {0}")]
    Transfer(String),

    #[error("Split supports at most one page boundary and one result name (got {boundaries} boundaries, {names} names)")]
    SplitArity { boundaries: usize, names: usize },

    #[error("Remote container misconfigured: no usable {0}")]
    DialogConfiguration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, DocuportError>;
