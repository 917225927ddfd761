use crate::shape::Digest;

/// Errors raised by the shape registry.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    /// A name was registered twice with different shapes.
    #[error("shape {name:?} already registered with digest {existing}, refusing {attempted}")]
    Conflict {
        name: String,
        existing: Digest,
        attempted: Digest,
    },

    /// The peer's digest does not match the locally registered one.
    #[error("shape {name:?} is incompatible: expected {expected}, registered {actual}")]
    Incompatible {
        name: String,
        expected: Digest,
        actual: Digest,
    },

    /// No shape registered under the given name.
    #[error("no shape registered for {0:?}")]
    NoShape(String),

    /// The registry is full.
    #[error("shape count exceeds configured max ({max})")]
    LimitExceeded { max: usize },

    /// The registry could not be rendered as JSON.
    #[error("failed to render shapes as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShapeError>;
