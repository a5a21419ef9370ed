//! Errors raised by the Merkle membership engine.

use thiserror::Error;

/// Errors that can occur while building trees, generating proofs or verifying them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// No leaves were supplied where at least one is required.
    #[error("leaf set is empty")]
    EmptyInput,

    /// The requested leaf does not occur in layer 0.
    #[error("leaf {0} is not a member of the tree")]
    NotFound(String),

    /// A value could not be interpreted as an element of the hash domain.
    #[error("invalid element: {0}")]
    InvalidElement(String),

    /// A proof or encoded path does not have the expected shape.
    #[error("malformed proof: expected {expected} entries, got {actual}")]
    MalformedProof { expected: usize, actual: usize },

    /// A direction bit other than 0 or 1.
    #[error("invalid direction bit {0}")]
    InvalidDirection(u8),

    /// The configured depth is outside the supported range.
    #[error("tree depth must be between 1 and {max}, got {depth}")]
    InvalidDepth { depth: usize, max: usize },

    /// More leaves than a tree of the configured depth can hold.
    #[error("{leaves} leaves exceed the capacity {capacity} of the configured depth")]
    CapacityExceeded { leaves: usize, capacity: usize },

    /// A cached tree was built from a different leaf set or depth.
    #[error("cached tree does not match the supplied leaves")]
    StaleTree,

    /// A persisted tree failed structural or hash validation.
    #[error("corrupt tree snapshot: {0}")]
    CorruptSnapshot(String),

    /// Reading or writing a snapshot failed.
    #[error("io error: {0}")]
    Io(String),

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for MerkleError {
    fn from(e: std::io::Error) -> Self {
        MerkleError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for MerkleError {
    fn from(e: serde_json::Error) -> Self {
        MerkleError::Serialization(e.to_string())
    }
}
