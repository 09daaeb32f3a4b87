//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the node model invariants.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("progress {0} outside 0..=100")]
    ProgressOutOfRange(i64),

    #[error("unknown priority: {0:?} (expected \"{{}}\", \"[]\", \"()\" or urgent/medium/low)")]
    UnknownPriority(String),

    #[error("invalid position {0:?}, expected X,Y")]
    InvalidPosition(String),

    #[error("node not found")]
    NodeNotFound,

    #[error("{kind} index {index} out of range ({len} entries)")]
    ItemOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    /// Persisted data does not describe a valid tree.
    #[error("data format error: {message}")]
    DataFormat { message: String },
}

impl DomainError {
    pub fn data_format(message: impl Into<String>) -> Self {
        Self::DataFormat {
            message: message.into(),
        }
    }
}
