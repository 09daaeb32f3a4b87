//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("invalid document {path}: {source}")]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: DomainError,
    },

    #[error("document already exists: {0}")]
    DocumentExists(PathBuf),

    #[error("no node selected")]
    NoSelection,

    #[error("no node matches {0}")]
    NoMatch(String),

    #[error("attached file does not exist: {0}")]
    AttachmentMissing(PathBuf),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
