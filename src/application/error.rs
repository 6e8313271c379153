//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{FsError, NodeKindTag};

/// Application errors wrap domain errors and add script-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("line {line}: {source}")]
    Fs {
        line: usize,
        #[source]
        source: FsError,
    },

    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { command: String, line: usize },

    #[error("line {line}: not enough parameters for {command} command")]
    MissingArgument { command: String, line: usize },

    #[error("line {line}: invalid format of a {kind} name: {name}")]
    InvalidName {
        name: String,
        kind: NodeKindTag,
        line: usize,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// Engine failure, as opposed to a malformed script or an I/O problem.
    pub fn fs_error(&self) -> Option<&FsError> {
        match self {
            ApplicationError::Fs { source, .. } => Some(source),
            _ => None,
        }
    }

    /// 1-based script line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ApplicationError::Fs { line, .. }
            | ApplicationError::UnknownCommand { line, .. }
            | ApplicationError::MissingArgument { line, .. }
            | ApplicationError::InvalidName { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
