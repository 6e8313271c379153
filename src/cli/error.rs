//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::OperationFailed { .. } => crate::exitcode::NOINPUT,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::Fs { .. }
                | ApplicationError::UnknownCommand { .. }
                | ApplicationError::MissingArgument { .. }
                | ApplicationError::InvalidName { .. } => crate::exitcode::DATAERR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FsError;

    #[test]
    fn script_failures_map_to_dataerr() {
        let err = CliError::from(ApplicationError::Fs {
            line: 1,
            source: FsError::not_found("C:\\x"),
        });
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn config_failures_map_to_config() {
        let err = CliError::from(ApplicationError::Config {
            message: "bad".into(),
        });
        assert_eq!(err.exit_code(), crate::exitcode::CONFIG);
    }
}
