//! Error handling and display for the CLI.

use colored::Colorize;
use rm_capacity::AllocationError;
use rm_model::Role;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Not authenticated. Run `rmctl auth login` to authenticate.")]
    NotAuthenticated,

    #[error("This command requires a {required} session (logged in as {actual}).")]
    Forbidden { required: Role, actual: Role },

    /// Login failures never say which of credentials or role was wrong.
    #[error("Invalid credentials or role mismatch.")]
    LoginFailed,

    #[error("{0}")]
    Rejected(#[from] AllocationError),

    #[error("API error: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create an API error from response details.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Maps a 404 from the API to [`CliError::NotFound`].
    pub fn not_found_as(self, what: impl FnOnce() -> String) -> Self {
        match self {
            Self::Api { status: 404, .. } => Self::NotFound(what()),
            other => other,
        }
    }
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    // Check for specific error types and provide hints
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::NotAuthenticated => {}
            CliError::Forbidden { required, .. } => {
                eprintln!(
                    "\n{}",
                    format!("Hint: Log in with `rmctl auth login --role {required}`.").yellow()
                );
            }
            CliError::Rejected(reason) if reason.is_over_capacity() => {
                eprintln!(
                    "\n{}",
                    "Hint: Lower the capacity or free up an existing assignment first.".yellow()
                );
            }
            CliError::Api { status, .. } if *status == 403 => {
                eprintln!(
                    "\n{}",
                    "Hint: You may not have permission for this operation.".yellow()
                );
            }
            CliError::Network(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Check your network connection and API endpoint (--api-url).".yellow()
                );
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_mapping_only_applies_to_404() {
        let mapped = CliError::api(404, "missing").not_found_as(|| "Engineer 'e1'".to_string());
        assert!(matches!(mapped, CliError::NotFound(ref what) if what == "Engineer 'e1'"));

        let kept = CliError::api(500, "boom").not_found_as(|| unreachable!());
        assert!(matches!(kept, CliError::Api { status: 500, .. }));
    }

    #[test]
    fn test_rejection_uses_inline_message() {
        let err = CliError::from(AllocationError::OverCapacity(110));
        assert_eq!(err.to_string(), "Overbooking! This will exceed 100% (110%).");
    }
}
