//! Process exit codes
//!
//! Stable codes so scripts can branch on the failure kind without parsing
//! messages.

use ac_core::Error;

/// Exit code reported by the `aisc` process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArgument = 2,
    Conflict = 4,
    NotFound = 5,
    Timeout = 6,
    Transport = 7,
}

impl ExitCode {
    /// Map an error kind to its exit code
    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::NotFound(_) | Error::XactionNotFound(_) => ExitCode::NotFound,
            Error::AlreadyExists(_) => ExitCode::Conflict,
            Error::InvalidArgument(_) | Error::InvalidProvider { .. } => ExitCode::InvalidArgument,
            Error::Timeout { .. } => ExitCode::Timeout,
            Error::Transport(_) => ExitCode::Transport,
            Error::Api { .. } | Error::Io(_) | Error::Config(_) | Error::Decode(_) => {
                ExitCode::GeneralError
            }
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_core::Provider;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::NotFound), 5);
        assert_eq!(i32::from(ExitCode::Transport), 7);
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            ExitCode::from_error(&Error::NotFound("b".into())),
            ExitCode::NotFound
        );
        assert_eq!(
            ExitCode::from_error(&Error::XactionNotFound("x".into())),
            ExitCode::NotFound
        );
        assert_eq!(
            ExitCode::from_error(&Error::AlreadyExists("b".into())),
            ExitCode::Conflict
        );
        assert_eq!(
            ExitCode::from_error(&Error::InvalidProvider {
                provider: Provider::Ais,
                operation: "evict"
            }),
            ExitCode::InvalidArgument
        );
        assert_eq!(
            ExitCode::from_error(&Error::Timeout {
                id: "x".into(),
                elapsed: std::time::Duration::from_secs(1)
            }),
            ExitCode::Timeout
        );
        assert_eq!(
            ExitCode::from_error(&Error::Transport("down".into())),
            ExitCode::Transport
        );
        assert_eq!(
            ExitCode::from_error(&Error::Config("bad".into())),
            ExitCode::GeneralError
        );
    }
}
