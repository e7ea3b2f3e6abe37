//! Exit status codes for the CLI
//!
//! kubedev follows standard Unix exit code conventions:
//! - 0: Success
//! - 1: Any error (tool failures, unreadable output, file errors)
//! - 2: The operator cancelled a prompt
//! - 130: User interrupted (Ctrl+C, standard SIGINT exit code)

use std::process::{ExitCode, Termination};

/// Exit status codes following standard Unix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// Successful execution
    Success = 0,
    /// Any error
    Error = 1,
    /// A prompt was dismissed before the command finished
    Cancelled = 2,
    /// User interrupted (Ctrl+C) - standard SIGINT code
    Interrupted = 130,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

impl ExitStatus {
    /// Create an exit status from a raw exit code
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ExitStatus::Success,
            2 => ExitStatus::Cancelled,
            130 => ExitStatus::Interrupted,
            _ => ExitStatus::Error,
        }
    }
}
