use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure classification for everything that crosses the adb process
/// boundary. `Validation` is reserved for caller-supplied bad input; the
/// remaining kinds describe the remote side or the subprocess itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NoDeviceConnected,
    ToolNotFound,
    Timeout,
    RemoteCommandFailed,
    UnexpectedProcessFault,
    Validation,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NoDeviceConnected => "NO_DEVICE_CONNECTED",
            ErrorKind::ToolNotFound => "TOOL_NOT_FOUND",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::RemoteCommandFailed => "REMOTE_COMMAND_FAILED",
            ErrorKind::UnexpectedProcessFault => "UNEXPECTED_PROCESS_FAULT",
            ErrorKind::Validation => "VALIDATION",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppError {
    pub message: String,
    pub kind: ErrorKind,
    pub trace_id: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            trace_id: trace_id.into(),
        }
    }

    pub fn no_device(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoDeviceConnected, message, trace_id)
    }

    pub fn tool_not_found(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new(ErrorKind::ToolNotFound, message, trace_id)
    }

    pub fn timeout(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message, trace_id)
    }

    pub fn remote_failure(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new(ErrorKind::RemoteCommandFailed, message, trace_id)
    }

    pub fn process_fault(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnexpectedProcessFault, message, trace_id)
    }

    pub fn validation(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message, trace_id)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind.code())
    }
}

impl std::error::Error for AppError {}
