// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the capture session
//!
//! All session errors are recoverable: they surface through the completion
//! channel of the operation that caused them and never poison the session.
//! The worker guarantees the device handle is never left half-open — any
//! failure during open runs the full teardown path before reporting.

use crate::device::types::DeviceError;
use std::fmt;

/// Result type alias using SessionError
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors surfaced by session operations
#[derive(Debug, Clone)]
pub enum SessionError {
    /// Device could not be opened or stopped responding
    DeviceUnavailable(String),
    /// Operation attempted while the session is not in the Opened state
    NotOpen,
    /// The device produced a zero-length capture payload
    EmptyCapture,
    /// The driver rejected a parameter set (logged, non-fatal)
    ParameterRejected(String),
    /// The capture payload could not be decoded
    DecodeFailed(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::DeviceUnavailable(msg) => write!(f, "Device unavailable: {}", msg),
            SessionError::NotOpen => write!(f, "Session is not open"),
            SessionError::EmptyCapture => write!(f, "Device returned an empty capture payload"),
            SessionError::ParameterRejected(msg) => {
                write!(f, "Driver rejected parameters: {}", msg)
            }
            SessionError::DecodeFailed(msg) => write!(f, "Capture decode failed: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<DeviceError> for SessionError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::NotFound(msg) | DeviceError::OpenFailed(msg) => {
                SessionError::DeviceUnavailable(msg)
            }
            DeviceError::ParameterRejected(msg) => SessionError::ParameterRejected(msg),
            DeviceError::PreviewFailed(msg) | DeviceError::CaptureFailed(msg) => {
                SessionError::DeviceUnavailable(msg)
            }
        }
    }
}
