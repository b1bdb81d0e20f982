//! Unified error handling for kbot.
//!
//! Dispatch-time failures (unknown command, bad arity, coercion) are not
//! errors in this sense: they become user-facing text inside the dispatcher.
//! `HandlerError` covers faults that escape a running handler; the gateway
//! catches and logs them and the user sees nothing.

use crate::platform::PlatformError;
use thiserror::Error;

/// Errors escaping a command handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("platform call failed: {0}")]
    Platform(#[from] PlatformError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Platform(_) => "platform_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result type for command handlers: an optional trailing reply for the
/// originating text channel.
pub type HandlerResult = Result<Option<String>, HandlerError>;
