//! Error taxonomy for the Tiny Tiny RSS client.
//!
//! # Design
//! The set is closed and split in three tiers. Transport-tier variants
//! (`Transport`, `Http`, `InvalidArgument`, `Serialization`) mean the call
//! never produced a usable reply. `Deserialization` means a reply arrived
//! but did not match the expected shape. `Application` carries the error
//! code the server placed in `content.error` alongside a nonzero status.
//!
//! `Caller` operations never return these as `Err`; they are attached to a
//! synthesized `ApiResponse` instead. The stateless `ApiClient` and the
//! `Transport` trait return them directly.

use thiserror::Error;

/// Errors produced while building, sending, or decoding an API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The HTTP exchange itself failed (connection refused, timeout, I/O).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with something other than 200.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Arguments were rejected locally before anything was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The reply body could not be decoded into the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The server reported a nonzero status with this error code.
    #[error("server error: {0}")]
    Application(String),
}

impl ApiError {
    /// True for failures where no reply from the server was decoded.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_)
                | ApiError::Http { .. }
                | ApiError::InvalidArgument(_)
                | ApiError::Serialization(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_server_code() {
        let err = ApiError::Application("NOT_LOGGED_IN".to_string());
        assert_eq!(err.to_string(), "server error: NOT_LOGGED_IN");
    }

    #[test]
    fn http_display_carries_status_and_body() {
        let err = ApiError::Http {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
    }

    #[test]
    fn tiers_are_distinguished() {
        assert!(ApiError::Transport("refused".into()).is_transport());
        assert!(ApiError::InvalidArgument("limit".into()).is_transport());
        assert!(!ApiError::Deserialization("eof".into()).is_transport());
        assert!(!ApiError::Application("LOGIN_ERROR".into()).is_transport());
    }
}
