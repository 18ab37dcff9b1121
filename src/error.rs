use std::fmt;

use thiserror::Error;

/// Why a single repository transfer failed. Each variant carries a redacted,
/// human-readable detail.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    #[error("authentication failed: {0}")]
    AuthenticationFailure(String),
    #[error("source unreachable: {0}")]
    SourceUnreachable(String),
    #[error("destination repository could not be created: {0}")]
    DestinationCreateFailure(String),
    #[error("push rejected: {0}")]
    PushFailure(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferErrorKind {
    AuthenticationFailure,
    SourceUnreachable,
    DestinationCreateFailure,
    PushFailure,
}

impl TransferError {
    pub fn kind(&self) -> TransferErrorKind {
        match self {
            TransferError::AuthenticationFailure(_) => TransferErrorKind::AuthenticationFailure,
            TransferError::SourceUnreachable(_) => TransferErrorKind::SourceUnreachable,
            TransferError::DestinationCreateFailure(_) => {
                TransferErrorKind::DestinationCreateFailure
            }
            TransferError::PushFailure(_) => TransferErrorKind::PushFailure,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            TransferError::AuthenticationFailure(detail)
            | TransferError::SourceUnreachable(detail)
            | TransferError::DestinationCreateFailure(detail)
            | TransferError::PushFailure(detail) => detail,
        }
    }
}

impl fmt::Display for TransferErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferErrorKind::AuthenticationFailure => "AuthenticationFailure",
            TransferErrorKind::SourceUnreachable => "SourceUnreachable",
            TransferErrorKind::DestinationCreateFailure => "DestinationCreateFailure",
            TransferErrorKind::PushFailure => "PushFailure",
        };
        f.write_str(name)
    }
}

/// Failure of a single platform API call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("credentials rejected ({status}): {message}")]
    Unauthorized { status: u16, message: String },
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<octocrab::Error> for ApiError {
    fn from(error: octocrab::Error) -> Self {
        ApiError::Transport(error.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}
