use axum::http::StatusCode;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

/// A date range whose start falls after its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Start date must be before end date.")]
pub struct RangeError {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Error: Invalid CSV format.")]
    InvalidFormat,

    #[error("Error: Inconsistent row length.")]
    InconsistentRowLength,

    #[error("Error: Unable to parse CSV.")]
    Parse(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Not signed in to the remote drive")]
    NotAuthenticated,

    #[error("Remote file not found: {0}")]
    NotFound(String),

    #[error("Remote drive I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persisted roster could not be read back. Startup degrades to an empty
/// roster when this happens.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read stored roster: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to decode stored roster: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<RangeError> for AppError {
    fn from(err: RangeError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        let status = match err {
            RemoteError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            RemoteError::NotFound(_) => StatusCode::NOT_FOUND,
            RemoteError::Io(_) => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
