use axum::http::StatusCode;
use thiserror::Error;

/// Failures of the persisted blobs.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// A blob exists but cannot be decoded. Boot treats this as fatal and resets.
    #[error("stored blob `{key}` is corrupt: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode blob `{key}`: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Domain conditions surfaced to callers of the account, session and admin operations.
#[derive(Debug, Error)]
pub enum VitaliError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("username `{0}` is already taken")]
    UsernameTaken(String),

    #[error("no active session")]
    NotSignedIn,

    #[error("not authorized: {0}")]
    Forbidden(String),

    #[error("the bootstrap account cannot be demoted or deleted")]
    BootstrapProtected,

    #[error("account `{0}` not found")]
    AccountNotFound(String),

    #[error("video `{0}` not found")]
    VideoNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("an advice request is already pending")]
    AdvicePending,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl VitaliError {
    pub fn missing(field: &str) -> Self {
        Self::Validation(format!("{field} is required"))
    }
}

pub type VitaliResult<T> = Result<T, VitaliError>;

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

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<VitaliError> for AppError {
    fn from(err: VitaliError) -> Self {
        let status = match &err {
            VitaliError::InvalidCredentials | VitaliError::NotSignedIn => StatusCode::UNAUTHORIZED,
            VitaliError::Forbidden(_) | VitaliError::BootstrapProtected => StatusCode::FORBIDDEN,
            VitaliError::UsernameTaken(_) | VitaliError::AdvicePending => StatusCode::CONFLICT,
            VitaliError::AccountNotFound(_) | VitaliError::VideoNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            VitaliError::Validation(_) => StatusCode::BAD_REQUEST,
            VitaliError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_http_status() {
        let cases = [
            (VitaliError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (VitaliError::UsernameTaken("ana".into()), StatusCode::CONFLICT),
            (VitaliError::BootstrapProtected, StatusCode::FORBIDDEN),
            (VitaliError::AccountNotFound("42".into()), StatusCode::NOT_FOUND),
            (VitaliError::missing("steps"), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status, status);
        }
    }

    #[test]
    fn missing_field_message_names_the_field() {
        assert_eq!(VitaliError::missing("heartRate").to_string(), "heartRate is required");
    }
}
