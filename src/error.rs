use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value as JsonValue};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Missing REPLICATE_API_TOKEN")]
    MissingCredential,

    #[error("Generation service rejected the request ({status}): {body}")]
    RemoteRejected { status: u16, body: String },

    #[error("{0}")]
    RemoteFailed(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Polling timeout ({}s)", .budget_ms / 1000)]
    PollTimeout { elapsed_ms: u64, budget_ms: u64 },

    #[error("{message}")]
    InvalidShape {
        message: String,
        raw: String,
        parsed: Option<JsonValue>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::RemoteRejected { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Error::PollTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Error::InvalidShape { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Config(_)
            | Error::MissingCredential
            | Error::RemoteFailed(_)
            | Error::Transport(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = match self {
            Error::RemoteRejected { body, .. } => json!({ "error": body }),
            Error::InvalidShape {
                message,
                raw,
                parsed,
            } => json!({ "error": message, "raw": raw, "parsed": parsed }),
            Error::Config(msg) | Error::Internal(msg) => {
                tracing::error!(error = %msg, "internal failure");
                json!({ "error": "An unexpected error occurred" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
