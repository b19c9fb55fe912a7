use axum::http::StatusCode;
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

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
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

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Please fill in all required fields.")]
    MissingFields,

    #[error("Please enter a valid date and time.")]
    InvalidDateTime,

    #[error("No reminders found in cookies.")]
    NoCookieReminders,

    #[error("failed to encode reminders cookie: {0}")]
    Cookie(#[from] serde_json::Error),
}

impl From<ActionError> for AppError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::MissingFields | ActionError::InvalidDateTime => {
                Self::bad_request(err.to_string())
            }
            ActionError::NoCookieReminders => Self::not_found(err.to_string()),
            ActionError::Cookie(inner) => Self::internal(inner),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
