use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    cart::CartError,
    notify::Notice,
    quote::QuoteError,
    response::{ApiResponse, Meta},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Unauthorized {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Cart(err) if err.is_validation() => StatusCode::BAD_REQUEST,
            AppError::Quote(err) if err.is_validation() => StatusCode::BAD_REQUEST,
            AppError::Quote(QuoteError::Render(_)) => StatusCode::BAD_GATEWAY,
            AppError::Cart(_)
            | AppError::Quote(_)
            | AppError::DbError(_)
            | AppError::OrmError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show the end user.
    fn public_message(&self) -> String {
        match self {
            AppError::Quote(QuoteError::Render(_)) => {
                "The quote could not be generated. Please try again.".to_string()
            }
            AppError::Cart(CartError::Storage(_)) => "Cart storage is unavailable".to_string(),
            AppError::Quote(QuoteError::Template(_)) => "Internal Server Error".to_string(),
            _ => self.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }
        let message = self.public_message();

        let body = ApiResponse {
            message: message.clone(),
            data: Some(ErrorData { error: message.clone() }),
            meta: Some(Meta::empty()),
            notices: vec![Notice::error(message)],
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
