use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    InternalServerError(String),
    DatabaseError(String),
    AWSError(String),
    ConfigError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::AWSError(msg) => write!(f, "AWS Error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Keeps client-facing errors as they are and replaces everything else
    /// with a generic 500 carrying `context` as its message.
    pub fn collapse(self, context: &str) -> AppError {
        match self {
            AppError::NotFound(_) | AppError::BadRequest(_) => self,
            other => {
                log::error!("{}: {}", context, other);
                AppError::InternalServerError(context.to_string())
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::InternalServerError(msg) => msg.clone(),
            // Backend detail stays in the logs.
            AppError::DatabaseError(_) | AppError::AWSError(_) | AppError::ConfigError(_) => {
                "Internal server error".to_string()
            }
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse { message })
    }
}
