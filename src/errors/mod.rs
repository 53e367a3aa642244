use crate::models::response::ValidationResponse;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PortalError {
    NotFound(String),
    ValidationError(String),
    Forbidden(String),
    Conflict(String),
    SessionError(String),
    InternalError(String),
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PortalError::NotFound(msg) => write!(f, "Not found error: {}", msg),
            PortalError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            PortalError::Forbidden(msg) => write!(f, "Forbidden error: {}", msg),
            PortalError::Conflict(msg) => write!(f, "Conflict error: {}", msg),
            PortalError::SessionError(msg) => write!(f, "Session error: {}", msg),
            PortalError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for PortalError {}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl PortalError {
    fn code(&self) -> &'static str {
        match self {
            PortalError::NotFound(_) => "NOT_FOUND_ERROR",
            PortalError::ValidationError(_) => "VALIDATION_ERROR",
            PortalError::Forbidden(_) => "FORBIDDEN_ERROR",
            PortalError::Conflict(_) => "CONFLICT_ERROR",
            PortalError::SessionError(_) => "SESSION_ERROR",
            PortalError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    fn message(&self) -> &str {
        match self {
            PortalError::NotFound(msg)
            | PortalError::ValidationError(msg)
            | PortalError::Forbidden(msg)
            | PortalError::Conflict(msg)
            | PortalError::SessionError(msg)
            | PortalError::InternalError(msg) => msg,
        }
    }
}

impl From<Vec<ValidationResponse>> for PortalError {
    fn from(errors: Vec<ValidationResponse>) -> Self {
        let message = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<String>>()
            .join("; ");

        PortalError::ValidationError(message)
    }
}

impl From<askama::Error> for PortalError {
    fn from(err: askama::Error) -> Self {
        PortalError::InternalError(format!("Template error: {}", err))
    }
}

impl ResponseError for PortalError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.message().to_string(),
        })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PortalError::NotFound(_) => StatusCode::NOT_FOUND,
            PortalError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PortalError::Forbidden(_) => StatusCode::FORBIDDEN,
            PortalError::Conflict(_) => StatusCode::CONFLICT,
            PortalError::SessionError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PortalError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
