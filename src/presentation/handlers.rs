use crate::application::auth_service::AuthService;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError};
use chrono::Utc;
use serde::Serialize;
use std::future::{Ready, ready};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

// AppState holding the service
pub struct AppState {
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
}

// Uniform error response format: 4xx/5xx bodies carry a "msg" field
#[derive(Serialize)]
struct ErrorResponse {
    msg: String,
}

// Auth API Error Types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Server error")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            ApiError::Validation(_) => actix_web::http::StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            ApiError::Internal(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Internal detail stays in the logs; the body gets the generic message.
        match self {
            ApiError::Validation(msg) => {
                warn!(error = %msg, status = %status, "Validation error")
            }
            ApiError::Unauthorized(msg) => {
                warn!(error = %msg, status = %status, "Unauthorized")
            }
            ApiError::NotFound(msg) => {
                warn!(error = %msg, status = %status, "Resource not found")
            }
            ApiError::Internal(detail) => {
                error!(error = %detail, status = %status, "Internal error")
            }
        }

        HttpResponse::build(status).json(ErrorResponse {
            msg: self.to_string(),
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(msg)) => ApiError::Validation(msg.clone()),
            Some(DomainError::Unauthorized(msg)) => ApiError::Unauthorized(msg.clone()),
            Some(DomainError::NotFound(msg)) => ApiError::NotFound(msg.clone()),
            Some(DomainError::EmailDelivery(msg)) => ApiError::Internal(msg.clone()),
            Some(DomainError::Internal(msg)) => ApiError::Internal(msg.clone()),
            None => ApiError::Internal(err.to_string()),
        }
    }
}

/// Bearer token pulled from the `Authorization` header.
/// Use as a handler parameter to require a presented token.
pub struct BearerToken(pub String);

impl FromRequest for BearerToken {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        ready(
            token
                .map(BearerToken)
                .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string())),
        )
    }
}

// Liveness probes

#[derive(Serialize)]
struct ProbeResponse {
    msg: String,
    timestamp: String,
}

#[instrument]
pub async fn api_probe() -> HttpResponse {
    info!("API probe requested");
    HttpResponse::Ok().json(ProbeResponse {
        msg: "API is running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[instrument]
pub async fn auth_probe() -> HttpResponse {
    info!("Auth probe requested");
    HttpResponse::Ok().json(ProbeResponse {
        msg: "Auth service is running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
