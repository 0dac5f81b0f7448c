use crate::domain::user::{ForgotPasswordRequest, LoginRequest, RegisterRequest};
use crate::presentation::handlers::{ApiError, AppState, BearerToken};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, instrument};

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Registration request received");

    let token = state
        .auth_service
        .register(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register user");
            ApiError::from(e)
        })?;

    info!("User registered successfully");
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    let token = state
        .auth_service
        .login(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to login");
            ApiError::from(e)
        })?;

    info!("Login successful");
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn forgot_password(
    state: web::Data<AppState>,
    req: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Password reset request received");

    state
        .auth_service
        .request_password_reset(&req.email)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to process password reset");
            ApiError::from(e)
        })?;

    info!("Password reset processed");
    Ok(HttpResponse::Ok().json(json!({})))
}

#[instrument(skip(state, token))]
pub async fn me(
    state: web::Data<AppState>,
    token: BearerToken,
) -> Result<HttpResponse, ApiError> {
    let user = state
        .auth_service
        .authenticate(&token.0)
        .await
        .map_err(ApiError::from)?;

    info!(user_id = %user.id, "Authenticated user resolved");
    Ok(HttpResponse::Ok().json(UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}
