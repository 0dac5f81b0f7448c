use crate::domain::error::DomainError;
use crate::domain::mailer::{Mailer, OutboundEmail};
use crate::domain::repository::UserRepository;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::domain::validation::{MIN_PASSWORD_LEN, is_valid_password, normalize_email};
use crate::infrastructure::security::{
    generate_token, hash_password, validate_token, verify_password,
};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

const RESET_EMAIL_SUBJECT: &str = "Password Reset Request";

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    mailer: Arc<dyn Mailer>,
    jwt_secret: String,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, mailer: Arc<dyn Mailer>, jwt_secret: String) -> Self {
        Self {
            user_repository,
            mailer,
            jwt_secret,
        }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: RegisterRequest) -> Result<String> {
        trace!("Starting user registration");

        if req.name.trim().is_empty() {
            warn!("Registration rejected: empty name");
            return Err(DomainError::Validation("Name is required".to_string()).into());
        }
        let email = normalize_email(&req.email).ok_or_else(|| {
            warn!("Registration rejected: malformed email");
            DomainError::Validation("Invalid email format".to_string())
        })?;
        if !is_valid_password(&req.password) {
            warn!("Registration rejected: password too short");
            return Err(DomainError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ))
            .into());
        }

        if self
            .user_repository
            .find_user_by_email(&email)
            .await?
            .is_some()
        {
            warn!("User already exists");
            return Err(
                DomainError::Validation("User with this email already exists".to_string()).into(),
            );
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: req.name.trim().to_string(),
            email,
            password_hash,
            created_at: Utc::now(),
        };

        debug!(user_id = %user.id, "Saving user to repository");
        self.user_repository.save_user(user.clone()).await?;

        let token = generate_token(&user.id, &user.email, &self.jwt_secret).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e))
        })?;

        info!(user_id = %user.id, "User registered successfully");
        Ok(token)
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<String> {
        trace!("Starting login");

        // Unknown email and wrong password are indistinguishable to the caller.
        let email = normalize_email(&req.email).ok_or_else(|| {
            warn!("Login rejected: malformed email");
            DomainError::Unauthorized("Invalid email or password".to_string())
        })?;

        let user = self
            .user_repository
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!("User not found during login");
                DomainError::Unauthorized("Invalid email or password".to_string())
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        if !is_valid {
            warn!(user_id = %user.id, "Invalid password during login");
            return Err(DomainError::Unauthorized("Invalid email or password".to_string()).into());
        }

        let token = generate_token(&user.id, &user.email, &self.jwt_secret).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e))
        })?;

        info!(user_id = %user.id, "Login successful");
        Ok(token)
    }

    /// Trigger a password-reset email. Any well-formed address gets a send
    /// attempt, whether or not it belongs to a registered user.
    #[instrument(skip(self), fields(email = email))]
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        trace!("Starting password reset request");

        let email = normalize_email(email).ok_or_else(|| {
            warn!("Password reset rejected: malformed email");
            DomainError::Validation("Invalid email format".to_string())
        })?;

        let greeting = match self.user_repository.find_user_by_email(&email).await? {
            Some(user) => format!("Hi {},", user.name),
            None => "Hi,".to_string(),
        };

        let text = format!(
            "{}\n\nWe received a request to reset the password for {}.\n\
             Follow the instructions in this email to choose a new password.\n\n\
             If you did not request a reset, you can safely ignore this message.",
            greeting, email
        );

        self.mailer
            .send(OutboundEmail {
                to: email.clone(),
                subject: RESET_EMAIL_SUBJECT.to_string(),
                text,
            })
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send reset email");
                e
            })?;

        info!("Password reset email dispatched");
        Ok(())
    }

    /// Resolve a bearer token to the user it was issued for.
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let user_id = validate_token(token, &self.jwt_secret).map_err(|e| {
            warn!(error = %e, "Token validation failed");
            DomainError::Unauthorized("Invalid or expired token".to_string())
        })?;

        let user = self
            .user_repository
            .find_user_by_id(&user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user_id, "Token subject no longer exists");
                DomainError::Unauthorized("Invalid or expired token".to_string())
            })?;

        debug!(user_id = %user.id, "Token authenticated");
        Ok(user)
    }
}
