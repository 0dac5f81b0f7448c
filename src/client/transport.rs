use crate::domain::user::{ForgotPasswordRequest, LoginRequest, RegisterRequest};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Fixed per-request timeout; expiry surfaces as `ClientError::Timeout`.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug, Clone)]
pub enum ClientError {
    #[error("server unreachable")]
    Unreachable,
    #[error("request timed out")]
    Timeout,
    #[error("api error ({status}): {msg}")]
    Api { status: u16, msg: String },
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ClientError {
    /// User-facing message, in precedence order: unreachable, timeout,
    /// server-provided message, generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unreachable => {
                "Unable to connect to the server. Please check your connection and try again."
                    .to_string()
            }
            ClientError::Timeout => "The request timed out. Please try again.".to_string(),
            ClientError::Api { msg, .. } => msg.clone(),
            ClientError::Unexpected(_) => "Something went wrong. Please try again.".to_string(),
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        // A connect-phase timeout sets both flags; unreachable wins.
        if err.is_connect() {
            ClientError::Unreachable
        } else if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Unexpected(err.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenPayload {
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    msg: String,
}

/// Network seam for the auth panel; mocked in tests.
#[async_trait]
pub trait AuthTransport: Send + Sync {
    async fn register(&self, req: RegisterRequest) -> Result<TokenPayload, ClientError>;
    async fn login(&self, req: LoginRequest) -> Result<TokenPayload, ClientError>;
    async fn forgot_password(&self, req: ForgotPasswordRequest) -> Result<(), ClientError>;
}

pub struct HttpAuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Unexpected(e.to_string()))?;

        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Dispatching request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ClientError::Unexpected(e.to_string()))
        } else {
            let code = status.as_u16();
            warn!(status = code, url = %url, "Request rejected by server");
            match response.json::<ApiErrorBody>().await {
                Ok(body) => Err(ClientError::Api {
                    status: code,
                    msg: body.msg,
                }),
                Err(_) => Err(ClientError::Unexpected(format!(
                    "server returned status {}",
                    code
                ))),
            }
        }
    }
}

#[async_trait]
impl AuthTransport for HttpAuthClient {
    async fn register(&self, req: RegisterRequest) -> Result<TokenPayload, ClientError> {
        self.post_json("/api/auth/register", &req).await
    }

    async fn login(&self, req: LoginRequest) -> Result<TokenPayload, ClientError> {
        self.post_json("/api/auth/login", &req).await
    }

    async fn forgot_password(&self, req: ForgotPasswordRequest) -> Result<(), ClientError> {
        let _body: serde_json::Value = self.post_json("/api/auth/forgot-password", &req).await?;
        Ok(())
    }
}
