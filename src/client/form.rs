use crate::client::session::{SessionStore, TOKEN_KEY};
use crate::client::transport::{AuthTransport, ClientError};
use crate::domain::user::{ForgotPasswordRequest, LoginRequest, RegisterRequest};
use crate::domain::validation::{MIN_PASSWORD_LEN, is_valid_email};
use std::collections::HashMap;
use tracing::debug;

/// Exactly one mode is rendered at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    Login,
    Signup,
    ForgotPassword,
    ResetSuccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Password,
    ConfirmPassword,
    ResetEmail,
}

/// The single network call a valid submission produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest {
    Login(LoginRequest),
    Signup(RegisterRequest),
    Reset(ForgotPasswordRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// A prior submission is still in flight; the submit control is disabled.
    InFlight,
    /// Client-side validation failed; no network call occurs.
    Invalid,
}

#[derive(Debug, Clone)]
pub enum SubmitSuccess {
    Token(String),
    ResetAccepted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Blocked(SubmitBlocked),
    /// Token stored; the caller navigates to the authenticated view.
    Authenticated,
    ResetEmailSent,
    Failed,
}

pub struct AuthPanel<T: AuthTransport, S: SessionStore> {
    transport: T,
    session: S,
    mode: PanelMode,
    name: String,
    email: String,
    password: String,
    confirm_password: String,
    reset_email: String,
    validation_errors: HashMap<Field, String>,
    is_loading: bool,
    auth_error: Option<String>,
}

impl<T: AuthTransport, S: SessionStore> AuthPanel<T, S> {
    pub fn new(transport: T, session: S) -> Self {
        Self {
            transport,
            session,
            mode: PanelMode::Login,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            reset_email: String::new(),
            validation_errors: HashMap::new(),
            is_loading: false,
            auth_error: None,
        }
    }

    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    pub fn validation_error(&self, field: Field) -> Option<&str> {
        self.validation_errors.get(&field).map(String::as_str)
    }

    /// Token persisted by the injected session store, if any.
    pub fn token(&self) -> Option<String> {
        self.session.load(TOKEN_KEY)
    }

    /// Removing the stored token constitutes logout.
    pub fn logout(&mut self) {
        self.session.clear(TOKEN_KEY);
    }

    // Field edits clear that field's validation error.

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
        self.validation_errors.remove(&Field::Name);
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
        self.validation_errors.remove(&Field::Email);
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
        self.validation_errors.remove(&Field::Password);
    }

    pub fn set_confirm_password(&mut self, value: impl Into<String>) {
        self.confirm_password = value.into();
        self.validation_errors.remove(&Field::ConfirmPassword);
    }

    pub fn set_reset_email(&mut self, value: impl Into<String>) {
        self.reset_email = value.into();
        self.validation_errors.remove(&Field::ResetEmail);
    }

    // Mode transitions. Switching modes drops stale errors.

    pub fn show_login(&mut self) {
        self.switch_mode(PanelMode::Login);
    }

    pub fn show_signup(&mut self) {
        self.switch_mode(PanelMode::Signup);
    }

    pub fn show_forgot_password(&mut self) {
        self.switch_mode(PanelMode::ForgotPassword);
    }

    pub fn back_to_login(&mut self) {
        self.switch_mode(PanelMode::Login);
    }

    fn switch_mode(&mut self, mode: PanelMode) {
        debug!(?mode, "Switching panel mode");
        self.mode = mode;
        self.validation_errors.clear();
        self.auth_error = None;
    }

    fn validate_email_field(&mut self, field: Field, value: &str) {
        if value.trim().is_empty() {
            self.validation_errors
                .insert(field, "Email is required".to_string());
        } else if !is_valid_email(value) {
            self.validation_errors
                .insert(field, "Please enter a valid email".to_string());
        }
    }

    fn validate_password_field(&mut self) {
        if self.password.is_empty() {
            self.validation_errors
                .insert(Field::Password, "Password is required".to_string());
        } else if self.password.len() < MIN_PASSWORD_LEN {
            self.validation_errors.insert(
                Field::Password,
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            );
        }
    }

    fn validate(&mut self) -> bool {
        self.validation_errors.clear();

        match self.mode {
            PanelMode::Login => {
                let email = self.email.clone();
                self.validate_email_field(Field::Email, &email);
                self.validate_password_field();
            }
            PanelMode::Signup => {
                if self.name.trim().is_empty() {
                    self.validation_errors
                        .insert(Field::Name, "Name is required".to_string());
                }
                let email = self.email.clone();
                self.validate_email_field(Field::Email, &email);
                self.validate_password_field();
                if self.confirm_password != self.password {
                    self.validation_errors
                        .insert(Field::ConfirmPassword, "Passwords do not match".to_string());
                }
            }
            PanelMode::ForgotPassword => {
                let reset_email = self.reset_email.clone();
                self.validate_email_field(Field::ResetEmail, &reset_email);
            }
            PanelMode::ResetSuccess => {}
        }

        self.validation_errors.is_empty()
    }

    /// First half of a submission: gate on in-flight state, validate, and on
    /// success flip to loading and hand back the single request to dispatch.
    /// UI hosts drive this directly and pair it with [`apply_result`].
    ///
    /// [`apply_result`]: AuthPanel::apply_result
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, SubmitBlocked> {
        if self.is_loading {
            return Err(SubmitBlocked::InFlight);
        }
        if !self.validate() {
            return Err(SubmitBlocked::Invalid);
        }

        let request = match self.mode {
            PanelMode::Login => SubmitRequest::Login(LoginRequest {
                email: self.email.clone(),
                password: self.password.clone(),
            }),
            PanelMode::Signup => SubmitRequest::Signup(RegisterRequest {
                name: self.name.clone(),
                email: self.email.clone(),
                password: self.password.clone(),
            }),
            PanelMode::ForgotPassword => SubmitRequest::Reset(ForgotPasswordRequest {
                email: self.reset_email.clone(),
            }),
            PanelMode::ResetSuccess => return Err(SubmitBlocked::Invalid),
        };

        self.is_loading = true;
        self.auth_error = None;
        Ok(request)
    }

    /// Second half of a submission. Loading resets on every outcome.
    pub fn apply_result(&mut self, result: Result<SubmitSuccess, ClientError>) {
        self.is_loading = false;
        match result {
            Ok(SubmitSuccess::Token(token)) => {
                self.session.save(TOKEN_KEY, &token);
            }
            Ok(SubmitSuccess::ResetAccepted) => {
                self.mode = PanelMode::ResetSuccess;
            }
            Err(err) => {
                self.auth_error = Some(err.user_message());
            }
        }
    }

    /// Full submission against the injected transport.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let request = match self.begin_submit() {
            Ok(request) => request,
            Err(blocked) => return SubmitOutcome::Blocked(blocked),
        };

        let result = match request {
            SubmitRequest::Login(req) => self
                .transport
                .login(req)
                .await
                .map(|payload| SubmitSuccess::Token(payload.token)),
            SubmitRequest::Signup(req) => self
                .transport
                .register(req)
                .await
                .map(|payload| SubmitSuccess::Token(payload.token)),
            SubmitRequest::Reset(req) => self
                .transport
                .forgot_password(req)
                .await
                .map(|()| SubmitSuccess::ResetAccepted),
        };

        let outcome = match &result {
            Ok(SubmitSuccess::Token(_)) => SubmitOutcome::Authenticated,
            Ok(SubmitSuccess::ResetAccepted) => SubmitOutcome::ResetEmailSent,
            Err(_) => SubmitOutcome::Failed,
        };
        self.apply_result(result);
        outcome
    }
}
