use async_trait::async_trait;
use auth_portal_api::client::form::{AuthPanel, Field, PanelMode, SubmitBlocked, SubmitOutcome};
use auth_portal_api::client::session::InMemorySessionStore;
use auth_portal_api::client::transport::{AuthTransport, ClientError, HttpAuthClient, TokenPayload};
use auth_portal_api::domain::user::{ForgotPasswordRequest, LoginRequest, RegisterRequest};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// Counts outbound calls so tests can assert exactly how many requests the
// panel dispatched.
struct MockTransport {
    calls: Arc<AtomicUsize>,
    response: Result<String, ClientError>,
}

impl MockTransport {
    fn new(response: Result<String, ClientError>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: calls.clone(),
                response,
            },
            calls,
        )
    }

    fn record(&self) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

#[async_trait]
impl AuthTransport for MockTransport {
    async fn register(&self, _req: RegisterRequest) -> Result<TokenPayload, ClientError> {
        self.record().map(|token| TokenPayload { token })
    }

    async fn login(&self, _req: LoginRequest) -> Result<TokenPayload, ClientError> {
        self.record().map(|token| TokenPayload { token })
    }

    async fn forgot_password(&self, _req: ForgotPasswordRequest) -> Result<(), ClientError> {
        self.record().map(|_| ())
    }
}

fn panel_with(
    response: Result<String, ClientError>,
) -> (
    AuthPanel<MockTransport, InMemorySessionStore>,
    Arc<AtomicUsize>,
) {
    let (transport, calls) = MockTransport::new(response);
    (AuthPanel::new(transport, InMemorySessionStore::new()), calls)
}

#[tokio::test]
async fn test_login_success_stores_token() {
    let (mut panel, calls) = panel_with(Ok("jwt-123".to_string()));
    panel.set_email("user@example.com");
    panel.set_password("secret1");

    let outcome = panel.submit().await;

    assert_eq!(outcome, SubmitOutcome::Authenticated);
    assert_eq!(panel.token(), Some("jwt-123".to_string()));
    assert!(!panel.is_loading());
    assert!(panel.auth_error().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_login_failure_shows_error_and_stores_no_token() {
    let (mut panel, calls) = panel_with(Err(ClientError::Api {
        status: 401,
        msg: "Invalid email or password".to_string(),
    }));
    panel.set_email("user@example.com");
    panel.set_password("wrong-pass");

    let outcome = panel.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(panel.auth_error(), Some("Invalid email or password"));
    assert_eq!(panel.token(), None);
    assert!(!panel.is_loading());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_malformed_email_blocks_without_network_call() {
    let (mut panel, calls) = panel_with(Ok("jwt".to_string()));
    panel.set_email("bad-email");
    panel.set_password("secret1");

    let outcome = panel.submit().await;

    assert_eq!(outcome, SubmitOutcome::Blocked(SubmitBlocked::Invalid));
    assert!(panel.validation_error(Field::Email).is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_signup_password_mismatch_blocks_without_network_call() {
    let (mut panel, calls) = panel_with(Ok("jwt".to_string()));
    panel.show_signup();
    panel.set_name("Test User");
    panel.set_email("user@example.com");
    panel.set_password("secret1");
    panel.set_confirm_password("secret2");

    let outcome = panel.submit().await;

    assert_eq!(outcome, SubmitOutcome::Blocked(SubmitBlocked::Invalid));
    assert_eq!(
        panel.validation_error(Field::ConfirmPassword),
        Some("Passwords do not match")
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_signup_success_stores_token() {
    let (mut panel, calls) = panel_with(Ok("signup-jwt".to_string()));
    panel.show_signup();
    panel.set_name("Test User");
    panel.set_email("user@example.com");
    panel.set_password("secret1");
    panel.set_confirm_password("secret1");

    let outcome = panel.submit().await;

    assert_eq!(outcome, SubmitOutcome::Authenticated);
    assert_eq!(panel.token(), Some("signup-jwt".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_submission_while_in_flight_is_a_no_op() {
    let (mut panel, calls) = panel_with(Ok("jwt".to_string()));
    panel.set_email("user@example.com");
    panel.set_password("secret1");

    // First submission is accepted and leaves the panel loading.
    assert!(panel.begin_submit().is_ok());
    assert!(panel.is_loading());

    // A second submit while in flight must not dispatch anything.
    let outcome = panel.submit().await;

    assert_eq!(outcome, SubmitOutcome::Blocked(SubmitBlocked::InFlight));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_forgot_password_bad_email_blocked_before_any_request() {
    let (mut panel, calls) = panel_with(Ok(String::new()));
    panel.show_forgot_password();
    panel.set_reset_email("bad-email");

    let outcome = panel.submit().await;

    assert_eq!(outcome, SubmitOutcome::Blocked(SubmitBlocked::Invalid));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_forgot_password_success_flips_to_reset_success() {
    let (mut panel, calls) = panel_with(Ok(String::new()));
    panel.show_forgot_password();
    panel.set_reset_email("user@example.com");

    let outcome = panel.submit().await;

    assert_eq!(outcome, SubmitOutcome::ResetEmailSent);
    assert_eq!(panel.mode(), PanelMode::ResetSuccess);
    assert!(!panel.is_loading());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_timeout_error_surfaces_timeout_message() {
    let (mut panel, _calls) = panel_with(Err(ClientError::Timeout));
    panel.set_email("user@example.com");
    panel.set_password("secret1");

    panel.submit().await;

    assert_eq!(
        panel.auth_error(),
        Some("The request timed out. Please try again.")
    );
    assert!(!panel.is_loading());
}

#[tokio::test]
async fn test_connection_refused_surfaces_unreachable_message() {
    // Bind then drop a listener so the port is known-closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let transport = HttpAuthClient::new(format!("http://127.0.0.1:{}", port)).unwrap();
    let mut panel = AuthPanel::new(transport, InMemorySessionStore::new());
    panel.set_email("user@example.com");
    panel.set_password("secret1");

    let outcome = panel.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(
        panel.auth_error(),
        Some("Unable to connect to the server. Please check your connection and try again.")
    );
    assert!(!panel.is_loading());
    assert_eq!(panel.token(), None);
}
