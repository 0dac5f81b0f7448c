use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use auth_portal_api::application::auth_service::AuthService;
use auth_portal_api::data::user_repository::InMemoryUserRepository;
use auth_portal_api::domain::mailer::Mailer;
use auth_portal_api::infrastructure::logging::init_logging;
use auth_portal_api::infrastructure::smtp::{LogMailer, SmtpConfig, SmtpMailer};
use auth_portal_api::presentation::auth::{forgot_password, login, me, register};
use auth_portal_api::presentation::handlers::{AppState, api_probe, auth_probe};
use auth_portal_api::presentation::middleware::RequestContextMiddleware;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        warn!("JWT_SECRET not set; using an insecure development secret");
        "insecure-dev-secret".to_string()
    });

    let mailer: Arc<dyn Mailer> = match SmtpConfig::from_env() {
        Some(config) => {
            info!(host = %config.host, port = config.port, "Using SMTP mail relay");
            match SmtpMailer::new(&config) {
                Ok(mailer) => Arc::new(mailer),
                Err(e) => {
                    warn!(error = %e, "SMTP setup failed; falling back to log mailer");
                    Arc::new(LogMailer)
                }
            }
        }
        None => {
            warn!("SMTP not configured; reset emails will be logged only");
            Arc::new(LogMailer)
        }
    };

    info!("Creating in-memory user repository");
    let repository = InMemoryUserRepository::new();

    let auth_service = AuthService::new(Arc::new(repository), mailer, jwt_secret);
    let state = web::Data::new(AppState {
        auth_service: Arc::new(auth_service),
    });

    info!("Configuring HTTP server");
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(RequestContextMiddleware)
            .service(
                web::scope("/api")
                    .route("/test", web::get().to(api_probe))
                    .service(
                        web::scope("/auth")
                            .route("/test", web::get().to(auth_probe))
                            .route("/register", web::post().to(register))
                            .route("/login", web::post().to(login))
                            .route("/forgot-password", web::post().to(forgot_password))
                            .route("/me", web::get().to(me)),
                    ),
            )
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    info!(address = %bind_addr, "Binding server to address");
    let server = server.bind(bind_addr.as_str())?;

    info!(
        address = %bind_addr,
        routes = %"GET /api/test, GET /api/auth/test, POST /api/auth/register, POST /api/auth/login, POST /api/auth/forgot-password, GET /api/auth/me",
        "Starting HTTP server"
    );
    server.run().await
}
