pub mod error;
pub mod mailer;
pub mod repository;
pub mod user;
pub mod validation;
