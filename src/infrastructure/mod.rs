pub mod logging;
pub mod security;
pub mod smtp;
