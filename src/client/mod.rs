pub mod form;
pub mod session;
pub mod transport;
