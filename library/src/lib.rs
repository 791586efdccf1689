pub mod converter;
pub mod error;
pub mod loader;
pub mod model;
pub mod session;
