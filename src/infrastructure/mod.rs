//! Infrastructure layer: configuration, credentials, and store adapters.

pub mod config;
pub mod credentials;
pub mod store;
