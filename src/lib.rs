//! Expense tracker API library.

pub mod auth;
pub mod config;
pub mod http;
pub mod ledger;
pub mod lifecycle;
pub mod observability;
pub mod store;

pub use config::ApiConfig;
pub use http::{ApiServer, AppState};
pub use lifecycle::Shutdown;
