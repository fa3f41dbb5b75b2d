//! Request middleware.

pub mod auth;
pub mod metrics;

pub use auth::{require_bearer, AuthenticatedUser};
pub use metrics::track_metrics;
