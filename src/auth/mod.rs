//! Identity token verification.
//!
//! # Data Flow
//! ```text
//! Authorization header
//!     → http middleware (extract bearer token)
//!     → TokenVerifier::verify
//!         firebase.rs: JWKS signature + audience + issuer + expiry
//!         verifier.rs: static token table (development, tests)
//!     → VerifiedToken { subject }
//! ```

pub mod firebase;
pub mod verifier;

use std::sync::Arc;

pub use firebase::FirebaseVerifier;
pub use verifier::{AuthError, StaticVerifier, TokenVerifier, VerifiedToken};

use crate::config::{ApiConfig, AuthProvider};

/// Build the verifier selected by configuration.
pub fn from_config(config: &ApiConfig) -> Result<Arc<dyn TokenVerifier>, AuthError> {
    match config.auth.provider {
        AuthProvider::Firebase => {
            tracing::info!(project_id = %config.auth.project_id, "Using Firebase token verification");
            Ok(Arc::new(FirebaseVerifier::new(&config.auth, &config.timeouts)?))
        }
        AuthProvider::Static => {
            tracing::warn!(
                tokens = config.auth.static_tokens.len(),
                "Using static token table; do not run this in production"
            );
            Ok(Arc::new(StaticVerifier::new(config.auth.static_tokens.clone())))
        }
    }
}
