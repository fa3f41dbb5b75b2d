//! Token verifier seam and the static development verifier.

use std::collections::HashMap;

use futures_util::future::BoxFuture;
use thiserror::Error;

/// Identity asserted by a successfully verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
}

/// Errors that can occur while verifying a bearer token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token structure or claims are unusable.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Signature, expiry, audience or issuer check failed.
    #[error("{0}")]
    Rejected(#[from] jsonwebtoken::errors::Error),

    /// Token names a signing key the provider does not publish.
    #[error("unknown signing key '{0}'")]
    UnknownKey(String),

    /// Signing keys could not be retrieved.
    #[error("could not fetch signing keys: {0}")]
    KeyFetch(String),

    /// Token is not in the static table.
    #[error("unknown token")]
    UnknownToken,
}

impl AuthError {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::Malformed(_) => "malformed",
            AuthError::Rejected(_) => "rejected",
            AuthError::UnknownKey(_) => "unknown_key",
            AuthError::KeyFetch(_) => "key_fetch",
            AuthError::UnknownToken => "unknown_token",
        }
    }
}

/// Verifies a bearer token against an identity provider.
pub trait TokenVerifier: Send + Sync {
    fn verify<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<VerifiedToken, AuthError>>;
}

/// Verifier backed by a fixed token → subject table.
#[derive(Debug, Clone, Default)]
pub struct StaticVerifier {
    tokens: HashMap<String, String>,
}

impl StaticVerifier {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }
}

impl TokenVerifier for StaticVerifier {
    fn verify<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<VerifiedToken, AuthError>> {
        let result = self
            .tokens
            .get(token)
            .map(|subject| VerifiedToken {
                subject: subject.clone(),
            })
            .ok_or(AuthError::UnknownToken);
        Box::pin(std::future::ready(result))
    }
}
