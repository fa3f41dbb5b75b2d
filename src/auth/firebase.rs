//! Firebase ID token verification.
//!
//! # Responsibilities
//! - Fetch Google's published JWK set and cache keys by key id
//! - Check RS256 signature, expiry, audience (project id) and issuer
//! - Extract the caller's user id from the claims
//!
//! # Design Decisions
//! - Keys are refetched after `jwks_refresh_secs`, or once early when a
//!   token names a key id the cache does not know (key rotation)
//! - Refreshes are serialized; concurrent callers reuse the fresh set

use std::sync::Mutex;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures_util::future::BoxFuture;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::auth::verifier::{AuthError, TokenVerifier, VerifiedToken};
use crate::config::{AuthConfig, TimeoutConfig};

const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    user_id: Option<String>,
}

impl FirebaseClaims {
    /// Firebase mirrors the uid into `user_id`; fall back to `sub`.
    fn into_subject(self) -> Result<String, AuthError> {
        let subject = self.user_id.filter(|id| !id.is_empty()).unwrap_or(self.sub);
        if subject.is_empty() {
            return Err(AuthError::Malformed("empty subject".into()));
        }
        Ok(subject)
    }
}

/// Verifier for Firebase Authentication ID tokens.
pub struct FirebaseVerifier {
    client: reqwest::Client,
    jwks_url: String,
    project_id: String,
    refresh_interval: Duration,
    keys: DashMap<String, DecodingKey>,
    fetched_at: Mutex<Option<Instant>>,
    refresh_lock: tokio::sync::Mutex<()>,
}

impl FirebaseVerifier {
    pub fn new(auth: &AuthConfig, timeouts: &TimeoutConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.jwks_fetch_secs))
            .build()
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        Ok(Self {
            client,
            jwks_url: auth.jwks_url.clone(),
            project_id: auth.project_id.clone(),
            refresh_interval: Duration::from_secs(auth.jwks_refresh_secs),
            keys: DashMap::new(),
            fetched_at: Mutex::new(None),
            refresh_lock: tokio::sync::Mutex::new(()),
        })
    }

    fn is_fresh(&self) -> bool {
        let fetched_at = *self.fetched_at.lock().unwrap_or_else(|e| e.into_inner());
        fetched_at.is_some_and(|at| at.elapsed() < self.refresh_interval)
    }

    /// Refetch the key set. `force` skips the freshness check.
    async fn refresh(&self, force: bool) -> Result<(), AuthError> {
        let _guard = self.refresh_lock.lock().await;
        if !force && self.is_fresh() {
            return Ok(());
        }

        let set: JwkSet = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        self.keys.clear();
        for jwk in &set.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    self.keys.insert(kid, key);
                }
                Err(e) => tracing::warn!(kid = %kid, error = %e, "Skipping unusable signing key"),
            }
        }

        *self.fetched_at.lock().unwrap_or_else(|e| e.into_inner()) = Some(Instant::now());
        tracing::debug!(keys = self.keys.len(), url = %self.jwks_url, "Signing keys refreshed");
        Ok(())
    }

    async fn key_for(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let mut refreshed = false;
        if !self.is_fresh() {
            self.refresh(false).await?;
            refreshed = true;
        }

        if let Some(key) = self.keys.get(kid) {
            return Ok(key.value().clone());
        }
        if !refreshed {
            self.refresh(true).await?;
        }

        self.keys
            .get(kid)
            .map(|key| key.value().clone())
            .ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.project_id.as_str()]);
        validation.set_issuer(&[format!("{}{}", ISSUER_PREFIX, self.project_id)]);
        validation
    }

    async fn verify_token(&self, token: &str) -> Result<VerifiedToken, AuthError> {
        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::Malformed(format!("unexpected algorithm {:?}", header.alg)));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::Malformed("missing key id".into()))?;

        let key = self.key_for(&kid).await?;
        let data = decode::<FirebaseClaims>(token, &key, &self.validation())?;

        Ok(VerifiedToken {
            subject: data.claims.into_subject()?,
        })
    }
}

impl TokenVerifier for FirebaseVerifier {
    fn verify<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<VerifiedToken, AuthError>> {
        Box::pin(self.verify_token(token))
    }
}
