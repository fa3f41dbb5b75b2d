//! Bearer token middleware.
//! Verifies the caller's identity token before any protected handler runs.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Context attached to authenticated requests.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Pull the token out of `Authorization`.
///
/// Accepts `Bearer <token>` as well as a bare token, which older clients send.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        None if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(request.headers()).map(str::to_owned) else {
        metrics::record_auth_failure("missing");
        return Err(ApiError::MissingToken);
    };

    let verified = match state.verifier.verify(&token).await {
        Ok(verified) => verified,
        Err(e) => {
            tracing::warn!(error = %e, path = %request.uri().path(), "Token verification failed");
            metrics::record_auth_failure(e.reason());
            return Err(ApiError::InvalidToken(e));
        }
    };

    // Handler logs, including rendered errors, carry the caller's id.
    let span = tracing::info_span!("caller", user_id = %verified.subject);
    request.extensions_mut().insert(AuthenticatedUser {
        user_id: verified.subject,
    });
    Ok(next.run(request).instrument(span).await)
}
