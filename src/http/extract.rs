//! Typed request extractors.
//!
//! `OwnedJson<T>` and `OwnedQuery<T>` parse the payload, check that the
//! user id it names is the authenticated caller, then run the payload's own
//! validation. Handlers never see a payload that failed any of these.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;

use crate::http::error::ApiError;
use crate::http::middleware::auth::AuthenticatedUser;
use crate::http::server::AppState;
use crate::store::UnitOfWork;

/// A request payload that names the user it acts on.
pub trait OwnedRequest {
    /// User id carried in the payload.
    fn owner(&self) -> &str;

    /// Semantic checks beyond what deserialization enforces.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Body rejections keep their 413 for oversized payloads; everything else is a 400.
pub(crate) fn json_rejection(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::BadRequest(rejection.body_text())
    }
}

fn authorize<T: OwnedRequest>(caller: Option<&AuthenticatedUser>, payload: T) -> Result<T, ApiError> {
    let caller = caller.ok_or(ApiError::MissingToken)?;
    if payload.owner() != caller.user_id {
        tracing::warn!(
            caller = %caller.user_id,
            requested = %payload.owner(),
            "Token subject does not match requested user"
        );
        return Err(ApiError::UserMismatch);
    }
    payload.validate().map_err(ApiError::BadRequest)?;
    Ok(payload)
}

/// JSON body owned by the authenticated caller.
#[derive(Debug, Clone)]
pub struct OwnedJson<T>(pub T);

impl<T, S> FromRequest<S> for OwnedJson<T>
where
    T: DeserializeOwned + OwnedRequest,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let caller = req.extensions().get::<AuthenticatedUser>().cloned();
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        authorize(caller.as_ref(), payload).map(OwnedJson)
    }
}

/// Query string owned by the authenticated caller.
#[derive(Debug, Clone)]
pub struct OwnedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for OwnedQuery<T>
where
    T: DeserializeOwned + OwnedRequest,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(payload) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        authorize(parts.extensions.get::<AuthenticatedUser>(), payload).map(OwnedQuery)
    }
}

impl FromRequestParts<AppState> for UnitOfWork {
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(UnitOfWork::begin(&state.pool).await?)
    }
}
