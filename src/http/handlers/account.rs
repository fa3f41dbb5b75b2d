//! Registration and profile updates.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extract::{json_rejection, OwnedJson, OwnedRequest};
use crate::http::handlers::DataResponse;
use crate::http::server::AppState;
use crate::store::{users, UnitOfWork};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "UID")]
    pub uid: String,
}

/// `POST /register`. Unauthenticated and idempotent.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<DataResponse>, ApiError> {
    let Json(request) = payload.map_err(json_rejection)?;
    if request.uid.trim().is_empty() {
        return Err(ApiError::BadRequest("UID must not be empty".into()));
    }

    let mut uow = UnitOfWork::begin(&state.pool)
        .await
        .map_err(ApiError::Registration)?;
    let created = users::register(uow.conn(), &request.uid)
        .await
        .map_err(ApiError::Registration)?;
    uow.commit().await.map_err(ApiError::Registration)?;

    if created {
        tracing::info!(user_id = %request.uid, "User registered");
        Ok(Json(DataResponse::new("Success")))
    } else {
        tracing::debug!(user_id = %request.uid, "User already registered");
        Ok(Json(DataResponse::new("User already exists")))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDisplayNameRequest {
    #[serde(rename = "UserID")]
    pub user_id: String,
    #[serde(rename = "DisplayName")]
    pub display_name: String,
}

impl OwnedRequest for UpdateDisplayNameRequest {
    fn owner(&self) -> &str {
        &self.user_id
    }
}

/// `PUT /UpdateDisplayName`.
pub async fn update_display_name(
    State(state): State<AppState>,
    OwnedJson(request): OwnedJson<UpdateDisplayNameRequest>,
) -> Result<Json<DataResponse>, ApiError> {
    let mut uow = UnitOfWork::begin(&state.pool).await?;
    if !users::update_display_name(uow.conn(), &request.user_id, &request.display_name).await? {
        return Err(ApiError::NotFound("User was not found"));
    }
    uow.commit().await?;

    tracing::info!(user_id = %request.user_id, "Display name updated");
    Ok(Json(DataResponse::new("Success")))
}
