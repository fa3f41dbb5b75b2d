use axum::{extract::State, Json};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extract::{OwnedJson, OwnedRequest};
use crate::http::handlers::{check_non_negative, DataResponse};
use crate::http::server::AppState;
use crate::store::{budgets, UnitOfWork};

#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    #[serde(rename = "BudgetID")]
    pub budget_id: i64,
    #[serde(rename = "UserID")]
    pub user_id: String,
    #[serde(rename = "Amount")]
    pub amount: i64,
}

impl OwnedRequest for UpdateBudgetRequest {
    fn owner(&self) -> &str {
        &self.user_id
    }

    fn validate(&self) -> Result<(), String> {
        check_non_negative("Amount", self.amount)
    }
}

/// `PUT /UpdateMonthlyBudget`.
pub async fn update_monthly(
    State(state): State<AppState>,
    OwnedJson(request): OwnedJson<UpdateBudgetRequest>,
) -> Result<Json<DataResponse>, ApiError> {
    let mut uow = UnitOfWork::begin(&state.pool).await?;
    if !budgets::update_amount(uow.conn(), request.budget_id, &request.user_id, request.amount).await? {
        return Err(ApiError::NotFound("Budget was not found"));
    }
    uow.commit().await?;

    tracing::info!(
        user_id = %request.user_id,
        budget_id = request.budget_id,
        amount = request.amount,
        "Budget updated"
    );
    Ok(Json(DataResponse::new("Successfully updated Budget")))
}
