//! Expense create / update / delete.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extract::{OwnedJson, OwnedQuery, OwnedRequest};
use crate::http::handlers::{check_month, check_non_negative, DataResponse};
use crate::http::server::AppState;
use crate::ledger::{Category, Expense, ExpenseChanges, NewExpense};
use crate::observability::metrics;
use crate::store::{expenses, UnitOfWork};

#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    #[serde(rename = "UID")]
    pub uid: String,
    #[serde(rename = "Expense")]
    pub cost: i64,
    #[serde(rename = "ExpenseType")]
    pub category: Category,
    #[serde(rename = "ExpenseMonth")]
    pub month: i32,
    #[serde(rename = "ExpenseYear")]
    pub year: i32,
    #[serde(rename = "ExpenseName")]
    pub title: String,
}

impl OwnedRequest for CreateExpenseRequest {
    fn owner(&self) -> &str {
        &self.uid
    }

    fn validate(&self) -> Result<(), String> {
        check_month(self.month)?;
        check_non_negative("Expense", self.cost)
    }
}

#[derive(Debug, Serialize)]
pub struct CreateExpenseResponse {
    #[serde(rename = "Data")]
    pub data: &'static str,
    #[serde(rename = "Expense")]
    pub expense: Expense,
}

/// `POST /CreateExpense`.
pub async fn create(
    State(state): State<AppState>,
    OwnedJson(request): OwnedJson<CreateExpenseRequest>,
) -> Result<Json<CreateExpenseResponse>, ApiError> {
    let mut uow = UnitOfWork::begin(&state.pool).await?;
    let new = NewExpense {
        user_id: request.uid,
        cost: request.cost,
        title: request.title,
        category: request.category,
        month: request.month,
        year: request.year,
    };
    let expense = expenses::insert(uow.conn(), &new).await?;
    uow.commit().await?;

    metrics::record_expense_created();
    tracing::info!(
        user_id = %expense.user_id,
        expense_id = expense.expense_id,
        category = %expense.category,
        "Expense created"
    );

    Ok(Json(CreateExpenseResponse {
        data: "Success",
        expense,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    #[serde(rename = "UserID")]
    pub user_id: String,
    #[serde(rename = "ExpenseID")]
    pub expense_id: i64,
    #[serde(rename = "Expense")]
    pub cost: i64,
    #[serde(rename = "ExpenseType")]
    pub category: Category,
    #[serde(rename = "ExpenseName")]
    pub title: String,
}

impl OwnedRequest for UpdateExpenseRequest {
    fn owner(&self) -> &str {
        &self.user_id
    }

    fn validate(&self) -> Result<(), String> {
        check_non_negative("Expense", self.cost)
    }
}

/// `PUT /UpdateExpense`.
pub async fn update(
    State(state): State<AppState>,
    OwnedJson(request): OwnedJson<UpdateExpenseRequest>,
) -> Result<Json<DataResponse>, ApiError> {
    let mut uow = UnitOfWork::begin(&state.pool).await?;
    let changes = ExpenseChanges {
        cost: request.cost,
        title: request.title,
        category: request.category,
    };
    if !expenses::update(uow.conn(), request.expense_id, &request.user_id, &changes).await? {
        return Err(ApiError::NotFound("Not found"));
    }
    uow.commit().await?;

    tracing::info!(user_id = %request.user_id, expense_id = request.expense_id, "Expense updated");
    Ok(Json(DataResponse::new("Success")))
}

#[derive(Debug, Deserialize)]
pub struct DeleteExpenseQuery {
    #[serde(rename = "UserID")]
    pub user_id: String,
    #[serde(rename = "ExpenseID")]
    pub expense_id: i64,
}

impl OwnedRequest for DeleteExpenseQuery {
    fn owner(&self) -> &str {
        &self.user_id
    }
}

/// `DELETE /DeleteExpense`.
pub async fn delete(
    OwnedQuery(query): OwnedQuery<DeleteExpenseQuery>,
    mut uow: UnitOfWork,
) -> Result<Json<DataResponse>, ApiError> {
    if !expenses::delete(uow.conn(), query.expense_id, &query.user_id).await? {
        return Err(ApiError::NotFound("Does Not Exist"));
    }
    uow.commit().await?;

    tracing::info!(user_id = %query.user_id, expense_id = query.expense_id, "Expense deleted");
    Ok(Json(DataResponse::new("Successfully deleted Expense")))
}
