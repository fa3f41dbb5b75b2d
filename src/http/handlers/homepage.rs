//! Homepage data: the month's budget plus its expenses.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extract::{OwnedQuery, OwnedRequest};
use crate::http::handlers::check_month;
use crate::ledger::{Expense, Period};
use crate::observability::metrics;
use crate::store::{budgets, expenses, UnitOfWork};

#[derive(Debug, Deserialize)]
pub struct HomepageQuery {
    #[serde(rename = "UID")]
    pub uid: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: i32,
}

impl OwnedRequest for HomepageQuery {
    fn owner(&self) -> &str {
        &self.uid
    }

    fn validate(&self) -> Result<(), String> {
        check_month(self.month)
    }
}

#[derive(Debug, Serialize)]
pub struct BudgetSummary {
    pub amount: i64,
    #[serde(rename = "ID")]
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct HomepageResponse {
    #[serde(rename = "Data")]
    pub data: &'static str,
    #[serde(rename = "Budget")]
    pub budget: BudgetSummary,
    #[serde(rename = "Expenses")]
    pub expenses: Vec<Expense>,
}

/// `GET /RetrieveHomepageData`. Creates the period's budget on first access.
pub async fn retrieve(
    OwnedQuery(query): OwnedQuery<HomepageQuery>,
    mut uow: UnitOfWork,
) -> Result<Json<HomepageResponse>, ApiError> {
    let (budget, created) =
        budgets::get_or_create(uow.conn(), &query.uid, query.year, query.month).await?;
    let period = Period::Month {
        year: query.year,
        month: query.month,
    };
    let expenses = expenses::list_for_period(uow.conn(), &query.uid, period).await?;
    uow.commit().await?;

    if created {
        metrics::record_budget_created();
        tracing::info!(
            user_id = %query.uid,
            year = query.year,
            month = query.month,
            budget_id = budget.budget_id,
            "Budget created for new period"
        );
    }

    Ok(Json(HomepageResponse {
        data: "Success",
        budget: BudgetSummary {
            amount: budget.amount,
            id: budget.budget_id,
        },
        expenses,
    }))
}
