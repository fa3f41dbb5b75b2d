//! Chart endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extract::{OwnedQuery, OwnedRequest};
use crate::http::handlers::check_month;
use crate::http::server::AppState;
use crate::ledger::reports::{category_shares, category_totals, monthly_totals};
use crate::ledger::{CategoryPoint, MonthPoint, Period};
use crate::store::{expenses, UnitOfWork};

/// Month report query. Without `Year` the month matches across all years.
#[derive(Debug, Deserialize)]
pub struct MonthReportQuery {
    #[serde(rename = "UserID")]
    pub user_id: String,
    #[serde(rename = "Month")]
    pub month: i32,
    #[serde(rename = "Year", default)]
    pub year: Option<i32>,
}

impl MonthReportQuery {
    fn period(&self) -> Period {
        match self.year {
            Some(year) => Period::Month {
                year,
                month: self.month,
            },
            None => Period::MonthOfAnyYear { month: self.month },
        }
    }
}

impl OwnedRequest for MonthReportQuery {
    fn owner(&self) -> &str {
        &self.user_id
    }

    fn validate(&self) -> Result<(), String> {
        check_month(self.month)
    }
}

#[derive(Debug, Deserialize)]
pub struct YearReportQuery {
    #[serde(rename = "UserID")]
    pub user_id: String,
    #[serde(rename = "Year")]
    pub year: i32,
}

impl OwnedRequest for YearReportQuery {
    fn owner(&self) -> &str {
        &self.user_id
    }
}

#[derive(Debug, Serialize)]
pub struct GraphResponse<P> {
    #[serde(rename = "Data")]
    pub data: &'static str,
    #[serde(rename = "GraphData")]
    pub graph_data: Vec<P>,
}

impl<P> GraphResponse<P> {
    fn success(graph_data: Vec<P>) -> Json<Self> {
        Json(Self {
            data: "Success",
            graph_data,
        })
    }
}

/// `GET /GetBarGraph`: spend per category.
pub async fn bar_graph(
    OwnedQuery(query): OwnedQuery<MonthReportQuery>,
    mut uow: UnitOfWork,
) -> Result<Json<GraphResponse<CategoryPoint>>, ApiError> {
    let expenses = expenses::list_for_period(uow.conn(), &query.user_id, query.period()).await?;
    uow.commit().await?;

    Ok(GraphResponse::success(category_totals(&expenses)?))
}

/// `GET /GetLineGraph`: spend per month of a year.
pub async fn line_graph(
    OwnedQuery(query): OwnedQuery<YearReportQuery>,
    mut uow: UnitOfWork,
) -> Result<Json<GraphResponse<MonthPoint>>, ApiError> {
    let period = Period::Year { year: query.year };
    let expenses = expenses::list_for_period(uow.conn(), &query.user_id, period).await?;
    uow.commit().await?;

    Ok(GraphResponse::success(monthly_totals(&expenses)?))
}

/// `GET /GetPieChart`: each category's share of the month's spend.
pub async fn pie_chart(
    State(state): State<AppState>,
    OwnedQuery(query): OwnedQuery<MonthReportQuery>,
    mut uow: UnitOfWork,
) -> Result<Json<GraphResponse<CategoryPoint>>, ApiError> {
    let expenses = expenses::list_for_period(uow.conn(), &query.user_id, query.period()).await?;
    uow.commit().await?;

    Ok(GraphResponse::success(category_shares(
        &expenses,
        state.reports.pie_share_mode,
    )))
}
