//! Endpoint handlers.
//!
//! Protected handlers receive payloads that already passed token
//! verification, the ownership check and validation (see `extract.rs`),
//! plus a `UnitOfWork` they must commit before answering.

pub mod account;
pub mod budget;
pub mod expenses;
pub mod health;
pub mod homepage;
pub mod reports;

use serde::Serialize;

use crate::ledger::types::is_valid_month;

/// `{"Data": "<message>"}` acknowledgement.
#[derive(Debug, Serialize)]
pub struct DataResponse {
    #[serde(rename = "Data")]
    pub data: &'static str,
}

impl DataResponse {
    pub fn new(data: &'static str) -> Self {
        Self { data }
    }
}

pub(crate) fn check_month(month: i32) -> Result<(), String> {
    if is_valid_month(month) {
        Ok(())
    } else {
        Err(format!("Month must be between 1 and 12, got {}", month))
    }
}

pub(crate) fn check_non_negative(field: &str, value: i64) -> Result<(), String> {
    if value < 0 {
        Err(format!("{} must not be negative", field))
    } else {
        Ok(())
    }
}
