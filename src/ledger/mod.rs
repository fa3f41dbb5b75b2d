//! Expense ledger domain.
//!
//! # Data Flow
//! ```text
//! store (rows filtered by user + period)
//!     → types.rs (User, Expense, Budget, Category)
//!     → reports.rs (bar / line / pie aggregations)
//!     → http handlers (JSON)
//! ```

pub mod reports;
pub mod types;

pub use reports::{CategoryPoint, MonthPoint, TotalOverflow};
pub use types::{Budget, Category, Expense, ExpenseChanges, NewExpense, Period, User};
