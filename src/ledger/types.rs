//! Ledger record types shared by the store, reports and HTTP layers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of expense categories. Reports zero-fill in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum Category {
    Entertainment,
    #[serde(rename = "Housing/Rent")]
    #[sqlx(rename = "Housing/Rent")]
    HousingRent,
    Medical,
    Groceries,
    #[serde(rename = "Take-out")]
    #[sqlx(rename = "Take-out")]
    TakeOut,
    Insurance,
    Taxes,
    Transportation,
    Clothing,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Entertainment,
        Category::HousingRent,
        Category::Medical,
        Category::Groceries,
        Category::TakeOut,
        Category::Insurance,
        Category::Taxes,
        Category::Transportation,
        Category::Clothing,
    ];

    /// Wire label, e.g. `"Housing/Rent"`.
    pub fn label(self) -> &'static str {
        match self {
            Category::Entertainment => "Entertainment",
            Category::HousingRent => "Housing/Rent",
            Category::Medical => "Medical",
            Category::Groceries => "Groceries",
            Category::TakeOut => "Take-out",
            Category::Insurance => "Insurance",
            Category::Taxes => "Taxes",
            Category::Transportation => "Transportation",
            Category::Clothing => "Clothing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error for a label outside the category set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown expense category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn is_valid_month(month: i32) -> bool {
    (1..=12).contains(&month)
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub user_id: String,
    pub display_name: String,
    pub profile_picture: String,
}

/// A persisted expense, serialized with the field names clients expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Expense {
    #[serde(rename = "ExpenseID")]
    pub expense_id: i64,
    #[serde(rename = "Expense")]
    pub cost: i64,
    #[serde(rename = "ExpenseName")]
    pub title: String,
    #[serde(rename = "ExpenseType")]
    pub category: Category,
    #[serde(rename = "ExpenseMonth")]
    pub month: i32,
    #[serde(rename = "ExpenseYear")]
    pub year: i32,
    #[serde(skip)]
    pub user_id: String,
}

/// Fields for an expense that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub user_id: String,
    pub cost: i64,
    pub title: String,
    pub category: Category,
    pub month: i32,
    pub year: i32,
}

/// Editable fields of an existing expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseChanges {
    pub cost: i64,
    pub title: String,
    pub category: Category,
}

/// Monthly budget for one user.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Budget {
    pub budget_id: i64,
    pub month: i32,
    pub year: i32,
    pub user_id: String,
    pub amount: i64,
}

/// Time window for report queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// One month of one year.
    Month { year: i32, month: i32 },
    /// A calendar month across every year.
    MonthOfAnyYear { month: i32 },
    /// A whole year.
    Year { year: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>().unwrap(), category);
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.label()));
        }
        assert!("Rent".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_deserialize() {
        let c: Category = serde_json::from_str("\"Housing/Rent\"").unwrap();
        assert_eq!(c, Category::HousingRent);
        assert!(serde_json::from_str::<Category>("\"HousingRent\"").is_err());
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(MONTH_LABELS[0], "Jan");
        assert_eq!(MONTH_LABELS[11], "Dec");
        assert!(is_valid_month(7));
        assert!(!is_valid_month(0));
        assert!(!is_valid_month(13));
        assert!(!is_valid_month(-1));
    }

    #[test]
    fn test_expense_wire_names() {
        let expense = Expense {
            expense_id: 7,
            cost: 50,
            title: "Weekly shop".into(),
            category: Category::Groceries,
            month: 3,
            year: 2024,
            user_id: "u1".into(),
        };
        let value = serde_json::to_value(&expense).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "ExpenseID": 7,
                "Expense": 50,
                "ExpenseName": "Weekly shop",
                "ExpenseType": "Groceries",
                "ExpenseMonth": 3,
                "ExpenseYear": 2024,
            })
        );
    }
}
