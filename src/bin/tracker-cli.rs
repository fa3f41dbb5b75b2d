use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Value};

use expense_tracker_api::ledger::Category;

#[derive(Parser)]
#[command(name = "tracker-cli")]
#[command(about = "Command line client for the expense tracker API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    /// Identity token sent as `Authorization: Bearer <token>`.
    #[arg(short, long, env = "TRACKER_TOKEN", default_value = "")]
    token: String,

    /// User id the token belongs to.
    #[arg(long, env = "TRACKER_USER")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the user (no token needed)
    Register,
    /// Show a month's budget and expenses
    Homepage { year: i32, month: i32 },
    /// Record an expense
    AddExpense {
        cost: i64,
        /// One of the fixed labels, e.g. "Housing/Rent" or "Take-out".
        #[arg(long, default_value = "Groceries")]
        category: Category,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        month: i32,
        #[arg(long)]
        year: i32,
    },
    /// Delete an expense
    DeleteExpense { expense_id: i64 },
    /// Set a budget amount
    SetBudget { budget_id: i64, amount: i64 },
    /// Spend per category for a month
    Bar {
        month: i32,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Spend per month for a year
    Line { year: i32 },
    /// Category shares for a month
    Pie {
        month: i32,
        #[arg(long)]
        year: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if !cli.token.is_empty() {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", cli.token))?,
        );
    }

    let request = |method: Method, path: &str| -> RequestBuilder {
        client
            .request(method, format!("{}{}", cli.url, path))
            .headers(headers.clone())
    };

    let user = cli.user.as_str();
    let res = match cli.command {
        Commands::Register => {
            request(Method::POST, "/register")
                .json(&json!({ "UID": user }))
                .send()
                .await?
        }
        Commands::Homepage { year, month } => {
            request(Method::GET, "/RetrieveHomepageData")
                .query(&[("UID", user.to_string()), ("Year", year.to_string()), ("Month", month.to_string())])
                .send()
                .await?
        }
        Commands::AddExpense { cost, category, name, month, year } => {
            request(Method::POST, "/CreateExpense")
                .json(&json!({
                    "UID": user,
                    "Expense": cost,
                    "ExpenseType": category,
                    "ExpenseName": name,
                    "ExpenseMonth": month,
                    "ExpenseYear": year,
                }))
                .send()
                .await?
        }
        Commands::DeleteExpense { expense_id } => {
            request(Method::DELETE, "/DeleteExpense")
                .query(&[("UserID", user.to_string()), ("ExpenseID", expense_id.to_string())])
                .send()
                .await?
        }
        Commands::SetBudget { budget_id, amount } => {
            request(Method::PUT, "/UpdateMonthlyBudget")
                .json(&json!({ "BudgetID": budget_id, "UserID": user, "Amount": amount }))
                .send()
                .await?
        }
        Commands::Bar { month, year } => {
            request(Method::GET, "/GetBarGraph")
                .query(&month_query(user, month, year))
                .send()
                .await?
        }
        Commands::Line { year } => {
            request(Method::GET, "/GetLineGraph")
                .query(&[("UserID", user.to_string()), ("Year", year.to_string())])
                .send()
                .await?
        }
        Commands::Pie { month, year } => {
            request(Method::GET, "/GetPieChart")
                .query(&month_query(user, month, year))
                .send()
                .await?
        }
    };

    print_response(res).await
}

fn month_query(user: &str, month: i32, year: Option<i32>) -> Vec<(&'static str, String)> {
    let mut query = vec![("UserID", user.to_string()), ("Month", month.to_string())];
    if let Some(year) = year {
        query.push(("Year", year.to_string()));
    }
    query
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body: Value = res.json().await.unwrap_or(Value::Null);

    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        eprintln!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
