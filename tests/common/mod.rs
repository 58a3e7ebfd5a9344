// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use spendlog::DataPaths;
use spendlog::application::{ExpenseService, NewExpense, RecordedExpense};
use tempfile::TempDir;

/// Helper to open a service on a fresh temporary data directory
pub fn test_service() -> Result<(ExpenseService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = ExpenseService::open(DataPaths::in_dir(temp_dir.path()))?;
    Ok((service, temp_dir))
}

/// Reopen the data directory, as a new session would
pub fn reopen(temp_dir: &TempDir) -> Result<ExpenseService> {
    Ok(ExpenseService::open(DataPaths::in_dir(temp_dir.path()))?)
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Record an expense, letting the classifier pick the category
pub fn spend(
    service: &mut ExpenseService,
    date: &str,
    description: &str,
    amount_cents: i64,
) -> Result<RecordedExpense> {
    Ok(service.record_expense(NewExpense {
        date: parse_date(date),
        description: description.to_string(),
        amount_cents,
        category: None,
    })?)
}

/// Record an expense under an explicit category
pub fn spend_in(
    service: &mut ExpenseService,
    date: &str,
    description: &str,
    category: &str,
    amount_cents: i64,
) -> Result<RecordedExpense> {
    Ok(service.record_expense(NewExpense {
        date: parse_date(date),
        description: description.to_string(),
        amount_cents,
        category: Some(category.to_string()),
    })?)
}
