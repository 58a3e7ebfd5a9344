use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Cents;

/// A single dated expense. Records are never edited once appended to a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount_cents: Cents,
}

impl ExpenseRecord {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        category: impl Into<String>,
        amount_cents: Cents,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            category: category.into(),
            amount_cents,
        }
    }

    /// Check the invariants `Ledger::add` enforces.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if self.amount_cents <= 0 {
            return Err(ValidationError::NonPositiveAmount(self.amount_cents));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyDescription,
    NonPositiveAmount(Cents),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyDescription => write!(f, "Please enter a description"),
            ValidationError::NonPositiveAmount(amount) => write!(
                f,
                "Amount must be positive (got {})",
                super::format_cents(*amount)
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
