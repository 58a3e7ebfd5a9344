use std::fs;

use anyhow::Context;
use chrono::NaiveDate;

use crate::domain::{
    CategoryError, CategoryFilter, CategoryStore, Cents, DateRange, ExpenseRecord, Ledger,
    classify, total,
};
use crate::storage::{
    DataPaths, ensure_categories_file, ensure_ledger_file, load_categories, load_ledger,
    save_categories, save_ledger,
};

use super::{AppError, CategoryReport, ExpenseListing};

/// Application service tying the classifier, the ledger and storage together.
/// This is the interface any front end (CLI, TUI, ...) drives.
pub struct ExpenseService {
    paths: DataPaths,
    categories: CategoryStore,
    ledger: Ledger,
    load_warnings: Vec<String>,
    created_files: Vec<String>,
}

/// Input for recording an expense.
pub struct NewExpense {
    pub date: NaiveDate,
    pub description: String,
    pub amount_cents: Cents,
    /// Explicit category; `None` takes the classifier's suggestion.
    pub category: Option<String>,
}

/// Result of recording an expense
#[derive(Debug)]
pub struct RecordedExpense {
    pub record: ExpenseRecord,
    pub suggested: bool,
}

/// Filter for listing expenses. Missing dates default to the ledger's bounds.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub category: Option<String>,
}

impl ExpenseService {
    /// Open the data directory, creating any missing files with their
    /// initial contents, and load both stores.
    pub fn open(paths: DataPaths) -> Result<Self, AppError> {
        fs::create_dir_all(&paths.dir)
            .with_context(|| format!("Failed to create data directory {}", paths.dir.display()))?;

        let mut created_files = Vec::new();
        let ledger_path = paths.ledger_path();
        if ensure_ledger_file(&ledger_path)? {
            tracing::info!(path = %ledger_path.display(), "created ledger file");
            created_files.push(ledger_path.display().to_string());
        }
        let categories_path = paths.categories_path();
        if ensure_categories_file(&categories_path)? {
            tracing::info!(path = %categories_path.display(), "created categories file");
            created_files.push(categories_path.display().to_string());
        }

        let mut load_warnings = Vec::new();
        let (ledger, ledger_warning) = load_ledger(&ledger_path).into_parts();
        let (categories, categories_warning) = load_categories(&categories_path).into_parts();
        if let Some(reason) = ledger_warning {
            load_warnings.push(format!("Expenses could not be loaded: {}", reason));
        }
        if let Some(reason) = categories_warning {
            load_warnings.push(format!("Categories could not be loaded: {}", reason));
        }

        Ok(Self {
            paths,
            categories,
            ledger,
            load_warnings,
            created_files,
        })
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    pub fn categories(&self) -> &CategoryStore {
        &self.categories
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Reasons why persisted state was replaced by defaults during `open`.
    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    /// Files created by `open` because they did not exist yet.
    pub fn created_files(&self) -> &[String] {
        &self.created_files
    }

    // ========================
    // Expense operations
    // ========================

    /// Suggest a category for a description.
    pub fn suggest_category(&self, description: &str) -> &str {
        classify(description, &self.categories)
    }

    /// Validate and append an expense, then save the ledger.
    pub fn record_expense(&mut self, expense: NewExpense) -> Result<RecordedExpense, AppError> {
        let (category, suggested) = match expense.category {
            Some(category) => {
                if !self.categories.contains(&category) {
                    return Err(CategoryError::NotFound(category).into());
                }
                (category, false)
            }
            None => (self.suggest_category(&expense.description).to_string(), true),
        };

        let record = ExpenseRecord::new(
            expense.date,
            expense.description,
            category,
            expense.amount_cents,
        );
        // Saved before it replaces the in-memory ledger, so a failed save
        // leaves the session unchanged.
        let mut ledger = self.ledger.clone();
        ledger.add(record.clone())?;
        save_ledger(&self.paths.ledger_path(), &ledger)?;
        self.ledger = ledger;

        tracing::info!(
            date = %record.date,
            category = %record.category,
            amount_cents = record.amount_cents,
            suggested,
            "recorded expense"
        );
        Ok(RecordedExpense { record, suggested })
    }

    /// Resolve a filter against the ledger. `None` when the ledger is empty
    /// and no explicit range was given.
    fn resolve_range(&self, filter: &ExpenseFilter) -> Option<DateRange> {
        let bounds = self.ledger.date_bounds();
        let start = filter.from_date.or(bounds.map(|b| b.start))?;
        let end = filter.to_date.or(bounds.map(|b| b.end))?;
        Some(DateRange::new(start, end))
    }

    /// Expenses matching the filter, in recording order, with their total.
    pub fn list_expenses(&self, filter: &ExpenseFilter) -> Option<ExpenseListing> {
        let range = self.resolve_range(filter)?;
        let category = CategoryFilter::from_name(filter.category.as_deref());
        let matching = self.ledger.filter(range, &category);

        Some(ExpenseListing {
            from_date: range.start,
            to_date: range.end,
            total: total(matching.iter().copied()),
            expenses: matching.into_iter().cloned().collect(),
        })
    }

    /// Per-category spending breakdown over the filtered expenses.
    pub fn spending_report(&self, filter: &ExpenseFilter) -> Option<CategoryReport> {
        if self.ledger.is_empty() {
            return None;
        }
        let range = self.resolve_range(filter)?;
        let category = CategoryFilter::from_name(filter.category.as_deref());
        let matching = self.ledger.filter(range, &category);

        Some(CategoryReport::build(
            range.start,
            range.end,
            matching.iter().copied(),
        ))
    }

    // ========================
    // Category operations
    // ========================

    /// Add an empty category and save the store.
    pub fn add_category(&mut self, name: &str) -> Result<(), AppError> {
        let mut categories = self.categories.clone();
        categories.add_category(name)?;
        save_categories(&self.paths.categories_path(), &categories)?;
        self.categories = categories;
        tracing::info!(category = name, "added category");
        Ok(())
    }

    /// Append a keyword to a category and save the store.
    pub fn add_keyword(&mut self, category: &str, keyword: &str) -> Result<(), AppError> {
        // The empty string is a substring of everything.
        if keyword.is_empty() {
            return Err(AppError::EmptyKeyword);
        }
        let mut categories = self.categories.clone();
        categories.add_keyword(category, keyword)?;
        save_categories(&self.paths.categories_path(), &categories)?;
        self.categories = categories;
        tracing::info!(category, keyword, "added keyword");
        Ok(())
    }
}
