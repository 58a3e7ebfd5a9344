use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::application::{CategoryReport, ExpenseFilter, ExpenseListing, ExpenseService, NewExpense};
use crate::domain::{format_cents, parse_cents};
use crate::storage::{DEFAULT_CATEGORIES_FILE, DEFAULT_LEDGER_FILE, DataPaths};

/// Spendlog - Personal Expense Tracker
#[derive(Parser)]
#[command(name = "spendlog")]
#[command(about = "A local-first expense tracker that suggests categories from keywords")]
#[command(version)]
pub struct Cli {
    /// Directory holding the expense and category files
    #[arg(long, env = "SPENDLOG_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Expense ledger file name (CSV), relative to the data directory
    #[arg(long, env = "SPENDLOG_LEDGER_FILE", default_value = DEFAULT_LEDGER_FILE)]
    pub ledger_file: PathBuf,

    /// Category definitions file name (JSON), relative to the data directory
    #[arg(long, env = "SPENDLOG_CATEGORIES_FILE", default_value = DEFAULT_CATEGORIES_FILE)]
    pub categories_file: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data files if they don't exist yet
    Init,

    /// Record an expense
    Add {
        /// Amount spent (e.g., "12.50" or "12")
        amount: String,

        /// What the money was spent on
        #[arg(short, long)]
        description: String,

        /// Category (defaults to the suggestion for the description)
        #[arg(short, long)]
        category: Option<String>,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show the category suggested for a description
    Suggest {
        /// Description to classify
        description: String,
    },

    /// List expenses, optionally filtered by date range and category
    List {
        /// Start date (YYYY-MM-DD, defaults to the earliest expense)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, defaults to the latest expense)
        #[arg(long)]
        to: Option<String>,

        /// Category to show ("All" for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Total spent and breakdown by category
    Summary {
        /// Start date (YYYY-MM-DD, defaults to the earliest expense)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, defaults to the latest expense)
        #[arg(long)]
        to: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories and their keywords
    List,

    /// Add a new category
    Add {
        /// Category name (must be unique)
        name: String,
    },

    /// Add a keyword to an existing category
    Keyword {
        /// Category name
        category: String,

        /// Keyword matched (case-insensitively) inside descriptions
        keyword: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl Cli {
    fn data_paths(&self) -> DataPaths {
        DataPaths {
            dir: self.data_dir.clone(),
            ledger_file: self.ledger_file.clone(),
            categories_file: self.categories_file.clone(),
        }
    }

    /// Install the log subscriber. `RUST_LOG` wins over `--verbose`.
    pub fn init_tracing(&self) {
        let default_directive = if self.verbose {
            "spendlog=debug"
        } else {
            "spendlog=warn"
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .init();
    }

    pub fn run(self) -> Result<()> {
        // Every command opens the data directory, which also creates missing files.
        let mut service = ExpenseService::open(self.data_paths())?;
        report_load_warnings(&service);

        match self.command {
            Commands::Init => {
                if service.created_files().is_empty() {
                    println!("Already initialized: {}", service.paths().dir.display());
                } else {
                    for file in service.created_files() {
                        println!("Created: {}", file);
                    }
                }
            }

            Commands::Add {
                amount,
                description,
                category,
                date,
            } => {
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '12.50' or '12'")?;
                let date = match date {
                    Some(date_str) => parse_date(&date_str)?,
                    None => Local::now().date_naive(),
                };

                let result = service.record_expense(NewExpense {
                    date,
                    description,
                    amount_cents,
                    category,
                })?;

                println!(
                    "Recorded expense: {} {} \"{}\" on {}{}",
                    format_cents(result.record.amount_cents),
                    result.record.category,
                    result.record.description,
                    result.record.date.format("%Y-%m-%d"),
                    if result.suggested { " (suggested category)" } else { "" }
                );
            }

            Commands::Suggest { description } => {
                println!("{}", service.suggest_category(&description));
            }

            Commands::List {
                from,
                to,
                category,
                format,
            } => {
                let filter = build_filter(from, to, category)?;
                match service.list_expenses(&filter) {
                    Some(listing) => print_listing(&listing, format)?,
                    None => println!("No expenses to display."),
                }
            }

            Commands::Summary { from, to, format } => {
                let filter = build_filter(from, to, None)?;
                match service.spending_report(&filter) {
                    Some(report) => print_report(&report, format)?,
                    None => println!("No expenses recorded yet. Add one with `spendlog add`."),
                }
            }

            Commands::Category(category_cmd) => {
                run_category_command(&mut service, category_cmd)?;
            }
        }

        Ok(())
    }
}

fn report_load_warnings(service: &ExpenseService) {
    for warning in service.load_warnings() {
        eprintln!("Warning: {}", warning);
    }
}

fn run_category_command(service: &mut ExpenseService, cmd: CategoryCommands) -> Result<()> {
    match cmd {
        CategoryCommands::List => {
            let categories = service.categories();
            if categories.is_empty() {
                println!("No categories defined.");
            } else {
                println!("{:<20} KEYWORDS", "CATEGORY");
                println!("{}", "-".repeat(50));
                for category in categories.iter() {
                    println!(
                        "{:<20} {}",
                        truncate(&category.name, 20),
                        category.keywords.join(", ")
                    );
                }
            }
        }

        CategoryCommands::Add { name } => {
            service.add_category(&name)?;
            println!("Added category: {}", name);
        }

        CategoryCommands::Keyword { category, keyword } => {
            service.add_keyword(&category, &keyword)?;
            println!("Added keyword '{}' to {}", keyword, category);
        }
    }
    Ok(())
}

fn build_filter(
    from: Option<String>,
    to: Option<String>,
    category: Option<String>,
) -> Result<ExpenseFilter> {
    Ok(ExpenseFilter {
        from_date: from.as_deref().map(parse_date).transpose()?,
        to_date: to.as_deref().map(parse_date).transpose()?,
        category,
    })
}

fn print_listing(listing: &ExpenseListing, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(listing)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            writer.write_record(["Date", "Description", "Category", "Amount"])?;
            for expense in &listing.expenses {
                writer.write_record([
                    expense.date.format("%Y-%m-%d").to_string(),
                    expense.description.clone(),
                    expense.category.clone(),
                    format_cents(expense.amount_cents),
                ])?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            println!(
                "Expenses: {} to {}",
                listing.from_date.format("%Y-%m-%d"),
                listing.to_date.format("%Y-%m-%d")
            );
            println!();
            if listing.expenses.is_empty() {
                println!("No expenses match the filter.");
            } else {
                println!(
                    "{:<12} {:<30} {:<16} {:>12}",
                    "DATE", "DESCRIPTION", "CATEGORY", "AMOUNT"
                );
                println!("{}", "-".repeat(73));
                for expense in &listing.expenses {
                    println!(
                        "{:<12} {:<30} {:<16} {:>12}",
                        expense.date.format("%Y-%m-%d"),
                        truncate(&expense.description, 30),
                        truncate(&expense.category, 16),
                        format_cents(expense.amount_cents)
                    );
                }
                println!("{}", "-".repeat(73));
            }
            println!("{:<60} {:>12}", "FILTERED TOTAL", format_cents(listing.total));
        }
    }
    Ok(())
}

fn print_report(report: &CategoryReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Csv => {
            write_report_csv(report, io::stdout())?;
        }
        OutputFormat::Table => {
            println!("Spending Dashboard");
            println!(
                "Period: {} to {}",
                report.from_date.format("%Y-%m-%d"),
                report.to_date.format("%Y-%m-%d")
            );
            println!();
            println!("Total Spent: {}", format_cents(report.total));
            println!();
            println!(
                "{:<20} {:>12} {:>8} {:>12} {:>8}  SHARE",
                "CATEGORY", "TOTAL", "COUNT", "AVERAGE", "PERCENT"
            );
            println!("{}", "-".repeat(85));

            for cat in &report.categories {
                println!(
                    "{:<20} {:>12} {:>8} {:>12} {:>7.1}%  {}",
                    truncate(&cat.category, 20),
                    format_cents(cat.total),
                    cat.count,
                    format_cents(cat.average),
                    cat.percentage,
                    share_bar(cat.percentage)
                );
            }
        }
    }
    Ok(())
}

/// Category breakdown as CSV, quoting names that need it.
fn write_report_csv<W: io::Write>(report: &CategoryReport, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["category", "total", "count", "average", "percentage"])?;
    for cat in &report.categories {
        writer.write_record([
            cat.category.clone(),
            format_cents(cat.total),
            cat.count.to_string(),
            format_cents(cat.average),
            format!("{:.2}", cat.percentage),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// One block per 5% of the total.
fn share_bar(percentage: f64) -> String {
    "#".repeat((percentage / 5.0).round() as usize)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}
