use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::LedgerService;
use crate::domain::{
    Category, DAY_LABEL_FORMAT, DEFAULT_CATEGORY, Transaction, TransactionDraft, format_amount,
};

/// Currency symbols offered for display. The ledger itself stores no currency.
pub const CURRENCY_SYMBOLS: [&str; 7] = ["$", "₹", "€", "£", "¥", "₽", "R$"];

/// Tally - Income and Expense Tracker
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "A local-first tracker for everyday income and expenses")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "TALLY_DATABASE", default_value = "tally.db")]
    pub database: String,

    /// Currency symbol used when displaying amounts
    #[arg(
        long,
        env = "TALLY_CURRENCY",
        default_value = "₹",
        value_parser = PossibleValuesParser::new(CURRENCY_SYMBOLS)
    )]
    pub currency: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record an income or expense
    Add {
        /// Amount (e.g., "4.50" or "3000")
        amount: String,

        /// Short description shown in the list
        #[arg(short, long)]
        title: String,

        /// Category label. Known labels: Food, Travel, Shopping, Bills, Salary,
        /// Entertainment, Transport, Miscellaneous
        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,

        /// Date of the transaction (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Record as income instead of expense
        #[arg(short, long)]
        income: bool,
    },

    /// Edit a transaction; omitted fields keep their current values
    Edit {
        /// Transaction ID
        id: String,

        /// New amount
        #[arg(short, long)]
        amount: Option<String>,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New category label
        #[arg(short, long)]
        category: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Mark as income
        #[arg(long, conflicts_with = "expense")]
        income: bool,

        /// Mark as expense
        #[arg(long)]
        expense: bool,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },

    /// List transactions grouped by day, most recent first
    List {
        /// Print the grouped list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show balance, total income and total expense
    Summary,

    /// List known categories
    Categories,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                let service = LedgerService::init(&self.database).await?;
                println!(
                    "Database initialized: {} ({} transactions)",
                    self.database,
                    service.list().len()
                );
            }

            Commands::Add {
                amount,
                title,
                category,
                date,
                income,
            } => {
                let mut service = open_service(&self.database).await?;
                let date = match date {
                    Some(date_str) => parse_date(&date_str)?,
                    None => Local::now().date_naive(),
                };

                let draft = TransactionDraft::new(title, amount, date, category, income);
                let transaction = service.add(&draft).await?;

                println!(
                    "Recorded {}: {} ({})",
                    direction(&transaction),
                    describe(&transaction, &self.currency),
                    transaction.id
                );
            }

            Commands::Edit {
                id,
                amount,
                title,
                category,
                date,
                income,
                expense,
            } => {
                let mut service = open_service(&self.database).await?;
                let id = parse_id(&id)?;

                let mut draft = service.get(id)?.to_draft();
                if let Some(amount) = amount {
                    draft.amount = amount;
                }
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(category) = category {
                    draft.category = category;
                }
                if let Some(date_str) = date {
                    draft.date = parse_date(&date_str)?;
                }
                if income {
                    draft.is_income = true;
                } else if expense {
                    draft.is_income = false;
                }

                let transaction = service.update(id, &draft).await?;
                println!(
                    "Updated {}: {}",
                    transaction.id,
                    describe(&transaction, &self.currency)
                );
            }

            Commands::Delete { id } => {
                let mut service = open_service(&self.database).await?;
                let removed = service.delete(parse_id(&id)?).await?;
                println!(
                    "Deleted {}: {}",
                    removed.id,
                    describe(&removed, &self.currency)
                );
            }

            Commands::List { json } => {
                let service = open_service(&self.database).await?;
                run_list_command(&service, &self.currency, json)?;
            }

            Commands::Summary => {
                let service = open_service(&self.database).await?;
                run_summary_command(&service, &self.currency);
            }

            Commands::Categories => {
                for category in Category::ALL {
                    println!("{}  {}", category.icon(), category);
                }
            }
        }

        Ok(())
    }
}

async fn open_service(database: &str) -> Result<LedgerService> {
    LedgerService::init(database)
        .await
        .with_context(|| format!("Failed to open database '{}'", database))
}

fn run_list_command(service: &LedgerService, currency: &str, json: bool) -> Result<()> {
    let groups = service.grouped_by_date();

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    for group in groups {
        println!(
            "{:<40} {:>14}",
            group.heading(),
            format_amount(currency, group.net_cents())
        );
        for transaction in &group.transactions {
            println!(
                "  {}  {:<22} {:<14} {:>14}  {}",
                transaction.icon(),
                truncate(&transaction.title, 22),
                truncate(&transaction.category, 14),
                signed_amount(transaction, currency),
                transaction.id
            );
        }
        println!();
    }
    Ok(())
}

fn run_summary_command(service: &LedgerService, currency: &str) {
    let totals = service.summary();
    println!("{:<10} {:>16}", "Balance:", format_amount(currency, totals.balance));
    println!("{:<10} {:>16}", "Income:", format_amount(currency, totals.income));
    println!("{:<10} {:>16}", "Expense:", format_amount(currency, totals.expense));
    println!("{:<10} {:>16}", "Entries:", service.list().len());
}

fn direction(transaction: &Transaction) -> &'static str {
    if transaction.is_income {
        "income"
    } else {
        "expense"
    }
}

fn signed_amount(transaction: &Transaction, currency: &str) -> String {
    let sign = if transaction.is_income { "+" } else { "-" };
    format!("{}{}", sign, format_amount(currency, transaction.amount_cents))
}

fn describe(transaction: &Transaction, currency: &str) -> String {
    format!(
        "{} {} [{}] on {}",
        transaction.title,
        signed_amount(transaction, currency),
        transaction.category,
        transaction.date.format(DAY_LABEL_FORMAT)
    )
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).context("Invalid transaction ID format (expected UUID)")
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, DAY_LABEL_FORMAT)
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}
