//! Command-line front end for the budget tracker.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the store.
//! - Map subcommands onto `budget_core` use cases and print the result.

mod render;

use anyhow::{Context, Result};
use budget_core::db::open_db;
use budget_core::{
    current_date, init_logging, BudgetConfig, BudgetService, ItemDraft, ItemId, ItemService,
    Period, ServiceDraft, ServiceEdit, SqliteItemRepository, SqliteServiceRepository,
    SystemClock,
};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "budget",
    version,
    about = "Monthly budget tracker with per-service spending limits"
)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true, env = "BUDGET_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database path (overrides the config file)
    #[arg(long, global = true, env = "BUDGET_DB")]
    db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, env = "BUDGET_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current month usage per service (rolls services forward on a new month)
    #[command(alias = "dash")]
    Dashboard,

    /// Month-over-month limits and usage
    History,

    /// Service management commands
    #[command(subcommand)]
    Service(ServiceCommands),

    /// Purchased item commands
    #[command(subcommand)]
    Item(ItemCommands),

    /// Show effective configuration and paths
    Config,
}

#[derive(Subcommand)]
enum ServiceCommands {
    /// List services of the current month
    List,

    /// Register a service in the current month
    Add {
        /// Service name
        name: String,
        /// Monthly upper limit (positive integer)
        limit: String,
    },

    /// Change a current-month service's limit
    Edit {
        /// Service name
        name: String,
        /// New upper limit
        #[arg(short, long)]
        limit: String,
        /// New name
        #[arg(short, long)]
        rename: Option<String>,
    },

    /// Delete a current-month service (its items are kept)
    Delete {
        /// Service name
        name: String,
    },

    /// Show one service's items and usage
    Show {
        /// Service name
        name: String,
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        period: Option<Period>,
    },
}

#[derive(Subcommand)]
enum ItemCommands {
    /// List items purchased in a month
    List {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        period: Option<Period>,
    },

    /// Record a purchase
    Add {
        /// Service the purchase counts against
        service: String,
        /// Item name
        name: String,
        /// Price (non-negative integer)
        price: String,
        /// Category, see `item attributes`
        #[arg(short, long)]
        attribute: String,
        /// Purchase date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Edit a purchase; omitted fields keep their value
    Edit {
        /// Item ID
        id: ItemId,
        #[arg(short, long)]
        service: Option<String>,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        price: Option<String>,
        #[arg(short, long)]
        attribute: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete a purchase
    Delete {
        /// Item ID
        id: ItemId,
    },

    /// List the item categories
    Attributes,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<BudgetConfig> {
    let mut config = BudgetConfig::load_or_default(cli.config.as_deref())?;
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    init_logging(&config.log_level, &config.log_dir).context("failed to initialize logging")?;
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    let conn = open_db(&config.database_path).with_context(|| {
        format!("failed to open database `{}`", config.database_path.display())
    })?;
    info!("event=cli_start module=cli status=ok");

    let budget = BudgetService::new(
        SqliteServiceRepository::new(&conn),
        SqliteItemRepository::new(&conn),
        SystemClock,
    );
    let items = ItemService::new(
        SqliteServiceRepository::new(&conn),
        SqliteItemRepository::new(&conn),
        SystemClock,
    );
    let json = cli.json;

    match cli.command {
        Commands::Dashboard => emit(json, &budget.dashboard()?, render::dashboard),
        Commands::History => emit(json, &budget.history()?, render::history),
        Commands::Config => emit(json, &config, render::config),
        Commands::Service(cmd) => match cmd {
            ServiceCommands::List => {
                emit(json, budget.list_services()?.as_slice(), render::services)
            }
            ServiceCommands::Add { name, limit } => {
                let service = budget.register_service(&ServiceDraft::new(name, limit))?;
                emit(json, &service, |service| {
                    format!(
                        "Registered service: {} ({} limit {})\n",
                        service.service_name, service.period, service.upper_limit
                    )
                })
            }
            ServiceCommands::Edit {
                name,
                limit,
                rename,
            } => {
                let service = budget.edit_service(
                    &name,
                    &ServiceEdit {
                        new_name: rename,
                        upper_limit: limit,
                    },
                )?;
                emit(json, &service, |service| {
                    format!(
                        "Updated service: {} (limit {})\n",
                        service.service_name, service.upper_limit
                    )
                })
            }
            ServiceCommands::Delete { name } => {
                budget.delete_service(&name)?;
                emit(json, &name, |name| format!("Deleted service: {name}\n"))
            }
            ServiceCommands::Show { name, period } => {
                let period = period.unwrap_or_else(|| budget.current_period());
                emit(json, &budget.service_detail(period, &name)?, render::service_detail)
            }
        },
        Commands::Item(cmd) => match cmd {
            ItemCommands::List { period } => {
                let period = period.unwrap_or_else(|| budget.current_period());
                emit(json, items.list_items(period)?.as_slice(), render::items)
            }
            ItemCommands::Add {
                service,
                name,
                price,
                attribute,
                date,
            } => {
                let draft = ItemDraft {
                    purchase_date: date
                        .unwrap_or_else(|| current_date(&SystemClock).to_string()),
                    service_name: service,
                    item_name: name,
                    item_price: price,
                    item_attribute: attribute,
                };
                let item = items.register_item(&draft)?;
                emit(json, &item, |item| {
                    format!("Recorded item {}: {}\n", item.item_id, item.item_name)
                })
            }
            ItemCommands::Edit {
                id,
                service,
                name,
                price,
                attribute,
                date,
            } => {
                let current = items.get_item(id)?;
                let draft = ItemDraft {
                    purchase_date: date.unwrap_or_else(|| current.purchase_date.to_string()),
                    service_name: service.unwrap_or(current.service_name),
                    item_name: name.unwrap_or(current.item_name),
                    item_price: price.unwrap_or_else(|| current.item_price.to_string()),
                    item_attribute: attribute
                        .unwrap_or_else(|| current.item_attribute.as_str().to_string()),
                };
                let item = items.edit_item(id, &draft)?;
                emit(json, &item, |item| {
                    format!("Updated item {}: {}\n", item.item_id, item.item_name)
                })
            }
            ItemCommands::Delete { id } => {
                let item = items.delete_item(id)?;
                emit(json, &item, |item| {
                    format!(
                        "Deleted item {} from {} ({})\n",
                        item.item_id,
                        item.service_name,
                        item.period()
                    )
                })
            }
            ItemCommands::Attributes => emit(json, items.item_attributes(), render::attributes),
        },
    }
}

/// Prints `value` as pretty JSON or through its text renderer.
fn emit<T, F>(json: bool, value: &T, text: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}
