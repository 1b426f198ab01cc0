use anyhow::Result;
use bankview_core::{TransactionStore, time::current_iso_timestamp};
use bankview_finance::{
    SamplingRule, aggregate_transactions, get_bank_balances, group_by_year_week, with_total_series,
};
use bankview_ingest::{Bank, FileType};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod import;
mod state;
mod views;

use config::Config;
use import::ImportOptions;

#[derive(Parser, Debug)]
#[command(name = "bankview", version, about = "Bank statement balances and monthly summaries")]
struct Cli {
    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse statement files and merge their transactions into the store
    Import {
        /// Statement files, applied in the order given
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// File type (default: [import] default_file_type from config.toml)
        #[arg(long)]
        file_type: Option<String>,

        /// Account label for statements that do not print one
        #[arg(long)]
        account: Option<String>,

        /// Statement year, for layouts whose rows only carry MM/DD
        #[arg(long)]
        year: Option<i32>,
    },

    /// Weekly balance per account (lowest balance of each week by default)
    Balances {
        /// Select "<bank>/<account>" or "all"; kept until the next import
        #[arg(long)]
        account: Option<String>,

        /// lowest, highest or latest (default: [balance] sampling from config.toml)
        #[arg(long)]
        sampling: Option<String>,

        /// Leave out the "Total" series
        #[arg(long)]
        no_total: bool,
    },

    /// Monthly income and expenses per account and in total
    Aggregations {
        /// Select "<bank>/<account>", "Total" or "all"; kept until the next import
        #[arg(long)]
        account: Option<String>,
    },

    /// Every stored transaction, newest first
    Transactions {
        /// Select "<bank>/<account>" or "all"; kept until the next import
        #[arg(long)]
        account: Option<String>,
    },

    /// Import event log, newest first
    Events,

    /// Remove all stored transactions (the event log is kept)
    Clear,

    /// List supported banks, file types and imported accounts
    Banks,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config.toml if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let json = cli.json;

    match cli.command {
        Command::Import {
            files,
            file_type,
            account,
            year,
        } => {
            let cfg = config::load_config()?;
            import_files(&cfg, &files, file_type.as_deref(), account, year, json).await?;
        }

        Command::Balances {
            account,
            sampling,
            no_total,
        } => {
            let cfg = config::load_config()?;
            let mut store = state::load_store()?;
            select_account(&mut store, account)?;
            let sampling = match sampling {
                Some(s) => s.parse()?,
                None => cfg.balance.sampling,
            };
            let include_total = cfg.balance.include_total && !no_total;
            show_balances(&store, sampling, include_total, json)?;
            print_event_hint(&store, json);
        }

        Command::Aggregations { account } => {
            let mut store = state::load_store()?;
            select_account(&mut store, account)?;
            let result = aggregate_transactions(&store.snapshot());
            let rows = store
                .account_filter()
                .filter_aggregations(&result.monthly_aggregations);
            if json {
                print_json(&rows)?;
            } else {
                println!("Accounts: {}", result.bank_account_aggregates.join(", "));
                println!("Selected: {}\n", store.account_filter());
                print!("{}", views::render_aggregations(&rows)?);
            }
            print_event_hint(&store, json);
        }

        Command::Transactions { account } => {
            let mut store = state::load_store()?;
            select_account(&mut store, account)?;
            let txns = store.filtered_snapshot();
            if json {
                print_json(&txns)?;
            } else {
                println!("Selected: {}\n", store.account_filter());
                print!("{}", views::render_transactions(&txns)?);
            }
            print_event_hint(&store, json);
        }

        Command::Events => {
            let mut store = state::load_store()?;
            if json {
                print_json(&store.event_log())?;
            } else {
                print!("{}", views::render_events(store.event_log(), store.has_new_events())?);
            }
            if store.has_new_events() {
                store.mark_events_seen();
                state::save_store(&store)?;
            }
        }

        Command::Clear => {
            let mut store = state::load_store()?;
            let removed = store.len();
            store.clear();
            state::save_store(&store)?;
            println!("Removed {removed} transactions");
        }

        Command::Banks => {
            println!("Banks:");
            for bank in Bank::ALL {
                println!("- {bank}");
            }
            println!("\nFile types:");
            for file_type in FileType::ALL {
                println!("- {file_type} ({})", file_type.bank());
            }
            let store = state::load_store()?;
            let accounts = store.bank_accounts();
            if !accounts.is_empty() {
                println!("\nImported accounts:");
                for account in accounts {
                    println!("- {account}");
                }
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("BANKVIEW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Store a new account selection; `None` keeps the stored one.
fn select_account(store: &mut TransactionStore, account: Option<String>) -> Result<()> {
    if state::select_account(store, account) {
        state::save_store(store)?;
    }
    Ok(())
}

async fn import_files(
    cfg: &Config,
    files: &[PathBuf],
    file_type: Option<&str>,
    account: Option<String>,
    year: Option<i32>,
    json: bool,
) -> Result<()> {
    let options = ImportOptions {
        file_type: match file_type {
            Some(s) => s.parse()?,
            None => cfg.import.default_file_type,
        },
        account: account.unwrap_or_else(|| cfg.import.default_account.clone()),
        statement_year: year,
    };

    let parses = import::read_and_parse(files, &options).await;

    let mut store = state::load_store()?;
    let report = import::apply_imports(&mut store, parses, &options, &current_iso_timestamp());
    state::save_store(&store)?;

    if json {
        print_json(&report)?;
    } else {
        for r in &report {
            println!(
                "{}: {} new, {} replaced, {} events ({})",
                r.source, r.inserted, r.replaced, r.events, r.bank_account
            );
        }
        println!("\nStore now holds {} transactions", store.len());
    }
    print_event_hint(&store, json);
    Ok(())
}

fn show_balances(
    store: &TransactionStore,
    sampling: SamplingRule,
    include_total: bool,
    json: bool,
) -> Result<()> {
    let txns = store.filtered_snapshot();
    let mut balances = get_bank_balances(&txns, sampling.sampler(), group_by_year_week)?;
    if include_total {
        balances = with_total_series(balances);
    }

    if json {
        print_json(&balances)
    } else {
        print!("{}", views::render_balances(&balances)?);
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_event_hint(store: &TransactionStore, json: bool) {
    if store.has_new_events() && !json {
        println!("\nNew import events logged. Run: bankview events");
    }
}
