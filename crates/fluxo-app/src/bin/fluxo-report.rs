//! # DRE Report
//!
//! Prints the income statement of a JSON ledger export.
//!
//! ## Usage
//! ```bash
//! # Whole ledger
//! cargo run -p fluxo-app --bin fluxo-report -- lancamentos.json
//!
//! # One quarter
//! cargo run -p fluxo-app --bin fluxo-report -- lancamentos.json --from 2024-01-01 --to 2024-03-31
//! ```
//!
//! The export is a JSON array of lançamentos as the front end receives them.

use std::env;
use std::path::PathBuf;

use fluxo_app::config::AppConfig;
use fluxo_app::error::{AppError, AppResult};
use fluxo_app::ledger::LedgerService;
use fluxo_app::logging;
use fluxo_app::session::Session;
use fluxo_app::store::MemoryStore;
use fluxo_core::currency;
use fluxo_core::filter::{parse_calendar_date, FilterState};
use fluxo_core::statement::{CategoryTotal, IncomeStatement};
use fluxo_core::FinancialRecord;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut ledger_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut period = FilterState::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--from" | "-f" => {
                if i + 1 < args.len() {
                    period.set_start_date(Some(date_arg(&args[i + 1])?));
                    i += 1;
                }
            }
            "--to" | "-t" => {
                if i + 1 < args.len() {
                    period.set_end_date(Some(date_arg(&args[i + 1])?));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => ledger_path = Some(PathBuf::from(other)),
        }
        i += 1;
    }

    let Some(ledger_path) = ledger_path else {
        print_help();
        return Err("missing ledger file".into());
    };

    let config = AppConfig::load_or_default(config_path);
    logging::init_from_config(&config);

    let records = read_ledger(&ledger_path)?;
    info!(path = ?ledger_path, count = records.len(), "Ledger loaded");

    let ledger = LedgerService::new(MemoryStore::with_records(records), Session::anonymous());
    let statement = ledger.income_statement(&period).await?;

    print_statement(config.business_name(), &statement);
    Ok(())
}

fn date_arg(value: &str) -> AppResult<chrono::NaiveDate> {
    parse_calendar_date(value)
        .ok_or_else(|| AppError::InvalidConfig(format!("not a date (YYYY-MM-DD): {}", value)))
}

fn read_ledger(path: &PathBuf) -> AppResult<Vec<FinancialRecord>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn print_help() {
    println!("Fluxo DRE Report");
    println!();
    println!("Usage: fluxo-report <LEDGER.json> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -f, --from <DATE>    First day of the period (YYYY-MM-DD)");
    println!("  -t, --to <DATE>      Last day of the period (YYYY-MM-DD)");
    println!("  -c, --config <PATH>  Config file (default: platform config dir)");
    println!("  -h, --help           Show this help message");
}

fn print_statement(business: &str, dre: &IncomeStatement) {
    let period = match (dre.start_date, dre.end_date) {
        (Some(s), Some(e)) => format!("{} a {}", s.format("%d/%m/%Y"), e.format("%d/%m/%Y")),
        (Some(s), None) => format!("desde {}", s.format("%d/%m/%Y")),
        (None, Some(e)) => format!("até {}", e.format("%d/%m/%Y")),
        (None, None) => "todo o período".to_string(),
    };

    println!("{}", business);
    println!("DRE - {} ({} lançamentos)", period, dre.entry_count);
    println!("{}", "=".repeat(56));
    println!("{:<36}{:>20}", "(+) Receita bruta", currency::format(dre.gross_revenue));
    print_categories(&dre.revenue_by_category);
    println!("{:<36}{:>20}", "(-) Despesas", currency::format(dre.total_expenses));
    print_categories(&dre.expenses_by_category);
    println!("{}", "-".repeat(56));
    println!("{:<36}{:>20}", "(=) Resultado líquido", currency::format(dre.net_result));

    if let Some(margin) = dre.net_margin {
        println!("{:<36}{:>19.2}%", "    Margem líquida", margin);
    }
}

fn print_categories(categories: &[CategoryTotal]) {
    for c in categories {
        let share = c.share.map(|s| s.to_string()).unwrap_or_default();
        println!("      {:<22}{:>18} {:>8}", c.category, currency::format(c.total), share);
    }
}
