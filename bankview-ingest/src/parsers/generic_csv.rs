//! Generic CSV statement parser
//!
//! Expected layout (header names are case-insensitive, column order is free):
//!   date,description,amount,balance
//!   2024-01-05,Salary,15000.00,15250.00
//!   2024/01/06,Card purchase,-120.50,15129.50

use anyhow::{Context, Result, bail};
use bankview_core::model::Transaction;
use bankview_core::time::parse_date;
use chrono::NaiveDate;

use super::{parse_amount, transaction_hash};
use crate::types::{Bank, ParsedStatement};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d %b %Y"];

/// ISO date (or the original ISO date-time) for a statement date cell.
fn iso_date(raw: &str) -> Option<String> {
    if raw.len() > 10 && raw.contains('T') && parse_date(raw).is_ok() {
        return Some(raw.to_string());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Parse a generic CSV export. Rows that fail to parse are listed in
/// `parsing_errors`; a missing required column fails the whole file.
pub fn parse_generic_csv(input: &str, account: &str) -> Result<ParsedStatement> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let headers = rdr.headers().context("reading CSV header")?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let (Some(date_col), Some(desc_col), Some(amount_col), Some(balance_col)) = (
        column("date"),
        column("description"),
        column("amount"),
        column("balance"),
    ) else {
        bail!("CSV header must contain date, description, amount and balance columns");
    };

    let mut transactions = Vec::new();
    let mut parsing_errors = Vec::new();

    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                parsing_errors.push(format!("unreadable row: {e}"));
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.iter().all(str::is_empty) {
            continue;
        }

        let field = |idx: usize| record.get(idx).unwrap_or("");
        let (date_raw, description, amount_raw, balance_raw) =
            (field(date_col), field(desc_col), field(amount_col), field(balance_col));

        let Some(time_stamp) = iso_date(date_raw) else {
            parsing_errors.push(format!("line {line}: unrecognised date '{date_raw}'"));
            continue;
        };
        let Some(amount) = parse_amount(amount_raw) else {
            parsing_errors.push(format!("line {line}: invalid amount '{amount_raw}'"));
            continue;
        };
        let Some(balance) = parse_amount(balance_raw) else {
            parsing_errors.push(format!("line {line}: invalid balance '{balance_raw}'"));
            continue;
        };

        let hash = transaction_hash(&[account, time_stamp.as_str(), description, amount_raw, balance_raw]);
        transactions.push(Transaction::new(hash, time_stamp, description, amount, balance));
    }

    Ok(ParsedStatement {
        bank: Bank::Generic.to_string(),
        account: account.to_string(),
        transactions,
        parsing_errors,
    })
}
