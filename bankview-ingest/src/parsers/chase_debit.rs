//! Chase Debit (Checking) statement parser (text)
//!
//! Expected extracted-text section:
//!   Account Number: 000000123456789
//!   TRANSACTION DETAIL
//!          DATE        DESCRIPTION                                     AMOUNT     BALANCE
//!          04/22       Discover     E-Payment 8148   Web ID: ...       -15.00      53.70

use anyhow::{Result, bail};
use bankview_core::model::Transaction;
use chrono::NaiveDate;
use regex::Regex;

use super::{parse_amount, transaction_hash};
use crate::types::{Bank, ParsedStatement};

fn parse_mm_dd_with_year(s: &str, year: i32) -> Option<NaiveDate> {
    let s = s.trim();
    let mut it = s.split('/');
    let m: u32 = it.next()?.parse().ok()?;
    let d: u32 = it.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, m, d)
}

/// Parse extracted statement text into Chase debit transactions.
///
/// `statement_year` is required because rows are MM/DD. The account number
/// printed on the statement wins over `fallback_account`.
pub fn parse_chase_debit_text(
    text: &str,
    statement_year: Option<i32>,
    fallback_account: &str,
) -> Result<ParsedStatement> {
    let Some(year) = statement_year else {
        bail!("Chase-Debit statements only print MM/DD; a statement year is required");
    };

    let header_re = Regex::new(r"TRANSACTION\s+DETAIL")?;
    let account_re = Regex::new(r"Account\s+Number:\s*(?P<number>[\d\s]+\d)")?;

    // DATE DESCRIPTION AMOUNT BALANCE
    let txn_re = Regex::new(concat!(
        r"^\s*(?P<date>\d{2}/\d{2})\s+",
        r"(?P<desc>.+?)\s+",
        r"(?P<amount>-?[\d,]+\.\d{2})\s+",
        r"(?P<balance>-?[\d,]+\.\d{2})\s*$"
    ))?;

    let mut account = None;
    let mut in_section = false;
    // (date, description, amount, balance, raw amount, raw balance)
    let mut rows = Vec::new();
    let mut parsing_errors = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if account.is_none() {
            if let Some(caps) = account_re.captures(line) {
                account = Some(caps["number"].split_whitespace().collect::<String>());
            }
        }

        if !in_section {
            if header_re.is_match(line) {
                in_section = true;
            }
            continue;
        }

        let Some(caps) = txn_re.captures(line) else {
            continue;
        };
        let line_no = idx + 1;

        let Some(date) = parse_mm_dd_with_year(&caps["date"], year) else {
            parsing_errors.push(format!("line {line_no}: invalid date '{}'", &caps["date"]));
            continue;
        };
        let (Some(amount), Some(balance)) = (parse_amount(&caps["amount"]), parse_amount(&caps["balance"]))
        else {
            parsing_errors.push(format!("line {line_no}: invalid amount or balance"));
            continue;
        };

        rows.push((
            date.format("%Y-%m-%d").to_string(),
            caps["desc"].trim().to_string(),
            amount,
            balance,
            caps["amount"].to_string(),
            caps["balance"].to_string(),
        ));
    }

    if !in_section {
        parsing_errors.push("no TRANSACTION DETAIL section found".to_string());
    }

    // Rows are hashed once the account is known so identical lines on two
    // accounts stay distinct in the store.
    let account = account.unwrap_or_else(|| fallback_account.to_string());
    let transactions = rows
        .into_iter()
        .map(|(time_stamp, description, amount, balance, amount_raw, balance_raw)| {
            let hash = transaction_hash(&[
                account.as_str(),
                time_stamp.as_str(),
                description.as_str(),
                amount_raw.as_str(),
                balance_raw.as_str(),
            ]);
            Transaction::new(hash, time_stamp, description, amount, balance)
        })
        .collect();

    Ok(ParsedStatement {
        bank: Bank::Chase.to_string(),
        account,
        transactions,
        parsing_errors,
    })
}
