//! Plain-text renderings of the four views: balances, aggregations,
//! transactions and the event log.

use anyhow::Result;
use bankview_core::{DenormalizedTransaction, InfoLogEvent, MonthlyAggregation, period_key_to_date};
use bankview_finance::{BankAccountBalances, balance_bounds};
use std::fmt::Write;

pub fn transactions_heading(count: usize) -> String {
    if count > 0 {
        format!("Transactions({count})")
    } else {
        "Transactions".to_string()
    }
}

pub fn events_heading(new_events: bool) -> String {
    if new_events {
        "Event log (new)".to_string()
    } else {
        "Event log".to_string()
    }
}

pub fn render_transactions(txns: &[DenormalizedTransaction]) -> Result<String> {
    let mut out = format!("# {}\n\n", transactions_heading(txns.len()));
    if txns.is_empty() {
        out.push_str("No transactions to display. Please import data first.\n");
        return Ok(out);
    }

    let width = account_width(txns.iter().map(|t| t.bank_account.as_str()));
    writeln!(
        out,
        "{:<25} {:<width$} {:>14} {:>14}  Description",
        "Timestamp", "Account", "Amount (ZAR)", "Balance (ZAR)"
    )?;
    for t in txns {
        writeln!(
            out,
            "{:<25} {:<width$} {:>14.2} {:>14.2}  {}",
            t.time_stamp, t.bank_account, t.amount, t.balance, t.description
        )?;
    }
    Ok(out)
}

pub fn render_aggregations(rows: &[MonthlyAggregation]) -> Result<String> {
    let mut out = String::from("# Aggregations\n\n");
    if rows.is_empty() {
        out.push_str("No aggregations to display. Please import data first.\n");
        return Ok(out);
    }

    let width = account_width(rows.iter().map(|r| r.bank_account.as_str()));
    writeln!(
        out,
        "{:<8} {:<width$} {:>16} {:>20}",
        "Month", "Bank/Account", "Income (ZAR)", "Expenditures (ZAR)"
    )?;
    for r in rows {
        writeln!(
            out,
            "{:<8} {:<width$} {:>16.2} {:>20.2}",
            r.year_month, r.bank_account, r.income_in_zar, r.expenses_in_zar
        )?;
    }
    Ok(out)
}

/// One row per week, one column per account.
pub fn render_balances(balances: &BankAccountBalances) -> Result<String> {
    let mut out = String::from("# Balance\n\n");
    let Some(periods) = balances.values().next() else {
        out.push_str("No balance data to display. Please import data first.\n");
        return Ok(out);
    };

    let width = account_width(balances.keys().map(String::as_str));
    write!(out, "{:<9} {:<10}", "Week", "Week of")?;
    for account in balances.keys() {
        write!(out, " {account:>width$}")?;
    }
    out.push('\n');

    for (i, period) in periods.iter().enumerate() {
        let monday = period_key_to_date(&period.time_stamp)?;
        write!(out, "{:<9} {:<10}", period.time_stamp, monday.format("%Y-%m-%d"))?;
        for series in balances.values() {
            let balance = series.get(i).map(|p| p.balance).unwrap_or_default();
            write!(out, " {balance:>width$.2}")?;
        }
        out.push('\n');
    }

    if let Some((low, high)) = balance_bounds(balances) {
        writeln!(out, "\nRange: {low:.2} .. {high:.2}")?;
    }
    Ok(out)
}

pub fn render_events(events: &[InfoLogEvent], new_events: bool) -> Result<String> {
    let mut out = format!("# {}\n\n", events_heading(new_events));
    if events.is_empty() {
        out.push_str("No events have yet been logged.\n");
        return Ok(out);
    }
    for e in events {
        writeln!(out, "{}  {}  {}", e.iso_timestamp, e.source, e.message)?;
    }
    Ok(out)
}

fn account_width<'a>(accounts: impl Iterator<Item = &'a str>) -> usize {
    accounts.map(str::len).max().unwrap_or(0).max(14)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankview_core::{Transaction, normalize};
    use bankview_finance::get_weekly_low_balances;

    #[test]
    fn test_headings() {
        assert_eq!(transactions_heading(0), "Transactions");
        assert_eq!(transactions_heading(3), "Transactions(3)");
        assert_eq!(events_heading(true), "Event log (new)");
    }

    #[test]
    fn test_empty_views() {
        assert!(render_aggregations(&[]).unwrap().contains("Please import data first"));
        assert!(render_transactions(&[]).unwrap().contains("Please import data first"));
        assert!(render_events(&[], false).unwrap().contains("No events have yet been logged."));
        assert!(
            render_balances(&BankAccountBalances::new())
                .unwrap()
                .contains("No balance data")
        );
    }

    #[test]
    fn test_render_balances_rows() {
        let txns = vec![
            normalize(Transaction::new("1", "2024-01-01", "a", 100.0, 100.0), "Generic", "cheque"),
            normalize(Transaction::new("2", "2024-01-15", "b", -50.0, 50.0), "Generic", "cheque"),
        ];
        let text = render_balances(&get_weekly_low_balances(&txns).unwrap()).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[2].contains("Generic/cheque"));
        assert!(lines[3].starts_with("2024-W01  2024-01-01"));
        assert!(lines[3].ends_with("100.00"));
        assert!(lines[5].starts_with("2024-W03  2024-01-15"));
        assert!(lines[5].ends_with("50.00"));
        assert!(text.contains("Range: 0.00 .. 100.00"));
    }

    #[test]
    fn test_render_aggregation_row() {
        let rows = vec![MonthlyAggregation {
            year_month: "2024-01".into(),
            bank_account: "Total".into(),
            income_in_zar: 1000.0,
            expenses_in_zar: -200.0,
        }];
        let text = render_aggregations(&rows).unwrap();
        assert!(text.contains("1000.00"));
        assert!(text.contains("-200.00"));
    }

    #[test]
    fn test_render_events_newest_first_lines() {
        let events = vec![
            InfoLogEvent::new("2024-02-01T10:00:00.000Z", "feb.csv", "line 3: invalid amount 'x'"),
            InfoLogEvent::new("2024-01-01T10:00:00.000Z", "jan.csv", "file reading has failed"),
        ];
        let text = render_events(&events, true).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# Event log (new)");
        assert_eq!(lines[2], "2024-02-01T10:00:00.000Z  feb.csv  line 3: invalid amount 'x'");
        assert!(lines[3].contains("jan.csv"));
    }
}
