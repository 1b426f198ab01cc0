//! Transaction record types shared by the ingest, aggregation and balance crates

use serde::{Deserialize, Serialize};

/// Reserved account identity for rows and series that span every account.
pub const TOTAL_ACCOUNT: &str = "Total";

/// A parsed statement line, as produced by a statement parser
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Content-derived identifier, unique per transaction within an account
    pub hash: String,
    /// ISO-8601 date or date-time
    pub time_stamp: String,
    pub description: String,
    /// Positive = income/credit, otherwise expense/debit
    pub amount: f64,
    /// Account balance immediately after this transaction
    pub balance: f64,
}

impl Transaction {
    pub fn new(
        hash: impl Into<String>,
        time_stamp: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        balance: f64,
    ) -> Self {
        Self {
            hash: hash.into(),
            time_stamp: time_stamp.into(),
            description: description.into(),
            amount,
            balance,
        }
    }
}

/// A transaction tagged with the `"<bank>/<account>"` it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DenormalizedTransaction {
    pub hash: String,
    pub time_stamp: String,
    pub description: String,
    pub amount: f64,
    pub balance: f64,
    pub bank_account: String,
}

impl DenormalizedTransaction {
    /// Returns true if this is income (positive amount)
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    /// Zero-amount lines count as expenses.
    pub fn is_expense(&self) -> bool {
        !self.is_income()
    }
}

/// `"<bank>/<account>"`
pub fn bank_account_id(bank: &str, account: &str) -> String {
    format!("{bank}/{account}")
}

/// Tag a parsed transaction with its owning bank account.
pub fn normalize(transaction: Transaction, bank: &str, account: &str) -> DenormalizedTransaction {
    let Transaction {
        hash,
        time_stamp,
        description,
        amount,
        balance,
    } = transaction;

    DenormalizedTransaction {
        hash,
        time_stamp,
        description,
        amount,
        balance,
        bank_account: bank_account_id(bank, account),
    }
}

/// One entry of a balance series.
///
/// Dense series carry a week key in `time_stamp`; sampled points carry the
/// timestamp of the transaction they were taken from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDataPoint {
    pub time_stamp: String,
    pub bank_account: String,
    pub balance: f64,
}

/// Income and expenses of one account (or [`TOTAL_ACCOUNT`]) in one month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAggregation {
    /// `"YYYY-MM"`
    pub year_month: String,
    pub bank_account: String,
    #[serde(rename = "incomeInZAR")]
    pub income_in_zar: f64,
    /// Zero or negative
    #[serde(rename = "expensesInZAR")]
    pub expenses_in_zar: f64,
}

impl MonthlyAggregation {
    pub fn empty(year_month: impl Into<String>, bank_account: impl Into<String>) -> Self {
        Self {
            year_month: year_month.into(),
            bank_account: bank_account.into(),
            income_in_zar: 0.0,
            expenses_in_zar: 0.0,
        }
    }
}
