use anyhow::bail;
use bankview_core::model::Transaction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account label used when neither the file nor the caller names one
pub const DEFAULT_ACCOUNT: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bank {
    Generic,
    Chase,
}

impl Bank {
    pub const ALL: [Bank; 2] = [Bank::Generic, Bank::Chase];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bank::Generic => "Generic",
            Bank::Chase => "Chase",
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported statement layouts. Each belongs to exactly one bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "Generic-CSV")]
    GenericCsv,
    #[serde(rename = "Chase-Debit")]
    ChaseDebit,
}

impl FileType {
    pub const ALL: [FileType; 2] = [FileType::GenericCsv, FileType::ChaseDebit];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::GenericCsv => "Generic-CSV",
            FileType::ChaseDebit => "Chase-Debit",
        }
    }

    pub fn bank(&self) -> Bank {
        match self {
            FileType::GenericCsv => Bank::Generic,
            FileType::ChaseDebit => Bank::Chase,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let wanted = s.trim();
        match FileType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
        {
            Some(file_type) => Ok(file_type),
            None => {
                let known: Vec<&str> = FileType::ALL.iter().map(|t| t.as_str()).collect();
                bail!("unknown file type '{wanted}' (expected one of: {})", known.join(", "))
            }
        }
    }
}

/// Input to [`crate::parse_from_string`]
#[derive(Debug, Clone, PartialEq)]
pub struct ParseRequest {
    pub file_type: FileType,
    pub input: String,
    /// Account to use when the statement does not name one
    pub account: Option<String>,
    /// Needed by layouts whose rows carry only day and month
    pub statement_year: Option<i32>,
}

impl ParseRequest {
    pub fn new(file_type: FileType, input: impl Into<String>) -> Self {
        Self {
            file_type,
            input: input.into(),
            account: None,
            statement_year: None,
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_statement_year(mut self, year: i32) -> Self {
        self.statement_year = Some(year);
        self
    }

    pub(crate) fn fallback_account(&self) -> String {
        self.account
            .clone()
            .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string())
    }
}

/// Bank-agnostic parser output
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    pub bank: String,
    pub account: String,
    pub transactions: Vec<Transaction>,
    /// Human-readable, one per rejected row or fatal problem
    pub parsing_errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_names() {
        assert_eq!("generic-csv".parse::<FileType>().unwrap(), FileType::GenericCsv);
        assert_eq!(FileType::ChaseDebit.to_string(), "Chase-Debit");
        assert_eq!(FileType::ChaseDebit.bank(), Bank::Chase);

        let err = "FNB-Default".parse::<FileType>().unwrap_err();
        assert!(err.to_string().contains("Generic-CSV, Chase-Debit"));
    }

    #[test]
    fn test_banks_listed() {
        let names: Vec<String> = Bank::ALL.iter().map(|b| b.to_string()).collect();
        assert_eq!(names, vec!["Generic", "Chase"]);
    }
}
