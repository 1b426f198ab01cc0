//! bankview-ingest: supported banks and file types, and the statement parsers behind them.

pub mod parsers;
pub mod types;

pub use types::{Bank, DEFAULT_ACCOUNT, FileType, ParseRequest, ParsedStatement};

use anyhow::Result;

/// Parse a statement, failing only on file-level problems.
pub fn parse_statement(request: &ParseRequest) -> Result<ParsedStatement> {
    let account = request.fallback_account();
    match request.file_type {
        FileType::GenericCsv => parsers::generic_csv::parse_generic_csv(&request.input, &account),
        FileType::ChaseDebit => parsers::chase_debit::parse_chase_debit_text(
            &request.input,
            request.statement_year,
            &account,
        ),
    }
}

/// Parse a statement. File-level failures come back as a single parsing
/// error on an otherwise empty statement instead of an `Err`.
pub async fn parse_from_string(request: ParseRequest) -> ParsedStatement {
    match parse_statement(&request) {
        Ok(statement) => {
            for error in &statement.parsing_errors {
                tracing::warn!(file_type = %request.file_type, "{error}");
            }
            statement
        }
        Err(e) => {
            tracing::warn!(file_type = %request.file_type, "statement rejected: {e:#}");
            ParsedStatement {
                bank: request.file_type.bank().to_string(),
                account: request.fallback_account(),
                transactions: Vec::new(),
                parsing_errors: vec![format!("{e:#}")],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_parse_from_string_generic_csv() {
        let request = ParseRequest::new(
            FileType::GenericCsv,
            "date,description,amount,balance\n2024-01-05,Salary,10,10\n",
        )
        .with_account("cheque");

        let stmt = parse_from_string(request).await;
        assert_eq!(stmt.bank, "Generic");
        assert_eq!(stmt.account, "cheque");
        assert_eq!(stmt.transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_file_level_failure_becomes_parsing_error() {
        let request = ParseRequest::new(FileType::ChaseDebit, "TRANSACTION DETAIL\n");

        let stmt = parse_from_string(request).await;
        assert_eq!(stmt.bank, "Chase");
        assert_eq!(stmt.account, DEFAULT_ACCOUNT);
        assert!(stmt.transactions.is_empty());
        assert_eq!(stmt.parsing_errors.len(), 1);
        assert!(stmt.parsing_errors[0].contains("statement year"));
    }

    #[tokio::test]
    async fn test_wrong_file_type_yields_nothing() {
        // A Chase text statement fed to the CSV parser: header lacks the columns
        let request = ParseRequest::new(FileType::GenericCsv, "Account Number: 1\n");
        let stmt = parse_from_string(request).await;
        assert!(stmt.transactions.is_empty());
        assert!(!stmt.parsing_errors.is_empty());
    }
}
