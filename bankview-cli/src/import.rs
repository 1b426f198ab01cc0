//! `bankview import`: files are read and parsed concurrently, then applied to
//! the store one after another in command-line order.

use anyhow::{Context, Result};
use bankview_core::{
    InfoLogEvent, StatementImport, TransactionStore, bank_account_id, parsing_errors_to_events,
};
use bankview_ingest::{FileType, ParseRequest, ParsedStatement, parse_from_string};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub file_type: FileType,
    /// Used when the statement does not name its account
    pub account: String,
    pub statement_year: Option<i32>,
}

/// One file after reading and parsing. `Err` means the file could not be read.
#[derive(Debug)]
pub struct FileParse {
    pub source: String,
    pub statement: Result<ParsedStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub source: String,
    pub bank_account: String,
    pub inserted: usize,
    pub replaced: usize,
    pub events: usize,
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn read_and_parse_one(path: &Path, options: &ImportOptions) -> FileParse {
    let source = source_name(path);
    let input = match tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read {}", path.display()))
    {
        Ok(input) => input,
        Err(e) => {
            tracing::warn!("{e:#}");
            return FileParse {
                source,
                statement: Err(e),
            };
        }
    };

    let mut request = ParseRequest::new(options.file_type, input).with_account(options.account.as_str());
    if let Some(year) = options.statement_year {
        request = request.with_statement_year(year);
    }
    FileParse {
        source,
        statement: Ok(parse_from_string(request).await),
    }
}

/// Read and parse every file concurrently. Results keep the order of `files`.
pub async fn read_and_parse(files: &[PathBuf], options: &ImportOptions) -> Vec<FileParse> {
    futures_util::future::join_all(files.iter().map(|path| read_and_parse_one(path, options))).await
}

/// Turn a parse result into a store import. Parsing errors become events; an
/// unreadable file becomes a single event and no transactions.
pub fn to_statement_import(
    file: FileParse,
    options: &ImportOptions,
    iso_timestamp: &str,
) -> StatementImport {
    let FileParse { source, statement } = file;
    match statement {
        Ok(statement) => StatementImport {
            event_logs: parsing_errors_to_events(&source, &statement.parsing_errors, iso_timestamp),
            bank: statement.bank,
            account: statement.account,
            transactions: statement.transactions,
            source,
        },
        Err(e) => StatementImport {
            bank: options.file_type.bank().to_string(),
            account: options.account.clone(),
            transactions: Vec::new(),
            event_logs: vec![InfoLogEvent::new(
                iso_timestamp,
                source.as_str(),
                format!("file reading has failed: {e:#}"),
            )],
            source,
        },
    }
}

/// Apply parsed files to the store in order. A later file overwrites
/// transactions of an earlier one that share a hash.
pub fn apply_imports(
    store: &mut TransactionStore,
    files: Vec<FileParse>,
    options: &ImportOptions,
    iso_timestamp: &str,
) -> Vec<ImportReport> {
    files
        .into_iter()
        .map(|file| {
            let import = to_statement_import(file, options, iso_timestamp);
            let source = import.source.clone();
            let bank_account = bank_account_id(&import.bank, &import.account);
            let summary = store.apply_import_at(import, iso_timestamp);
            ImportReport {
                source,
                bank_account,
                inserted: summary.inserted,
                replaced: summary.replaced,
                events: summary.events_logged,
            }
        })
        .collect()
}
