//! TransactionStore: the host-side collection every view is computed from.
//!
//! - Transactions are keyed by `hash`. Re-importing a transaction overwrites
//!   the stored copy; nothing is deleted except through [`TransactionStore::clear`].
//! - Imports are applied one at a time through `&mut self`, so two imports
//!   can never interleave their inserts.
//! - The pipeline never sees the store itself, only [`TransactionStore::snapshot`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::events::{InfoLogEvent, NULL_PARSE_MESSAGE};
use crate::filter::AccountFilter;
use crate::model::{DenormalizedTransaction, Transaction, normalize};
use crate::time::current_iso_timestamp;

/// Everything one parsed statement file contributes to the store
#[derive(Debug, Clone, PartialEq)]
pub struct StatementImport {
    pub bank: String,
    pub account: String,
    pub transactions: Vec<Transaction>,
    /// File name the statement was read from
    pub source: String,
    pub event_logs: Vec<InfoLogEvent>,
}

/// What an import did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub inserted: usize,
    pub replaced: usize,
    pub events_logged: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStore {
    transactions: HashMap<String, DenormalizedTransaction>,
    /// Newest first
    event_log: Vec<InfoLogEvent>,
    #[serde(default)]
    account_filter: AccountFilter,
    #[serde(default)]
    new_events: bool,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, hash: &str) -> Option<&DenormalizedTransaction> {
        self.transactions.get(hash)
    }

    pub fn event_log(&self) -> &[InfoLogEvent] {
        &self.event_log
    }

    pub fn has_new_events(&self) -> bool {
        self.new_events
    }

    pub fn mark_events_seen(&mut self) {
        self.new_events = false;
    }

    pub fn account_filter(&self) -> &AccountFilter {
        &self.account_filter
    }

    pub fn set_account_filter(&mut self, filter: AccountFilter) {
        self.account_filter = filter;
    }

    pub fn apply_import(&mut self, import: StatementImport) -> ImportSummary {
        self.apply_import_at(import, &current_iso_timestamp())
    }

    /// Apply an import, stamping any synthesized event with `iso_timestamp`.
    pub fn apply_import_at(&mut self, import: StatementImport, iso_timestamp: &str) -> ImportSummary {
        let StatementImport {
            bank,
            account,
            transactions,
            source,
            event_logs,
        } = import;

        let mut logged = event_logs;
        if transactions.is_empty() && logged.is_empty() {
            logged.push(InfoLogEvent::new(iso_timestamp, source.as_str(), NULL_PARSE_MESSAGE));
        }

        let mut summary = ImportSummary {
            events_logged: logged.len(),
            ..ImportSummary::default()
        };

        for transaction in transactions {
            let denormalized = normalize(transaction, &bank, &account);
            match self.transactions.insert(denormalized.hash.clone(), denormalized) {
                Some(_) => summary.replaced += 1,
                None => summary.inserted += 1,
            }
        }

        if !logged.is_empty() {
            self.new_events = true;
        }
        logged.append(&mut self.event_log);
        self.event_log = logged;
        self.account_filter = AccountFilter::All;

        tracing::debug!(
            source = %source,
            bank_account = %crate::model::bank_account_id(&bank, &account),
            inserted = summary.inserted,
            replaced = summary.replaced,
            events = summary.events_logged,
            "applied statement import"
        );

        summary
    }

    /// Drop every transaction. The event log is kept.
    pub fn clear(&mut self) {
        self.transactions.clear();
        self.account_filter = AccountFilter::All;
    }

    /// All transactions, newest first (ties broken by hash).
    pub fn snapshot(&self) -> Vec<DenormalizedTransaction> {
        let mut txns: Vec<DenormalizedTransaction> = self.transactions.values().cloned().collect();
        txns.sort_by(|a, b| {
            b.time_stamp
                .cmp(&a.time_stamp)
                .then_with(|| a.hash.cmp(&b.hash))
        });
        txns
    }

    /// [`Self::snapshot`] restricted to the current account filter.
    pub fn filtered_snapshot(&self) -> Vec<DenormalizedTransaction> {
        self.account_filter.filter_transactions(&self.snapshot())
    }

    /// Distinct bank accounts, sorted.
    pub fn bank_accounts(&self) -> Vec<String> {
        let mut accounts: Vec<String> = self
            .transactions
            .values()
            .map(|t| t.bank_account.clone())
            .collect();
        accounts.sort();
        accounts.dedup();
        accounts
    }
}
