//! Monthly aggregator: income and expense sums per (month, account), mirrored
//! into a `"Total"` row per month.

use bankview_core::model::{DenormalizedTransaction, MonthlyAggregation, TOTAL_ACCOUNT};
use bankview_core::time::year_month;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// Newest month first
    pub monthly_aggregations: Vec<MonthlyAggregation>,
    /// `"Total"` followed by every bank account in first-seen order
    pub bank_account_aggregates: Vec<String>,
}

/// Accumulators in first-seen order, addressed by bucket key.
#[derive(Default)]
struct Buckets {
    index: HashMap<String, usize>,
    rows: Vec<MonthlyAggregation>,
}

impl Buckets {
    fn entry(&mut self, key: String, year_month: &str, bank_account: &str) -> &mut MonthlyAggregation {
        let next = self.rows.len();
        let idx = *self.index.entry(key).or_insert(next);
        if idx == next {
            self.rows.push(MonthlyAggregation::empty(year_month, bank_account));
        }
        &mut self.rows[idx]
    }
}

fn add_amount(aggregation: &mut MonthlyAggregation, txn: &DenormalizedTransaction) {
    if txn.is_income() {
        aggregation.income_in_zar += txn.amount;
    } else {
        aggregation.expenses_in_zar += txn.amount;
    }
}

/// Aggregate transactions by month.
///
/// Every transaction lands in exactly two buckets: its own account's month and
/// the `"Total"` month. Positive amounts are income, everything else expenses.
pub fn aggregate_transactions(transactions: &[DenormalizedTransaction]) -> AggregationResult {
    let mut buckets = Buckets::default();
    let mut bank_account_aggregates = vec![TOTAL_ACCOUNT.to_string()];

    for txn in transactions {
        let month = year_month(&txn.time_stamp);

        let account_key = format!("{month}-{}", txn.bank_account);
        add_amount(buckets.entry(account_key, &month, &txn.bank_account), txn);

        let total_key = format!("{month}-total");
        add_amount(buckets.entry(total_key, &month, TOTAL_ACCOUNT), txn);

        if !bank_account_aggregates.contains(&txn.bank_account) {
            bank_account_aggregates.push(txn.bank_account.clone());
        }
    }

    let mut monthly_aggregations = buckets.rows;
    // Stable: rows of the same month keep first-seen order
    monthly_aggregations.sort_by(|a, b| b.year_month.cmp(&a.year_month));

    tracing::debug!(
        transactions = transactions.len(),
        rows = monthly_aggregations.len(),
        accounts = bank_account_aggregates.len() - 1,
        "aggregated transactions by month"
    );

    AggregationResult {
        monthly_aggregations,
        bank_account_aggregates,
    }
}
