//! Account filter applied by callers before handing snapshots to the pipeline.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::model::{DenormalizedTransaction, MonthlyAggregation};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountFilter {
    #[default]
    All,
    Account(String),
}

impl AccountFilter {
    pub fn matches(&self, bank_account: &str) -> bool {
        match self {
            AccountFilter::All => true,
            AccountFilter::Account(account) => account == bank_account,
        }
    }

    pub fn filter_transactions(
        &self,
        transactions: &[DenormalizedTransaction],
    ) -> Vec<DenormalizedTransaction> {
        transactions
            .iter()
            .filter(|t| self.matches(&t.bank_account))
            .cloned()
            .collect()
    }

    /// Selecting `"Total"` keeps only the cross-account rows.
    pub fn filter_aggregations(&self, aggregations: &[MonthlyAggregation]) -> Vec<MonthlyAggregation> {
        aggregations
            .iter()
            .filter(|a| self.matches(&a.bank_account))
            .cloned()
            .collect()
    }
}

impl FromStr for AccountFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(AccountFilter::All)
        } else {
            Ok(AccountFilter::Account(s.to_string()))
        }
    }
}

impl fmt::Display for AccountFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountFilter::All => write!(f, "All"),
            AccountFilter::Account(account) => write!(f, "{account}"),
        }
    }
}
