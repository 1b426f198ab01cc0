//! Balance reconstructor: turns sparse, per-transaction running balances into a
//! dense weekly series per account.
//!
//! Pipeline:
//! 1. Partition transactions with a group-key function (default: account + ISO week).
//! 2. Reduce each group to one sample with a pairwise sampling rule
//!    (default: lowest balance), folding left in input order.
//! 3. Sort each account's samples by timestamp.
//! 4. Walk the weekly periods spanning the whole input. Each account emits
//!    its sample for the week, else its last emitted balance, else 0.
//!
//! The fold in step 2 only ignores input order when the sampling rule is
//! commutative. All bundled rules are, apart from ties under
//! [`sample_latest_balance`].

use anyhow::{Result, bail};
use bankview_core::model::{BalanceDataPoint, DenormalizedTransaction, TOTAL_ACCOUNT};
use bankview_core::time::{generate_periods_for_range, year_week};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Account identity -> chronological balance points
pub type BankAccountBalances = BTreeMap<String, Vec<BalanceDataPoint>>;

/// Which of two transactions in the same group becomes the sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    A,
    B,
}

/// Prefer the lower balance (worst case per period).
pub fn sample_lowest_balance(a: &DenormalizedTransaction, b: &DenormalizedTransaction) -> Pick {
    if a.balance < b.balance { Pick::A } else { Pick::B }
}

pub fn sample_highest_balance(a: &DenormalizedTransaction, b: &DenormalizedTransaction) -> Pick {
    if a.balance > b.balance { Pick::A } else { Pick::B }
}

/// Prefer the later timestamp, i.e. the balance at the end of the period.
pub fn sample_latest_balance(a: &DenormalizedTransaction, b: &DenormalizedTransaction) -> Pick {
    if a.time_stamp > b.time_stamp { Pick::A } else { Pick::B }
}

/// `"<bank>/<account>-<YYYY-Www>"`
pub fn group_by_year_week(transaction: &DenormalizedTransaction) -> Result<String> {
    Ok(format!(
        "{}-{}",
        transaction.bank_account,
        year_week(&transaction.time_stamp)?
    ))
}

/// Named sampling rules, selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingRule {
    #[default]
    Lowest,
    Highest,
    Latest,
}

impl SamplingRule {
    pub fn sampler(self) -> fn(&DenormalizedTransaction, &DenormalizedTransaction) -> Pick {
        match self {
            SamplingRule::Lowest => sample_lowest_balance,
            SamplingRule::Highest => sample_highest_balance,
            SamplingRule::Latest => sample_latest_balance,
        }
    }
}

impl FromStr for SamplingRule {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lowest" => Ok(SamplingRule::Lowest),
            "highest" => Ok(SamplingRule::Highest),
            "latest" => Ok(SamplingRule::Latest),
            other => bail!("unknown sampling rule '{other}' (expected lowest, highest or latest)"),
        }
    }
}

impl fmt::Display for SamplingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SamplingRule::Lowest => "lowest",
            SamplingRule::Highest => "highest",
            SamplingRule::Latest => "latest",
        };
        write!(f, "{name}")
    }
}

struct AccountCursor {
    /// (week key, sampled balance), ascending by sample timestamp
    samples: Vec<(String, f64)>,
    next: usize,
    last: Option<f64>,
}

/// Reconstruct dense weekly balance series for every account in `transactions`.
///
/// Every returned series has one point per generated week, keyed by the week
/// (`"2024-W03"`). Empty input yields an empty map. Fails only when a
/// timestamp is not an ISO-8601 date.
pub fn get_bank_balances<S, G>(
    transactions: &[DenormalizedTransaction],
    sample: S,
    group_key: G,
) -> Result<BankAccountBalances>
where
    S: Fn(&DenormalizedTransaction, &DenormalizedTransaction) -> Pick,
    G: Fn(&DenormalizedTransaction) -> Result<String>,
{
    let Some(first) = transactions.first() else {
        return Ok(BankAccountBalances::new());
    };

    let mut start = first.time_stamp.as_str();
    let mut end = first.time_stamp.as_str();
    let mut groups: BTreeMap<String, Vec<&DenormalizedTransaction>> = BTreeMap::new();

    for txn in transactions {
        groups.entry(group_key(txn)?).or_default().push(txn);

        if txn.time_stamp.as_str() > end {
            end = txn.time_stamp.as_str();
        }
        if txn.time_stamp.as_str() < start {
            start = txn.time_stamp.as_str();
        }
    }

    let sparse = sample_groups(&groups, &sample);

    let mut cursors: BTreeMap<String, AccountCursor> = BTreeMap::new();
    for (account, mut points) in sparse {
        points.sort_by(|a, b| a.time_stamp.cmp(&b.time_stamp));
        let samples = points
            .into_iter()
            .map(|p| year_week(&p.time_stamp).map(|key| (key, p.balance)))
            .collect::<Result<Vec<_>>>()?;
        cursors.insert(
            account,
            AccountCursor {
                samples,
                next: 0,
                last: None,
            },
        );
    }

    let periods = generate_periods_for_range(start, end)?;

    let mut filled = BankAccountBalances::new();
    for period in &periods {
        for (account, cursor) in cursors.iter_mut() {
            // Consume every sample up to and including this week
            while let Some((key, balance)) = cursor.samples.get(cursor.next) {
                if key.as_str() > period.as_str() {
                    break;
                }
                cursor.last = Some(*balance);
                cursor.next += 1;
            }

            filled
                .entry(account.clone())
                .or_insert_with(|| Vec::with_capacity(periods.len()))
                .push(BalanceDataPoint {
                    time_stamp: period.clone(),
                    bank_account: account.clone(),
                    balance: cursor.last.unwrap_or(0.0),
                });
        }
    }

    tracing::debug!(
        transactions = transactions.len(),
        groups = groups.len(),
        accounts = filled.len(),
        periods = periods.len(),
        start,
        end,
        "reconstructed balance series"
    );

    Ok(filled)
}

/// One sampled point per group, collected per account (unsorted).
fn sample_groups<S>(
    groups: &BTreeMap<String, Vec<&DenormalizedTransaction>>,
    sample: &S,
) -> BTreeMap<String, Vec<BalanceDataPoint>>
where
    S: Fn(&DenormalizedTransaction, &DenormalizedTransaction) -> Pick,
{
    let mut sparse: BTreeMap<String, Vec<BalanceDataPoint>> = BTreeMap::new();

    for group in groups.values() {
        let Some((&head, rest)) = group.split_first() else {
            continue;
        };
        let picked = rest.iter().fold(head, |previous, &current| {
            match sample(previous, current) {
                Pick::A => previous,
                Pick::B => current,
            }
        });

        sparse
            .entry(picked.bank_account.clone())
            .or_default()
            .push(BalanceDataPoint {
                time_stamp: picked.time_stamp.clone(),
                bank_account: picked.bank_account.clone(),
                balance: picked.balance,
            });
    }

    sparse
}

/// [`get_bank_balances`] with weekly grouping and lowest-balance sampling.
pub fn get_weekly_low_balances(
    transactions: &[DenormalizedTransaction],
) -> Result<BankAccountBalances> {
    get_bank_balances(transactions, sample_lowest_balance, group_by_year_week)
}

/// Add a `"Total"` series summing every account's balance per period.
///
/// Accounts are dense over the same periods, so the sum is taken index by
/// index. An empty map stays empty; an existing `"Total"` series is replaced.
pub fn with_total_series(mut balances: BankAccountBalances) -> BankAccountBalances {
    balances.remove(TOTAL_ACCOUNT);

    let Some(template) = balances.values().next() else {
        return balances;
    };

    let mut total: Vec<BalanceDataPoint> = template
        .iter()
        .map(|p| BalanceDataPoint {
            time_stamp: p.time_stamp.clone(),
            bank_account: TOTAL_ACCOUNT.to_string(),
            balance: 0.0,
        })
        .collect();

    for series in balances.values() {
        for (sum, point) in total.iter_mut().zip(series) {
            sum.balance += point.balance;
        }
    }

    balances.insert(TOTAL_ACCOUNT.to_string(), total);
    balances
}

/// Overall balance range for chart axes; the lower bound never exceeds 0.
pub fn balance_bounds(balances: &BankAccountBalances) -> Option<(f64, f64)> {
    let mut points = balances.values().flatten().map(|p| p.balance);
    let first = points.next()?;
    let (min, max) = points.fold((first, first), |(lo, hi), b| (lo.min(b), hi.max(b)));
    Some((min.min(0.0), max))
}
