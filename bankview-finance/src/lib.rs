//! bankview-finance: monthly income/expense aggregation and weekly balance reconstruction

pub mod aggregation;
pub mod balance;

pub use aggregation::{AggregationResult, aggregate_transactions};
pub use balance::{
    BankAccountBalances, Pick, SamplingRule, balance_bounds, get_bank_balances,
    get_weekly_low_balances, group_by_year_week, sample_highest_balance, sample_latest_balance,
    sample_lowest_balance, with_total_series,
};
