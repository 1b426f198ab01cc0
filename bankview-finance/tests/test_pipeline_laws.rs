use bankview_core::{DenormalizedTransaction, Transaction, generate_periods_for_range, normalize, year_month, year_week};
use bankview_finance::{
    aggregate_transactions, get_bank_balances, get_weekly_low_balances, group_by_year_week,
    sample_lowest_balance,
};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};

const ACCOUNTS: [&str; 3] = ["cheque", "savings", "credit"];

fn txn(hash: &str, ts: &str, amount: f64, balance: f64, account: &str) -> DenormalizedTransaction {
    normalize(Transaction::new(hash, ts, "test", amount, balance), "FNB", account)
}

/// Whole-rand amounts keep every f64 sum exact, whatever the order.
fn transactions_strategy() -> impl Strategy<Value = Vec<DenormalizedTransaction>> {
    prop::collection::vec((0usize..3, 0u64..120, -5_000i64..5_000, -20_000i64..20_000), 1..40)
        .prop_map(|rows| {
            let base = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
            rows.into_iter()
                .enumerate()
                .map(|(i, (account, offset, amount, balance))| {
                    let date = base.checked_add_days(Days::new(offset)).unwrap();
                    txn(
                        &format!("h{i}"),
                        &date.format("%Y-%m-%d").to_string(),
                        amount as f64,
                        balance as f64,
                        ACCOUNTS[account],
                    )
                })
                .collect()
        })
}

fn date_range(txns: &[DenormalizedTransaction]) -> (String, String) {
    let start = txns.iter().map(|t| t.time_stamp.clone()).min().unwrap();
    let end = txns.iter().map(|t| t.time_stamp.clone()).max().unwrap();
    (start, end)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Per-account rows of a month add up to that month's Total row.
    #[test]
    fn prop_totals_law(txns in transactions_strategy()) {
        let result = aggregate_transactions(&txns);

        let mut sums: BTreeMap<String, (f64, f64)> = BTreeMap::new();
        for row in result.monthly_aggregations.iter().filter(|r| r.bank_account != "Total") {
            let entry = sums.entry(row.year_month.clone()).or_insert((0.0, 0.0));
            entry.0 += row.income_in_zar;
            entry.1 += row.expenses_in_zar;
        }

        for total in result.monthly_aggregations.iter().filter(|r| r.bank_account == "Total") {
            let (income, expenses) = sums[&total.year_month];
            prop_assert_eq!(total.income_in_zar, income);
            prop_assert_eq!(total.expenses_in_zar, expenses);
        }
        prop_assert_eq!(
            sums.len(),
            result.monthly_aggregations.iter().filter(|r| r.bank_account == "Total").count()
        );
    }

    /// Positive amounts only feed income, everything else only expenses.
    #[test]
    fn prop_sign_partition(txns in transactions_strategy()) {
        let result = aggregate_transactions(&txns);

        let income: f64 = txns.iter().filter(|t| t.amount > 0.0).map(|t| t.amount).sum();
        let expenses: f64 = txns.iter().filter(|t| t.amount <= 0.0).map(|t| t.amount).sum();

        let totals = result.monthly_aggregations.iter().filter(|r| r.bank_account == "Total");
        let (agg_income, agg_expenses) = totals.fold((0.0, 0.0), |(i, e), r| (i + r.income_in_zar, e + r.expenses_in_zar));

        prop_assert_eq!(agg_income, income);
        prop_assert_eq!(agg_expenses, expenses);
        prop_assert!(result.monthly_aggregations.iter().all(|r| r.income_in_zar >= 0.0 && r.expenses_in_zar <= 0.0));
    }

    /// Exactly one row per (month, account) present in the input, plus one Total per month.
    #[test]
    fn prop_one_row_per_bucket(txns in transactions_strategy()) {
        let result = aggregate_transactions(&txns);

        let mut expected: HashSet<(String, String)> = HashSet::new();
        for t in &txns {
            expected.insert((year_month(&t.time_stamp), t.bank_account.clone()));
            expected.insert((year_month(&t.time_stamp), "Total".to_string()));
        }
        let actual: Vec<(String, String)> = result
            .monthly_aggregations
            .iter()
            .map(|r| (r.year_month.clone(), r.bank_account.clone()))
            .collect();

        prop_assert_eq!(actual.len(), expected.len());
        prop_assert_eq!(actual.into_iter().collect::<HashSet<_>>(), expected);
        prop_assert!(result.monthly_aggregations.windows(2).all(|w| w[0].year_month >= w[1].year_month));
    }

    /// Reordering the input changes neither the sums nor the weekly low series.
    #[test]
    fn prop_order_independent(
        (txns, shuffled) in transactions_strategy()
            .prop_flat_map(|txns| (Just(txns.clone()), Just(txns).prop_shuffle()))
    ) {
        let sorted_rows = |txns: &[DenormalizedTransaction]| {
            let mut rows = aggregate_transactions(txns).monthly_aggregations;
            rows.sort_by(|a, b| (&a.year_month, &a.bank_account).cmp(&(&b.year_month, &b.bank_account)));
            rows
        };
        prop_assert_eq!(sorted_rows(&txns), sorted_rows(&shuffled));

        prop_assert_eq!(
            get_weekly_low_balances(&txns).unwrap(),
            get_weekly_low_balances(&shuffled).unwrap()
        );
    }

    /// Every account gets one point per generated week, with identical keys.
    #[test]
    fn prop_balance_density(txns in transactions_strategy()) {
        let balances = get_weekly_low_balances(&txns).unwrap();
        let (start, end) = date_range(&txns);
        let periods = generate_periods_for_range(&start, &end).unwrap();

        let accounts: HashSet<&str> = txns.iter().map(|t| t.bank_account.as_str()).collect();
        prop_assert_eq!(balances.len(), accounts.len());

        for series in balances.values() {
            let keys: Vec<&str> = series.iter().map(|p| p.time_stamp.as_str()).collect();
            prop_assert_eq!(keys, periods.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }

    /// Weeks without activity repeat the previous week's balance, or 0 before any data.
    #[test]
    fn prop_carry_forward(txns in transactions_strategy()) {
        let balances = get_weekly_low_balances(&txns).unwrap();

        for (account, series) in &balances {
            let active_weeks: HashSet<String> = txns
                .iter()
                .filter(|t| &t.bank_account == account)
                .map(|t| year_week(&t.time_stamp).unwrap())
                .collect();

            let mut previous = 0.0;
            for point in series {
                if active_weeks.contains(&point.time_stamp) {
                    let low = txns
                        .iter()
                        .filter(|t| &t.bank_account == account)
                        .filter(|t| year_week(&t.time_stamp).unwrap() == point.time_stamp)
                        .map(|t| t.balance)
                        .fold(f64::INFINITY, f64::min);
                    prop_assert_eq!(point.balance, low);
                } else {
                    prop_assert_eq!(point.balance, previous);
                }
                previous = point.balance;
            }
        }
    }
}

#[test]
fn test_two_january_transactions() {
    let result = aggregate_transactions(&[
        txn("1", "2024-01-03", 1000.0, 1000.0, "cheque"),
        txn("2", "2024-01-21", -200.0, 800.0, "cheque"),
    ]);

    assert_eq!(result.monthly_aggregations.len(), 2);
    for row in &result.monthly_aggregations {
        assert_eq!(row.year_month, "2024-01");
        assert_eq!(row.income_in_zar, 1000.0);
        assert_eq!(row.expenses_in_zar, -200.0);
    }
    assert_eq!(result.bank_account_aggregates, vec!["Total", "FNB/cheque"]);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["bankAccountAggregates"][1], "FNB/cheque");
    assert_eq!(json["monthlyAggregations"][0]["incomeInZAR"], 1000.0);
}

#[test]
fn test_weekly_series_drops_in_week_of_second_transaction() {
    let balances = get_bank_balances(
        &[
            txn("1", "2024-01-01", 100.0, 100.0, "A"),
            txn("2", "2024-01-15", -50.0, 50.0, "A"),
        ],
        sample_lowest_balance,
        group_by_year_week,
    )
    .unwrap();

    let series = &balances["FNB/A"];
    let weeks: Vec<&str> = series.iter().map(|p| p.time_stamp.as_str()).collect();
    let values: Vec<f64> = series.iter().map(|p| p.balance).collect();

    assert_eq!(weeks, vec!["2024-W01", "2024-W02", "2024-W03"]);
    assert_eq!(values, vec![100.0, 100.0, 50.0]);
}

#[test]
fn test_non_commutative_sampler_depends_on_input_order() {
    // "always keep the first" is not commutative, so the fold order shows through
    let keep_first = |_: &DenormalizedTransaction, _: &DenormalizedTransaction| bankview_finance::Pick::A;
    let a = txn("1", "2024-01-02", 0.0, 10.0, "A");
    let b = txn("2", "2024-01-03", 0.0, 20.0, "A");

    let forward = get_bank_balances(&[a.clone(), b.clone()], keep_first, group_by_year_week).unwrap();
    let backward = get_bank_balances(&[b, a], keep_first, group_by_year_week).unwrap();

    assert_eq!(forward["FNB/A"][0].balance, 10.0);
    assert_eq!(backward["FNB/A"][0].balance, 20.0);
}
