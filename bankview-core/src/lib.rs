//! bankview-core: transaction model, normalizer, ISO week calendar and the
//! transaction store the views are computed from

pub mod events;
pub mod filter;
pub mod model;
pub mod store;
pub mod time;

pub use events::{InfoLogEvent, NULL_PARSE_MESSAGE, parsing_errors_to_events};
pub use filter::AccountFilter;
pub use model::{
    BalanceDataPoint, DenormalizedTransaction, MonthlyAggregation, TOTAL_ACCOUNT, Transaction,
    bank_account_id, normalize,
};
pub use store::{ImportSummary, StatementImport, TransactionStore};
pub use time::{
    date_to_period_key, generate_periods_for_range, period_key_to_date, year_month, year_week,
};
