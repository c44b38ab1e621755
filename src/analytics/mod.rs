//! Pure computations over records: totals, periods, filters, grouping and
//! outliers, plus the analytics page that displays them.

mod filter;
mod grouping;
mod outliers;
mod page;
mod period;
mod totals;

pub use filter::{FilterQuery, RecordFilter, UNCATEGORIZED, category_label, category_labels};
pub use grouping::{
    Bucket, BucketTotals, CategoryTotal, group_by_bucket, group_by_category, running_balances,
};
pub(crate) use grouping::days_in;
pub use outliers::{Outlier, SummaryStatistics, find_outliers};
pub use page::get_analytics_page;
pub use period::{
    ActivePeriod, DateRange, PeriodNavigation, PeriodPreset, PeriodQuery, date_bounds,
    range_label, resolve_period,
};
pub(crate) use period::{format_date_label, month_abbrev, month_bounds, week_bounds};
pub use totals::{Totals, format_percent, percent_of, total};
