//! In-memory reshaping of query results for the chart views
//!
//! Every function here is a pure transform from one immutable table to a
//! new one. Grouping goes through ordered maps so output order is fixed for
//! a given input.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::Deserialize;

use crate::error::Result;
use crate::query::{DailyOrderSummary, OrderProductLine};
use crate::utils::parse_order_date;

/// Time-bucket size for resampling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Monday..Sunday weeks, labelled by the Sunday
    Weekly,
    /// Calendar months, labelled by the last day of the month
    #[default]
    Monthly,
}

impl Granularity {
    /// Label of the bucket containing `date`
    pub fn bucket_end(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Weekly => {
                let to_sunday = 6 - u64::from(date.weekday().num_days_from_monday());
                date.checked_add_days(Days::new(to_sunday)).unwrap_or(NaiveDate::MAX)
            }
            Granularity::Monthly => month_end(date),
        }
    }

    /// Label of the bucket following the one labelled `end`
    pub fn next_bucket(self, end: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Weekly => end.checked_add_days(Days::new(7)),
            Granularity::Monthly => end.succ_opt().map(month_end),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
        }
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Running totals for one time bucket
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggState {
    pub order_count: i64,
    pub total_amount: f64,
}

impl AggState {
    pub fn add(&mut self, row: &DailyOrderSummary) {
        self.order_count += row.order_count;
        self.total_amount += row.total_amount;
    }
}

/// Order volume for one week or month
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub period_end: NaiveDate,
    pub order_count: i64,
    pub total_amount: f64,
}

/// Summed line prices for one category in one month
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMonthTotal {
    /// First day of the month
    pub month: NaiveDate,
    pub category: String,
    pub total_price: f64,
}

/// Summed line prices for one product
#[derive(Debug, Clone, PartialEq)]
pub struct ProductTotal {
    pub product_name: String,
    pub total_price: f64,
}

/// Sum daily summaries into weekly or monthly buckets.
///
/// Output is ascending by bucket label and covers every bucket between the
/// first and last populated one; buckets without orders carry zero totals.
/// Rows without a date fall outside every bucket.
pub fn resample(daily: &[DailyOrderSummary], granularity: Granularity) -> Result<Vec<PeriodSummary>> {
    let mut buckets: BTreeMap<NaiveDate, AggState> = BTreeMap::new();
    for row in daily {
        let Some(raw) = row.date.as_deref() else {
            continue;
        };
        let date = parse_order_date(raw)?;
        buckets
            .entry(granularity.bucket_end(date))
            .or_default()
            .add(row);
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Ok(Vec::new());
    };

    let mut results = Vec::with_capacity(buckets.len());
    let mut cursor = Some(first);
    while let Some(end) = cursor.filter(|end| *end <= last) {
        let state = buckets.get(&end).copied().unwrap_or_default();
        results.push(PeriodSummary {
            period_end: end,
            order_count: state.order_count,
            total_amount: state.total_amount,
        });
        cursor = granularity.next_bucket(end);
    }

    Ok(results)
}

/// Total line price per (month, category), ascending by month then category.
///
/// Lines without a date or category have no group and are skipped; a
/// missing price adds nothing to its group.
pub fn category_over_time(lines: &[OrderProductLine]) -> Result<Vec<CategoryMonthTotal>> {
    let mut totals: BTreeMap<(NaiveDate, &str), f64> = BTreeMap::new();
    for line in lines {
        let Some(raw) = line.order_date.as_deref() else {
            continue;
        };
        let month = month_start(parse_order_date(raw)?);
        if let Some(category) = line.category.as_deref() {
            *totals.entry((month, category)).or_insert(0.0) += line.price.unwrap_or(0.0);
        }
    }

    Ok(totals
        .into_iter()
        .map(|((month, category), total_price)| CategoryMonthTotal {
            month,
            category: category.to_string(),
            total_price,
        })
        .collect())
}

/// Total line price per product within one category, largest first.
///
/// Equal totals are ordered by product name. An unknown category yields an
/// empty table. Unnamed products are skipped and a missing price adds
/// nothing.
pub fn category_drilldown(lines: &[OrderProductLine], category: &str) -> Vec<ProductTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for line in lines.iter().filter(|line| line.category.as_deref() == Some(category)) {
        if let Some(product_name) = line.product_name.as_deref() {
            *totals.entry(product_name).or_insert(0.0) += line.price.unwrap_or(0.0);
        }
    }

    let mut results: Vec<ProductTotal> = totals
        .into_iter()
        .map(|(product_name, total_price)| ProductTotal {
            product_name: product_name.to_string(),
            total_price,
        })
        .collect();

    results.sort_by(|a, b| {
        b.total_price
            .total_cmp(&a.total_price)
            .then(a.product_name.cmp(&b.product_name))
    });

    results
}

/// Categories present in the lines, in order of first appearance
pub fn distinct_categories(lines: &[OrderProductLine]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for category in lines.iter().filter_map(|line| line.category.as_deref()) {
        if !seen.iter().any(|c| c == category) {
            seen.push(category.to_string());
        }
    }
    seen
}
