//! Parquet export of every dashboard view

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use arrow::array::RecordBatch;
use parquet::arrow::ArrowWriter;
use tracing::{debug, info};

use crate::aggregator::{category_drilldown, category_over_time, resample, Granularity};
use crate::error::{DashError, Result};
use crate::filter::filter_by_category;
use crate::query::{fetch_daily_orders, fetch_order_lines, fetch_product_frequency};
use crate::store::Store;
use crate::table::ToRecordBatch;

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub granularity: Granularity,
    /// Also write the drill-down and the filtered order lines for this category
    pub category: Option<String>,
}

/// Write one batch to a Parquet file, replacing any existing file
pub fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path).map_err(|source| DashError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;

    debug!(path = %path.display(), rows = batch.num_rows(), "wrote parquet table");
    Ok(())
}

/// File-name-safe form of a category
fn slug(category: &str) -> String {
    category
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

/// Run every query and reshape, writing each table into `out_dir`.
///
/// Returns the written paths in the order they were produced.
pub fn export_all(store: &Store, out_dir: &Path, options: &ExportOptions) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|source| DashError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let daily = fetch_daily_orders(store)?;
    let lines = fetch_order_lines(store)?;
    let frequency = fetch_product_frequency(store)?;
    let periods = resample(&daily, options.granularity)?;
    let trend = category_over_time(&lines)?;

    let period_name = match options.granularity {
        Granularity::Weekly => "orders_weekly.parquet",
        Granularity::Monthly => "orders_monthly.parquet",
    };

    let lines_batch = lines.to_record_batch()?;
    let mut tables = vec![
        ("orders_daily.parquet".to_string(), daily.to_record_batch()?),
        (period_name.to_string(), periods.to_record_batch()?),
        ("product_frequency.parquet".to_string(), frequency.to_record_batch()?),
        ("category_trend.parquet".to_string(), trend.to_record_batch()?),
    ];

    if let Some(category) = &options.category {
        let drilldown = category_drilldown(&lines, category);
        tables.push((
            format!("drilldown_{}.parquet", slug(category)),
            drilldown.to_record_batch()?,
        ));
        tables.push((
            format!("order_lines_{}.parquet", slug(category)),
            filter_by_category(&lines_batch, category)?,
        ));
    }
    tables.push(("order_lines.parquet".to_string(), lines_batch));

    let mut written = Vec::with_capacity(tables.len());
    for (name, batch) in &tables {
        let path = out_dir.join(name);
        write_parquet(&path, batch)?;
        written.push(path);
    }

    info!(dir = %out_dir.display(), files = written.len(), "exported dashboard tables");
    Ok(written)
}
