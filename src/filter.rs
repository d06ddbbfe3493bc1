//! Vectorized category filtering using Arrow compute kernels

use arrow::array::{RecordBatch, Scalar, StringArray};
use arrow::compute;

use crate::error::Result;
use crate::utils::get_string_column;

/// Keep only rows whose `category` column equals `category`.
///
/// A category with no matching rows yields an empty batch with the same
/// schema.
pub fn filter_by_category(batch: &RecordBatch, category: &str) -> Result<RecordBatch> {
    let categories = get_string_column(batch, "category")?;
    let scalar = Scalar::new(StringArray::from(vec![category]));

    let mask = compute::kernels::cmp::eq(categories, &scalar)?;

    Ok(compute::filter_record_batch(batch, &mask)?)
}
