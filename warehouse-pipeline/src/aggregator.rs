//! Summary statistics over a filtered view.

use std::collections::HashSet;

use serde::Serialize;

use crate::filter::FilteredView;
use crate::types::StockStatus;

/// Headline numbers for one filtered view.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub row_count: usize,
    /// Distinct warehouse ids.
    pub warehouse_count: usize,
    /// Distinct product categories.
    pub category_count: usize,
    /// Sum of stock times unit storage cost. Rows without a cost add nothing.
    pub total_storage_cost: f64,
    pub understocked_count: usize,
    pub optimal_count: usize,
    pub overstocked_count: usize,
    /// Potential savings summed over overstocked rows only.
    pub overstocked_savings_sum: f64,
    /// Mean over rows that have a restock date; `None` when no row has one.
    pub avg_days_since_restock: Option<f64>,
}

/// Compute the summary of a view.
pub fn summarize(view: &FilteredView<'_>) -> Summary {
    let mut warehouses = HashSet::new();
    let mut categories = HashSet::new();
    let mut summary = Summary {
        row_count: view.len(),
        ..Summary::default()
    };
    let mut days_total = 0i64;
    let mut days_rows = 0usize;

    for record in view.iter() {
        warehouses.insert(record.warehouse_id.as_str());
        categories.insert(record.product_category.as_str());
        summary.total_storage_cost += record.total_storage_cost().unwrap_or(0.0);

        match record.status() {
            StockStatus::Understocked => summary.understocked_count += 1,
            StockStatus::Optimal => summary.optimal_count += 1,
            StockStatus::Overstocked => {
                summary.overstocked_count += 1;
                summary.overstocked_savings_sum += record.potential_savings();
            }
        }

        if let Some(days) = record.days_since_restock() {
            days_total += days;
            days_rows += 1;
        }
    }

    summary.warehouse_count = warehouses.len();
    summary.category_count = categories.len();
    summary.avg_days_since_restock =
        (days_rows > 0).then(|| days_total as f64 / days_rows as f64);
    summary
}
