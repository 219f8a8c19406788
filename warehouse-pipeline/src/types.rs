use std::collections::BTreeSet;
use std::fmt;
use std::ops::Deref;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Loaded rows
// ---------------------------------------------------------------------------

/// One inventory row as read from the source, before any derivation.
///
/// Rows only exist if both stock and reorder level parsed as numbers.
/// Identifier fields may be empty strings; the loader does not drop them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InventoryRecord {
    pub warehouse_id: String,
    pub location: String,
    pub product_category: String,
    pub current_stock_units: f64,
    pub reorder_level: f64,
    /// Absent when the cell was blank or not a number.
    pub storage_cost_per_unit: Option<f64>,
    pub last_restocked_date: Option<NaiveDate>,
    /// Cells of columns not bound to a role, in source order.
    #[serde(skip)]
    pub extra: Vec<String>,
}

impl InventoryRecord {
    /// `current_stock_units * storage_cost_per_unit`, absent with the cost.
    pub fn total_storage_cost(&self) -> Option<f64> {
        self.storage_cost_per_unit
            .map(|cost| self.current_stock_units * cost)
    }
}

// ---------------------------------------------------------------------------
// Derived metrics
// ---------------------------------------------------------------------------

/// Three-way stock classification relative to the reorder level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StockStatus {
    Understocked,
    Optimal,
    Overstocked,
}

impl StockStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StockStatus::Understocked => "Understocked",
            StockStatus::Optimal => "Optimal",
            StockStatus::Overstocked => "Overstocked",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Per-row values computed by [`crate::metrics::derive`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub status: StockStatus,
    pub excess_stock: f64,
    pub potential_savings: f64,
    pub days_since_restock: Option<i64>,
}

/// A loaded row together with its derived metrics.
///
/// Fields are private: the only way to build one is the metric pass, so
/// the metrics always agree with the stock and reorder values they came
/// from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    record: InventoryRecord,
    #[serde(flatten)]
    metrics: DerivedMetrics,
}

impl EnrichedRecord {
    pub(crate) fn new(record: InventoryRecord, metrics: DerivedMetrics) -> Self {
        Self { record, metrics }
    }

    pub fn record(&self) -> &InventoryRecord {
        &self.record
    }

    pub fn metrics(&self) -> &DerivedMetrics {
        &self.metrics
    }

    pub fn status(&self) -> StockStatus {
        self.metrics.status
    }

    pub fn excess_stock(&self) -> f64 {
        self.metrics.excess_stock
    }

    pub fn potential_savings(&self) -> f64 {
        self.metrics.potential_savings
    }

    pub fn days_since_restock(&self) -> Option<i64> {
        self.metrics.days_since_restock
    }
}

impl Deref for EnrichedRecord {
    type Target = InventoryRecord;

    fn deref(&self) -> &InventoryRecord {
        &self.record
    }
}

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// User-selected filter values. An empty set leaves that dimension
/// unfiltered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterQuery {
    pub warehouses: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl FilterQuery {
    pub fn new<W, C, A, B>(warehouses: W, categories: C) -> Self
    where
        W: IntoIterator<Item = A>,
        C: IntoIterator<Item = B>,
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            warehouses: warehouses.into_iter().map(Into::into).collect(),
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_dimensions_accept_different_string_types() {
        let query = FilterQuery::new(["WH-1", "WH-2"], Vec::<String>::new());
        assert_eq!(query.warehouses.len(), 2);
        assert!(query.categories.is_empty());

        let query = FilterQuery::new(Vec::<&str>::new(), vec![String::from("Apparel")]);
        assert!(query.warehouses.is_empty());
        assert!(query.categories.contains("Apparel"));
    }
}
