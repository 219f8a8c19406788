//! Per-row stock classification and derived metrics.

use chrono::NaiveDate;

use crate::types::{DerivedMetrics, EnrichedRecord, InventoryRecord, StockStatus};

/// Stock below `OPTIMAL_CEILING * reorder_level` (and at or above the
/// reorder level) is optimal.
pub const OPTIMAL_CEILING: f64 = 1.5;

/// Default cost attributed to each unit of excess stock.
pub const DEFAULT_UNIT_EXCESS_COST: f64 = 10.0;

/// Settings for the metric pass.
#[derive(Clone, Debug, PartialEq)]
pub struct DeriveConfig {
    /// Flat savings per excess unit. Independent of the row's storage cost.
    pub unit_excess_cost: f64,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            unit_excess_cost: DEFAULT_UNIT_EXCESS_COST,
        }
    }
}

/// Classify a stock level against its reorder level. Both bounds are
/// strict: stock equal to the reorder level is optimal, stock equal to
/// 1.5x the reorder level is overstocked.
pub fn classify(current_stock_units: f64, reorder_level: f64) -> StockStatus {
    if current_stock_units < reorder_level {
        StockStatus::Understocked
    } else if current_stock_units < OPTIMAL_CEILING * reorder_level {
        StockStatus::Optimal
    } else {
        StockStatus::Overstocked
    }
}

/// Stock held above the reorder level, never negative.
pub fn excess_stock(current_stock_units: f64, reorder_level: f64) -> f64 {
    (current_stock_units - reorder_level).max(0.0)
}

/// Compute the metrics of one row as of `today`.
pub fn derive_metrics(
    record: &InventoryRecord,
    today: NaiveDate,
    config: &DeriveConfig,
) -> DerivedMetrics {
    let excess = excess_stock(record.current_stock_units, record.reorder_level);
    DerivedMetrics {
        status: classify(record.current_stock_units, record.reorder_level),
        excess_stock: excess,
        potential_savings: excess * config.unit_excess_cost,
        days_since_restock: record
            .last_restocked_date
            .map(|date| (today - date).num_days()),
    }
}

/// Run the metric pass over a loaded dataset.
pub fn derive(
    records: Vec<InventoryRecord>,
    today: NaiveDate,
    config: &DeriveConfig,
) -> Vec<EnrichedRecord> {
    records
        .into_iter()
        .map(|record| {
            let metrics = derive_metrics(&record, today, config);
            EnrichedRecord::new(record, metrics)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(stock: f64, reorder: f64, date: Option<NaiveDate>) -> InventoryRecord {
        InventoryRecord {
            warehouse_id: "WH-1".into(),
            location: "Pune".into(),
            product_category: "Electronics".into(),
            current_stock_units: stock,
            reorder_level: reorder,
            storage_cost_per_unit: Some(2.0),
            last_restocked_date: date,
            extra: Vec::new(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
    }

    #[test]
    fn boundaries_are_strict() {
        assert_eq!(classify(49.0, 50.0), StockStatus::Understocked);
        assert_eq!(classify(50.0, 50.0), StockStatus::Optimal);
        assert_eq!(classify(74.999, 50.0), StockStatus::Optimal);
        assert_eq!(classify(75.0, 50.0), StockStatus::Overstocked);
    }

    #[test]
    fn zero_reorder_level_is_overstocked() {
        assert_eq!(classify(0.0, 0.0), StockStatus::Overstocked);
    }

    #[test]
    fn excess_never_negative() {
        assert_eq!(excess_stock(10.0, 50.0), 0.0);
        assert_eq!(excess_stock(-5.0, 0.0), 0.0);
        assert!((excess_stock(80.0, 50.0) - 30.0).abs() < 0.01);
    }

    #[test]
    fn understocked_row_with_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let m = derive_metrics(&record(40.0, 50.0, Some(date)), today(), &DeriveConfig::default());
        assert_eq!(m.status, StockStatus::Understocked);
        assert_eq!(m.excess_stock, 0.0);
        assert_eq!(m.potential_savings, 0.0);
        assert_eq!(m.days_since_restock, Some(30));
    }

    #[test]
    fn overstocked_row_without_date() {
        let m = derive_metrics(&record(80.0, 50.0, None), today(), &DeriveConfig::default());
        assert_eq!(m.status, StockStatus::Overstocked);
        assert!((m.excess_stock - 30.0).abs() < 0.01);
        assert!((m.potential_savings - 300.0).abs() < 0.01);
        assert_eq!(m.days_since_restock, None);
    }

    #[test]
    fn savings_use_configured_unit_cost() {
        let config = DeriveConfig {
            unit_excess_cost: 2.5,
        };
        let m = derive_metrics(&record(60.0, 50.0, None), today(), &config);
        assert_eq!(m.status, StockStatus::Optimal);
        assert!((m.potential_savings - 25.0).abs() < 0.01);
    }

    #[test]
    fn derive_preserves_order() {
        let enriched = derive(
            vec![record(10.0, 50.0, None), record(100.0, 50.0, None)],
            today(),
            &DeriveConfig::default(),
        );
        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0].status(), StockStatus::Understocked);
        assert_eq!(enriched[1].status(), StockStatus::Overstocked);
    }
}
