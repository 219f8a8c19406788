//! Presentation payload: the numbers and series a dashboard renders.
//!
//! Nothing here draws anything. Each chart of the report becomes a plain
//! series of rows that a renderer (the CLI, a web page) can plot.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregator::Summary;
use crate::filter::FilteredView;
use crate::types::{EnrichedRecord, StockStatus};
use crate::util;

/// The four scalar metrics shown at the top of the report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub warehouses: usize,
    pub categories: usize,
    pub total_storage_cost: f64,
    pub understocked_items: usize,
}

/// Status histogram bar group for one warehouse.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WarehouseStatusCounts {
    pub warehouse_id: String,
    pub understocked: usize,
    pub optimal: usize,
    pub overstocked: usize,
}

/// One stacked segment: a value for a (category, warehouse) pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategorySegment {
    pub product_category: String,
    pub warehouse_id: String,
    pub value: f64,
}

/// One scatter point of stock against reorder level.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockPoint {
    pub product_category: String,
    pub warehouse_id: String,
    pub current_stock_units: f64,
    pub reorder_level: f64,
    /// Marker size. Zero when the row has no storage cost.
    pub storage_cost_per_unit: f64,
    pub status: StockStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub metrics: KeyMetrics,
    pub status_by_warehouse: Vec<WarehouseStatusCounts>,
    /// Summed unit storage cost per category, stacked by warehouse.
    pub cost_by_category: Vec<CategorySegment>,
    pub stock_points: Vec<StockPoint>,
    /// Mean days since restock per category, stacked by warehouse. Empty
    /// when no row in the view has a restock date.
    pub restock_age_by_category: Vec<CategorySegment>,
    pub insights: Vec<String>,
}

/// Build the report for a view and its summary.
pub fn build_report(view: &FilteredView<'_>, summary: &Summary) -> Report {
    Report {
        metrics: KeyMetrics {
            warehouses: summary.warehouse_count,
            categories: summary.category_count,
            total_storage_cost: summary.total_storage_cost,
            understocked_items: summary.understocked_count,
        },
        status_by_warehouse: status_by_warehouse(view),
        cost_by_category: cost_by_category(view),
        stock_points: stock_points(view),
        restock_age_by_category: restock_age_by_category(view),
        insights: insights(summary),
    }
}

pub fn status_by_warehouse(view: &FilteredView<'_>) -> Vec<WarehouseStatusCounts> {
    let mut counts: BTreeMap<&str, [usize; 3]> = BTreeMap::new();
    for record in view.iter() {
        let slot = counts.entry(record.warehouse_id.as_str()).or_default();
        slot[record.status() as usize] += 1;
    }
    util::sorted_distinct(counts.keys().copied())
        .into_iter()
        .map(|warehouse_id| {
            let [understocked, optimal, overstocked] = counts[warehouse_id.as_str()];
            WarehouseStatusCounts {
                warehouse_id,
                understocked,
                optimal,
                overstocked,
            }
        })
        .collect()
}

/// `(sum, count)` of `value` per `(category, warehouse)`. Rows where
/// `value` is `None` are skipped.
fn by_category_and_warehouse<F>(view: &FilteredView<'_>, value: F) -> BTreeMap<(String, String), (f64, usize)>
where
    F: Fn(&EnrichedRecord) -> Option<f64>,
{
    let mut groups: BTreeMap<(String, String), (f64, usize)> = BTreeMap::new();
    for record in view.iter() {
        if let Some(v) = value(record) {
            let slot = groups
                .entry((record.product_category.clone(), record.warehouse_id.clone()))
                .or_default();
            slot.0 += v;
            slot.1 += 1;
        }
    }
    groups
}

pub fn cost_by_category(view: &FilteredView<'_>) -> Vec<CategorySegment> {
    by_category_and_warehouse(view, |r| r.storage_cost_per_unit)
        .into_iter()
        .map(|((product_category, warehouse_id), (sum, _))| CategorySegment {
            product_category,
            warehouse_id,
            value: sum,
        })
        .collect()
}

pub fn restock_age_by_category(view: &FilteredView<'_>) -> Vec<CategorySegment> {
    by_category_and_warehouse(view, |r| r.days_since_restock().map(|d| d as f64))
        .into_iter()
        .map(|((product_category, warehouse_id), (sum, n))| CategorySegment {
            product_category,
            warehouse_id,
            value: sum / n as f64,
        })
        .collect()
}

pub fn stock_points(view: &FilteredView<'_>) -> Vec<StockPoint> {
    view.iter()
        .map(|r| StockPoint {
            product_category: r.product_category.clone(),
            warehouse_id: r.warehouse_id.clone(),
            current_stock_units: r.current_stock_units,
            reorder_level: r.reorder_level,
            storage_cost_per_unit: r.storage_cost_per_unit.unwrap_or(0.0),
            status: r.status(),
        })
        .collect()
}

/// Average restock age as shown to the user.
pub fn format_average_age(avg: Option<f64>) -> String {
    match avg {
        Some(days) => format!("{:.1} days", days),
        None => "no data".to_string(),
    }
}

pub fn insights(summary: &Summary) -> Vec<String> {
    vec![
        format!(
            "Understocked Products: {} \u{2192} Restock immediately to avoid shortages.",
            summary.understocked_count
        ),
        format!(
            "Overstocked Products: {} \u{2192} Possible savings of {}.",
            summary.overstocked_count,
            util::format_amount(summary.overstocked_savings_sum)
        ),
        format!(
            "Average Days Since Restock: {}.",
            format_average_age(summary.avg_days_since_restock)
        ),
        "Regularly reviewing stock levels will improve warehouse efficiency and reduce storage costs."
            .to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::summarize;
    use crate::metrics::{derive, DeriveConfig};
    use crate::types::InventoryRecord;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
    }

    fn row(warehouse: &str, category: &str, stock: f64, cost: f64, days_ago: Option<i64>) -> InventoryRecord {
        InventoryRecord {
            warehouse_id: warehouse.into(),
            location: "Surat".into(),
            product_category: category.into(),
            current_stock_units: stock,
            reorder_level: 50.0,
            storage_cost_per_unit: Some(cost),
            last_restocked_date: days_ago.map(|d| today() - chrono::Duration::days(d)),
            extra: Vec::new(),
        }
    }

    fn sample() -> Vec<EnrichedRecord> {
        derive(
            vec![
                row("10", "Grocery", 40.0, 1.0, Some(4)),
                row("2", "Grocery", 60.0, 2.0, Some(10)),
                row("2", "Grocery", 90.0, 3.0, Some(20)),
                row("2", "Apparel", 2000.0, 0.5, None),
            ],
            today(),
            &DeriveConfig::default(),
        )
    }

    #[test]
    fn histogram_groups_status_per_warehouse() {
        let records = sample();
        let view = FilteredView::all(&records);
        let groups = status_by_warehouse(&view);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].warehouse_id, "2");
        assert_eq!((groups[0].understocked, groups[0].optimal, groups[0].overstocked), (0, 1, 2));
        assert_eq!(groups[1].warehouse_id, "10");
        assert_eq!(groups[1].understocked, 1);
    }

    #[test]
    fn category_series_stack_by_warehouse() {
        let records = sample();
        let view = FilteredView::all(&records);

        let cost = cost_by_category(&view);
        assert_eq!(cost.len(), 3);
        assert_eq!(cost[0].product_category, "Apparel");
        let grocery_2 = cost
            .iter()
            .find(|s| s.product_category == "Grocery" && s.warehouse_id == "2")
            .unwrap();
        assert!((grocery_2.value - 5.0).abs() < 0.01);

        let age = restock_age_by_category(&view);
        assert_eq!(age.len(), 2);
        let grocery_2 = age.iter().find(|s| s.warehouse_id == "2").unwrap();
        assert!((grocery_2.value - 15.0).abs() < 0.01);
    }

    #[test]
    fn insights_interpolate_summary() {
        let records = sample();
        let view = FilteredView::all(&records);
        let summary = summarize(&view);
        let report = build_report(&view, &summary);

        assert_eq!(report.metrics.understocked_items, 1);
        assert_eq!(report.stock_points.len(), 4);
        assert_eq!(
            report.insights[1],
            "Overstocked Products: 2 \u{2192} Possible savings of 19,900."
        );
        assert_eq!(report.insights[2], "Average Days Since Restock: 11.3 days.");
    }

    #[test]
    fn missing_ages_render_as_no_data() {
        assert_eq!(format_average_age(None), "no data");
        let summary = Summary::default();
        assert_eq!(insights(&summary)[2], "Average Days Since Restock: no data.");
    }

    #[test]
    fn report_serializes_to_json() {
        let records = sample();
        let view = FilteredView::all(&records);
        let report = build_report(&view, &summarize(&view));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["metrics"]["warehouses"], 2);
        assert_eq!(json["stock_points"][0]["status"], "Understocked");
    }
}
