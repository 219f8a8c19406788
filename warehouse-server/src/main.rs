use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;

use warehouse_pipeline::aggregator::{summarize, Summary};
use warehouse_pipeline::dataset::{local_today, Dataset, DatasetCache};
use warehouse_pipeline::export::{export_csv_file, EXPORT_FILE_NAME};
use warehouse_pipeline::metrics::{DeriveConfig, DEFAULT_UNIT_EXCESS_COST};
use warehouse_pipeline::report::{build_report, Report};
use warehouse_pipeline::types::{FilterQuery, StockStatus};
use warehouse_pipeline::util::format_amount;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Warehouse optimization report: identifies understocked, optimal and
/// overstocked product categories in an inventory CSV.
#[derive(Parser, Debug)]
#[command(name = "warehouse-server", version)]
struct Cli {
    /// Inventory CSV file.
    #[arg(env = "WAREHOUSE_INVENTORY", default_value = "warehouse_inventory.csv")]
    input: PathBuf,

    /// Comma-separated warehouse ids to include (default: all).
    #[arg(long, value_delimiter = ',')]
    warehouses: Vec<String>,

    /// Comma-separated product categories to include (default: all).
    #[arg(long, value_delimiter = ',')]
    categories: Vec<String>,

    /// Output as JSON instead of formatted text.
    #[arg(long)]
    json: bool,

    /// Write the filtered data as CSV.
    #[arg(long, num_args = 0..=1, default_missing_value = EXPORT_FILE_NAME)]
    export: Option<PathBuf>,

    /// Savings attributed to each unit of excess stock.
    #[arg(long, env = "WAREHOUSE_UNIT_EXCESS_COST", default_value_t = DEFAULT_UNIT_EXCESS_COST)]
    unit_excess_cost: f64,

    /// Evaluation date for restock ages, YYYY-MM-DD (default: today).
    #[arg(long, env = "WAREHOUSE_TODAY")]
    today: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ReportJson<'a> {
    generated_at: String,
    evaluated_on: NaiveDate,
    source: String,
    warehouse_filter: Vec<String>,
    category_filter: Vec<String>,
    warehouse_options: Vec<String>,
    category_options: Vec<String>,
    rows_loaded: usize,
    rows_dropped: usize,
    summary: &'a Summary,
    report: &'a Report,
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

fn print_human<W: Write>(
    out: &mut W,
    dataset: &Dataset,
    query: &FilterQuery,
    summary: &Summary,
    report: &Report,
    load_ms: u128,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  WAREHOUSE OPTIMIZATION DASHBOARD")?;
    writeln!(out, "  {:\u{2550}<64}", "")?;
    writeln!(
        out,
        "  {} rows loaded  \u{00b7}  {} dropped  \u{00b7}  {} in view  \u{00b7}  as of {}",
        dataset.len(),
        dataset.dropped_rows(),
        summary.row_count,
        dataset.evaluated_on()
    )?;
    writeln!(
        out,
        "  Warehouses: {}  \u{00b7}  Categories: {}",
        describe_filter(&query.warehouses),
        describe_filter(&query.categories)
    )?;
    writeln!(out)?;

    writeln!(out, "  Key Metrics")?;
    writeln!(out, "  {:\u{2500}<64}", "")?;
    writeln!(out, "  Warehouses           {:>12}", report.metrics.warehouses)?;
    writeln!(out, "  Categories           {:>12}", report.metrics.categories)?;
    writeln!(
        out,
        "  Total Storage Cost   {:>12}",
        format_amount(report.metrics.total_storage_cost)
    )?;
    writeln!(out, "  Understocked Items   {:>12}", report.metrics.understocked_items)?;
    writeln!(out)?;

    if summary.row_count == 0 {
        writeln!(out, "  No rows match the selected filters.")?;
        writeln!(out)?;
    } else {
        print_charts(out, report)?;
    }

    writeln!(out, "  Insights & Recommendations")?;
    writeln!(out, "  {:\u{2500}<64}", "")?;
    for line in &report.insights {
        writeln!(out, "  - {}", line)?;
    }
    writeln!(out)?;
    writeln!(out, "  CSV loaded in {}ms", load_ms)?;
    writeln!(out)
}

fn print_charts<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    writeln!(out, "  Stock Status by Warehouse")?;
    writeln!(out, "  {:\u{2500}<64}", "")?;
    writeln!(
        out,
        "  {:16} {:>14} {:>10} {:>14}",
        "Warehouse",
        StockStatus::Understocked,
        StockStatus::Optimal,
        StockStatus::Overstocked
    )?;
    for group in &report.status_by_warehouse {
        writeln!(
            out,
            "  {:16} {:>14} {:>10} {:>14}",
            group.warehouse_id, group.understocked, group.optimal, group.overstocked
        )?;
    }
    writeln!(out)?;

    writeln!(out, "  Storage Cost per Category")?;
    writeln!(out, "  {:\u{2500}<64}", "")?;
    for segment in &report.cost_by_category {
        writeln!(
            out,
            "  {:24} {:16} {:>12.2}",
            segment.product_category, segment.warehouse_id, segment.value
        )?;
    }
    writeln!(out)?;

    writeln!(out, "  Stock vs Reorder Levels")?;
    writeln!(out, "  {:\u{2500}<64}", "")?;
    for point in &report.stock_points {
        writeln!(
            out,
            "  {:24} {:10} stock {:>8} reorder {:>8}  {}",
            point.product_category,
            point.warehouse_id,
            point.current_stock_units,
            point.reorder_level,
            point.status
        )?;
    }
    writeln!(out)?;

    if !report.restock_age_by_category.is_empty() {
        writeln!(out, "  Days Since Last Restock per Category")?;
        writeln!(out, "  {:\u{2500}<64}", "")?;
        for segment in &report.restock_age_by_category {
            writeln!(
                out,
                "  {:24} {:16} {:>8.1} days",
                segment.product_category, segment.warehouse_id, segment.value
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn describe_filter(values: &std::collections::BTreeSet<String>) -> String {
    if values.is_empty() {
        "all".to_string()
    } else {
        values.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let today = cli.today.unwrap_or_else(local_today);
    let config = DeriveConfig {
        unit_excess_cost: cli.unit_excess_cost,
    };

    let load_start = Instant::now();
    let mut cache = DatasetCache::new(&cli.input, config);
    let dataset = match cache.get(today) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let load_ms = load_start.elapsed().as_millis();
    if dataset.invalid_dates() > 0 {
        log::warn!(
            "path={} {} restock dates unreadable, treated as missing",
            cache.path().display(),
            dataset.invalid_dates()
        );
    }

    let query = FilterQuery::new(cli.warehouses, cli.categories);
    let view = dataset.view(&query);
    let summary = summarize(&view);
    let report = build_report(&view, &summary);

    if let Some(path) = &cli.export {
        if let Err(e) = export_csv_file(path, dataset.schema(), &view) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    if cli.json {
        let payload = ReportJson {
            generated_at: chrono::Utc::now().to_rfc3339(),
            evaluated_on: dataset.evaluated_on(),
            source: cli.input.display().to_string(),
            warehouse_filter: query.warehouses.iter().cloned().collect(),
            category_filter: query.categories.iter().cloned().collect(),
            warehouse_options: dataset.warehouse_options(),
            category_options: dataset.category_options(),
            rows_loaded: dataset.len(),
            rows_dropped: dataset.dropped_rows(),
            summary: &summary,
            report: &report,
        };
        match serde_json::to_string_pretty(&payload) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = print_human(&mut out, &dataset, &query, &summary, &report, load_ms) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    if let Some(path) = &cli.export {
        eprintln!("Filtered data written to {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
Warehouse_Id,Location,Product_Category,Current_Stock_Units,Reorder_Level,Storage_Cost_Per_Unit,Last_Restocked_Date
WH-1,Pune,Electronics,40,50,2,2025-03-01
WH-2,Delhi,Apparel,80,50,1,2025-03-21
";

    fn render(query: &FilterQuery) -> String {
        let today = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let dataset = Dataset::load(SAMPLE_CSV.as_bytes(), today, DeriveConfig::default()).unwrap();
        let view = dataset.view(query);
        let summary = summarize(&view);
        let report = build_report(&view, &summary);
        let mut out = Vec::new();
        print_human(&mut out, &dataset, query, &summary, &report, 0).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_view_still_prints_insights() {
        let text = render(&FilterQuery::new(["WH-404"], Vec::<&str>::new()));
        assert!(text.contains("No rows match the selected filters."));
        assert!(text.contains("Insights & Recommendations"));
        assert!(text.contains("Average Days Since Restock: no data."));
        assert!(!text.contains("Stock Status by Warehouse"));
    }

    #[test]
    fn average_age_is_printed_once() {
        let text = render(&FilterQuery::default());
        assert!(text.contains("Stock Status by Warehouse"));
        assert_eq!(text.matches("20.0 days").count(), 1);
    }
}
