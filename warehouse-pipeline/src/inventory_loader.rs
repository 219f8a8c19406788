//! CSV inventory data loader.
//!
//! Parses inventory CSV files into `InventoryRecord` structs. Headers are
//! normalized and bound to roles first (see [`crate::columns`]), so column
//! naming may vary. Expected columns after normalization:
//!   Warehouse_Id, Location, Product_Category, Current_Stock_Units,
//!   Reorder_Level, Storage_Cost_Per_Unit, Last_Restocked_Date (optional)
//!
//! Rows whose stock or reorder level is blank or not a number are dropped
//! and counted. Unparseable dates become `None`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::columns::{Role, Schema};
use crate::error::{LoadError, LoadResult};
use crate::types::InventoryRecord;

/// Date layouts accepted for the restock column, tried in order.
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

/// Output of a load: resolved schema plus the rows that survived.
#[derive(Clone, Debug)]
pub struct LoadedInventory {
    pub schema: Schema,
    pub records: Vec<InventoryRecord>,
    /// Rows excluded for a missing stock or reorder level.
    pub dropped_rows: usize,
    /// Non-empty date cells that did not parse.
    pub invalid_dates: usize,
}

/// Load inventory records from a CSV reader.
pub fn load_inventory<R: Read>(reader: R) -> LoadResult<LoadedInventory> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let schema = Schema::from_headers(csv_reader.headers()?.iter())?;
    log::debug!(
        "resolved columns warehouse={:?} category={:?} stock={:?} reorder={:?} cost={:?} date={:?}",
        schema.column_name(Role::Warehouse),
        schema.column_name(Role::Category),
        schema.column_name(Role::StockLevel),
        schema.column_name(Role::ReorderLevel),
        schema.column_name(Role::Cost),
        schema.column_name(Role::RestockDate),
    );

    let mut records = Vec::new();
    let mut dropped_rows = 0;
    let mut invalid_dates = 0;
    for result in csv_reader.records() {
        let row = result?;
        match parse_row(&schema, &row, &mut invalid_dates) {
            Some(record) => records.push(record),
            None => dropped_rows += 1,
        }
    }

    if dropped_rows > 0 {
        log::warn!(
            "dropped {} rows missing stock or reorder level",
            dropped_rows
        );
    }
    if invalid_dates > 0 {
        log::debug!("{} restock dates could not be parsed", invalid_dates);
    }

    Ok(LoadedInventory {
        schema,
        records,
        dropped_rows,
        invalid_dates,
    })
}

/// Load inventory records from a CSV file path.
pub fn load_inventory_file<P: AsRef<Path>>(path: P) -> LoadResult<LoadedInventory> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    load_inventory(file)
}

/// Build one record, or `None` if stock or reorder level is missing.
fn parse_row(schema: &Schema, row: &StringRecord, invalid_dates: &mut usize) -> Option<InventoryRecord> {
    let map = schema.map();
    let cell = |idx: usize| cell_at(row, idx);

    let current_stock_units = parse_number(cell(map.stock_level))?;
    let reorder_level = parse_number(cell(map.reorder_level))?;

    let last_restocked_date = map.restock_date.and_then(|idx| {
        let raw = cell(idx);
        let parsed = parse_date(raw);
        if parsed.is_none() && !raw.is_empty() {
            *invalid_dates += 1;
        }
        parsed
    });

    Some(InventoryRecord {
        warehouse_id: cell(map.warehouse).to_string(),
        location: cell(map.location).to_string(),
        product_category: cell(map.category).to_string(),
        current_stock_units,
        reorder_level,
        storage_cost_per_unit: parse_number(cell(map.cost)),
        last_restocked_date,
        extra: schema
            .passthrough()
            .iter()
            .map(|&idx| cell(idx).to_string())
            .collect(),
    })
}

/// Cell `idx` of `row`; short rows read as blank.
fn cell_at(row: &StringRecord, idx: usize) -> &str {
    row.get(idx).unwrap_or("")
}

/// Parse a numeric cell. Blank, non-numeric and NaN cells are absent.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Lenient date parser: plain dates, datetimes and RFC 3339 timestamps.
/// Anything else is `None`, never an error.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
