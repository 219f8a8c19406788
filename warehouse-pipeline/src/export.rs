//! CSV export of a filtered view.
//!
//! Source columns are written back under their normalized names and in
//! source order, followed by the derived columns. Reloading the file
//! through the loader yields the same scalar values.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::columns::{OutputColumn, Role, Schema, DERIVED_COLUMNS};
use crate::error::ExportError;
use crate::filter::FilteredView;
use crate::types::EnrichedRecord;

/// File name offered for the download.
pub const EXPORT_FILE_NAME: &str = "optimized_warehouse_data.csv";

const DATE_FORMAT: &str = "%Y-%m-%d";

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn role_value(record: &EnrichedRecord, role: Role) -> String {
    match role {
        Role::Warehouse => record.warehouse_id.clone(),
        Role::Location => record.location.clone(),
        Role::Category => record.product_category.clone(),
        Role::StockLevel => record.current_stock_units.to_string(),
        Role::ReorderLevel => record.reorder_level.to_string(),
        Role::Cost => number(record.storage_cost_per_unit),
        Role::RestockDate => record
            .last_restocked_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
    }
}

/// Write `view` as CSV to any writer.
pub fn write_csv<W: Write>(writer: W, schema: &Schema, view: &FilteredView<'_>) -> Result<(), ExportError> {
    let cells: Vec<OutputColumn> = schema.output_columns().map(|(cell, _)| cell).collect();
    let mut csv_writer = csv::Writer::from_writer(writer);

    let header = schema
        .output_columns()
        .map(|(_, name)| name)
        .chain(DERIVED_COLUMNS);
    csv_writer.write_record(header)?;

    for record in view.iter() {
        let mut row: Vec<String> = cells
            .iter()
            .map(|cell| match cell {
                OutputColumn::Role(role) => role_value(record, *role),
                OutputColumn::Passthrough(pos) => record.extra.get(*pos).cloned().unwrap_or_default(),
            })
            .collect();
        row.push(record.status().to_string());
        row.push(
            record
                .days_since_restock()
                .map(|d| d.to_string())
                .unwrap_or_default(),
        );
        row.push(record.excess_stock().to_string());
        row.push(record.potential_savings().to_string());
        row.push(number(record.total_storage_cost()));
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Serialize `view` to CSV bytes, as handed to a download.
pub fn to_csv_bytes(schema: &Schema, view: &FilteredView<'_>) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, schema, view)?;
    Ok(buf)
}

/// Write `view` to a CSV file at `path`.
pub fn export_csv_file<P: AsRef<Path>>(
    path: P,
    schema: &Schema,
    view: &FilteredView<'_>,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(file, schema, view)?;
    log::info!("path={} exported {} rows", path.display(), view.len());
    Ok(())
}
