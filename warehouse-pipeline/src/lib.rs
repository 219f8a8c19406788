//! Warehouse inventory optimization pipeline.
//!
//! Load a CSV inventory, resolve its columns, classify every row's stock
//! level, filter by warehouse and category, and summarize the result for
//! a report.
//!
//! ```text
//! inventory_loader -> columns -> metrics -> filter -> aggregator -> report
//! ```
//!
//! [`dataset::Dataset`] ties the first three stages together and owns the
//! enriched rows; filtering and aggregation borrow from it.

pub mod aggregator;
pub mod columns;
pub mod components;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod inventory_loader;
pub mod metrics;
pub mod report;
pub mod types;
pub mod util;

pub use aggregator::{summarize, Summary};
pub use columns::{OutputColumn, Role, Schema};
pub use dataset::{Dataset, DatasetCache};
pub use error::{ExportError, LoadError, ResolutionError};
pub use filter::{filter_inventory, FilteredView};
pub use metrics::{classify, DeriveConfig};
pub use report::{build_report, Report};
pub use types::{EnrichedRecord, FilterQuery, InventoryRecord, StockStatus};
