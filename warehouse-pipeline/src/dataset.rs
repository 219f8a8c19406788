//! The loaded, enriched dataset and its reload lifecycle.
//!
//! A [`Dataset`] is built once per source and never mutated afterwards.
//! Callers share it behind an `Arc` and take independent
//! [`FilteredView`]s of it per request. [`DatasetCache`] owns the
//! "reload on source change, else reuse" policy.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{Local, NaiveDate};

use crate::columns::Schema;
use crate::error::{LoadError, LoadResult};
use crate::filter::{filter_inventory, FilteredView};
use crate::inventory_loader::{load_inventory, load_inventory_file, LoadedInventory};
use crate::metrics::{derive, DeriveConfig};
use crate::types::{EnrichedRecord, FilterQuery};
use crate::util;

/// The local calendar date, used as the default evaluation date.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Clone, Debug)]
pub struct Dataset {
    schema: Schema,
    records: Vec<EnrichedRecord>,
    dropped_rows: usize,
    invalid_dates: usize,
    evaluated_on: NaiveDate,
    config: DeriveConfig,
}

impl Dataset {
    /// Run the metric pass over a load result. This is the only place
    /// derived fields are computed.
    pub fn from_loaded(loaded: LoadedInventory, today: NaiveDate, config: DeriveConfig) -> Self {
        let LoadedInventory {
            schema,
            records,
            dropped_rows,
            invalid_dates,
        } = loaded;
        Self {
            schema,
            records: derive(records, today, &config),
            dropped_rows,
            invalid_dates,
            evaluated_on: today,
            config,
        }
    }

    /// Load and enrich from any CSV reader.
    pub fn load<R: Read>(reader: R, today: NaiveDate, config: DeriveConfig) -> LoadResult<Self> {
        Ok(Self::from_loaded(load_inventory(reader)?, today, config))
    }

    /// Load and enrich from a CSV file.
    pub fn open<P: AsRef<Path>>(path: P, today: NaiveDate, config: DeriveConfig) -> LoadResult<Self> {
        Ok(Self::from_loaded(load_inventory_file(path)?, today, config))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows excluded at load for a missing stock or reorder level.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn invalid_dates(&self) -> usize {
        self.invalid_dates
    }

    /// The date `days_since_restock` was computed against.
    pub fn evaluated_on(&self) -> NaiveDate {
        self.evaluated_on
    }

    pub fn config(&self) -> &DeriveConfig {
        &self.config
    }

    /// Borrow the records matching `query`.
    pub fn view(&self, query: &FilterQuery) -> FilteredView<'_> {
        filter_inventory(&self.records, query)
    }

    /// Distinct warehouse ids, sorted, for the warehouse selector.
    pub fn warehouse_options(&self) -> Vec<String> {
        util::sorted_distinct(self.records.iter().map(|r| r.warehouse_id.as_str()))
    }

    /// Distinct product categories, sorted, for the category selector.
    pub fn category_options(&self) -> Vec<String> {
        util::sorted_distinct(self.records.iter().map(|r| r.product_category.as_str()))
    }
}

struct CachedDataset {
    modified: Option<SystemTime>,
    dataset: Arc<Dataset>,
}

/// Process-lifetime cache of one source file.
///
/// The dataset is reloaded when the file's modification time changes or
/// when the evaluation date moves on; otherwise the same `Arc` is handed
/// out again.
pub struct DatasetCache {
    path: PathBuf,
    config: DeriveConfig,
    cached: Option<CachedDataset>,
}

impl DatasetCache {
    pub fn new<P: Into<PathBuf>>(path: P, config: DeriveConfig) -> Self {
        Self {
            path: path.into(),
            config,
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cached dataset, reloading it if the source changed.
    pub fn get(&mut self, today: NaiveDate) -> LoadResult<Arc<Dataset>> {
        let modified = fs::metadata(&self.path)
            .map_err(|source| LoadError::SourceUnreadable {
                path: self.path.clone(),
                source,
            })?
            .modified()
            .ok();

        if let Some(cached) = &self.cached {
            let fresh = modified.is_some()
                && cached.modified == modified
                && cached.dataset.evaluated_on() == today;
            if fresh {
                return Ok(Arc::clone(&cached.dataset));
            }
        }

        let dataset = Arc::new(Dataset::open(&self.path, today, self.config.clone())?);
        log::info!(
            "path={} loaded {} rows ({} dropped)",
            self.path.display(),
            dataset.len(),
            dataset.dropped_rows()
        );
        self.cached = Some(CachedDataset {
            modified,
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    /// Forget the cached dataset so the next `get` reloads.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
