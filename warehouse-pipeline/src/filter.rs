use std::ops::Deref;

use crate::components::category_filter::CategoryFilter;
use crate::components::warehouse_filter::WarehouseFilter;
use crate::types::{EnrichedRecord, FilterQuery};
use crate::util;

/// Result of a filter operation, partitioning candidates into kept and removed.
pub struct FilterResult<C> {
    pub kept: Vec<C>,
    pub removed: Vec<C>,
}

/// Filters run sequentially and partition candidates into kept and removed sets.
pub trait Filter<Q, C>: Send + Sync {
    /// Decide if this filter should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Filter candidates by evaluating each against some criteria.
    /// Returns a FilterResult containing kept candidates (which continue
    /// to the next stage) and removed candidates (which are excluded
    /// from further processing). Relative order is preserved.
    fn filter(&self, query: &Q, candidates: Vec<C>) -> FilterResult<C>;

    /// Returns a stable name for logging/metrics.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}

/// Read-only projection over enriched records, borrowed from the dataset.
#[derive(Clone, Debug, Default)]
pub struct FilteredView<'a> {
    rows: Vec<&'a EnrichedRecord>,
}

impl<'a> FilteredView<'a> {
    /// A view over every record, in order.
    pub fn all(records: &'a [EnrichedRecord]) -> Self {
        Self {
            rows: records.iter().collect(),
        }
    }

    pub fn rows(&self) -> &[&'a EnrichedRecord] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a EnrichedRecord> + '_ {
        self.rows.iter().copied()
    }
}

impl<'a> Deref for FilteredView<'a> {
    type Target = [&'a EnrichedRecord];

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}

impl<'a> FromIterator<&'a EnrichedRecord> for FilteredView<'a> {
    fn from_iter<I: IntoIterator<Item = &'a EnrichedRecord>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Apply the warehouse and category filters. Selections within one
/// dimension are OR'd, dimensions are AND'd, and an empty selection
/// passes everything through.
pub fn filter_inventory<'a>(records: &'a [EnrichedRecord], query: &FilterQuery) -> FilteredView<'a> {
    let filters: [&dyn Filter<FilterQuery, &'a EnrichedRecord>; 2] =
        [&WarehouseFilter, &CategoryFilter];

    let mut candidates: Vec<&'a EnrichedRecord> = records.iter().collect();
    for filter in filters {
        if !filter.enable(query) {
            continue;
        }
        let FilterResult { kept, removed } = filter.filter(query, candidates);
        log::debug!("filter={} kept={} removed={}", filter.name(), kept.len(), removed.len());
        candidates = kept;
    }
    FilteredView { rows: candidates }
}
