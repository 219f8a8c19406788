use crate::filter::{Filter, FilterResult};
use crate::types::{EnrichedRecord, FilterQuery};

/// Keeps records whose warehouse id is one of the selected warehouses.
///
/// Disabled when no warehouse is selected, so an empty selection passes
/// every record through.
pub struct WarehouseFilter;

impl<'a> Filter<FilterQuery, &'a EnrichedRecord> for WarehouseFilter {
    fn enable(&self, query: &FilterQuery) -> bool {
        !query.warehouses.is_empty()
    }

    fn filter(
        &self,
        query: &FilterQuery,
        candidates: Vec<&'a EnrichedRecord>,
    ) -> FilterResult<&'a EnrichedRecord> {
        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|r| query.warehouses.contains(&r.warehouse_id));

        FilterResult { kept, removed }
    }
}
