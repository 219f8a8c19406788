use crate::filter::{Filter, FilterResult};
use crate::types::{EnrichedRecord, FilterQuery};

/// Keeps records whose product category is one of the selected categories.
pub struct CategoryFilter;

impl<'a> Filter<FilterQuery, &'a EnrichedRecord> for CategoryFilter {
    fn enable(&self, query: &FilterQuery) -> bool {
        !query.categories.is_empty()
    }

    fn filter(
        &self,
        query: &FilterQuery,
        candidates: Vec<&'a EnrichedRecord>,
    ) -> FilterResult<&'a EnrichedRecord> {
        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|r| query.categories.contains(&r.product_category));

        FilterResult { kept, removed }
    }
}
