pub mod category_filter;
pub mod warehouse_filter;
