//! Products domain module.
//!
//! This crate contains the catalog record type and the query processor that derives
//! filtered, paginated and aggregated views over a catalog snapshot. Everything here
//! is deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;
pub mod query;
pub mod stats;

#[cfg(test)]
mod test_support;

pub use product::{seed_catalog, Product, ProductDraft};
pub use query::{
    list_products, name_matches, paginate, search_by_name, CategoryFilter, ListQuery, PageMetadata,
    Paginated, Pagination,
};
pub use stats::CatalogStats;
