//! # Query Facade
//!
//! The single entry point the presentation layer calls: source enumeration,
//! category listing, subcategory listing, and top-deals retrieval. External
//! identifiers (source key, raw category string) are translated here into
//! catalog store lookups.
//!
//! Every operation is a pure read over the immutable store; concurrent
//! callers need no synchronization.

use crate::catalog_config::{DEFAULT_ITEMS_PER_PAGE, MAX_DEALS_LIMIT};
use crate::catalog_model::{CategoryPath, Product};
use crate::ranking::top_deals;
use crate::store::CatalogStore;
use std::sync::Arc;

/// Errors a facade query can return
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The referenced source key was never loaded
    UnknownSource(String),
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::UnknownSource(key) => write!(f, "Unknown source: {key}"),
        }
    }
}

impl std::error::Error for QueryError {}

/// Read-only query interface over a loaded catalog store
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    store: Arc<CatalogStore>,
}

impl CatalogQuery {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    /// Ordered source keys, used to build the initial menu
    pub fn sources(&self) -> Vec<String> {
        self.store.sources().into_iter().map(String::from).collect()
    }

    /// Top-level categories of one source, sorted lexicographically
    pub fn main_categories(&self, source_key: &str) -> Result<Vec<String>, QueryError> {
        self.taxonomy_for(source_key)
            .map(|taxonomy| taxonomy.level_one())
    }

    /// Immediate child categories under `parent_category` (a raw category
    /// string like `"Electronics"` or `"Electronics > Mobiles"`).
    ///
    /// An empty listing is the normal answer for a leaf or unknown parent;
    /// only an unknown source is an error.
    pub fn subcategories(
        &self,
        source_key: &str,
        parent_category: &str,
    ) -> Result<Vec<String>, QueryError> {
        let parent = CategoryPath::parse(parent_category);
        self.taxonomy_for(source_key)
            .map(|taxonomy| taxonomy.children_of(parent.segments()))
    }

    /// Top deals for a category node, discount descending.
    ///
    /// `limit` defaults to the presentation page size and is bounded to
    /// [`MAX_DEALS_LIMIT`]. A category with no products yields an empty
    /// vector, not an error.
    pub fn top_deals(
        &self,
        source_key: &str,
        category: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Product>, QueryError> {
        if !self.store.contains_source(source_key) {
            return Err(QueryError::UnknownSource(source_key.to_string()));
        }

        let limit = limit
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
            .clamp(1, MAX_DEALS_LIMIT);
        let path = CategoryPath::parse(category);
        let products = self.store.products_for(source_key, &path);
        Ok(top_deals(products, limit))
    }

    fn taxonomy_for(&self, source_key: &str) -> Result<&crate::taxonomy::Taxonomy, QueryError> {
        self.store
            .taxonomy(source_key)
            .ok_or_else(|| QueryError::UnknownSource(source_key.to_string()))
    }
}
