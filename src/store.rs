//! # Catalog Store
//!
//! Owns the aggregated product collections across all loaded sources,
//! keyed by source key and category path, together with each source's
//! taxonomy index.
//!
//! The store is built once at load time and never mutated afterwards, so a
//! single instance behind an `Arc` can be read from any number of handler
//! tasks without locking.

use crate::catalog_config::{CatalogConfig, UNIFIED_SOURCE_KEY};
use crate::catalog_model::{CategoryPath, Product};
use crate::ingest::{self, IngestError, IngestOutcome};
use crate::taxonomy::Taxonomy;
use log::{info, warn};
use std::collections::BTreeMap;

/// How loaded sources are organized for querying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreMode {
    /// Each source browsable in isolation under its own key
    #[default]
    PerSource,
    /// All sources fused into one browsing collection under the synthetic
    /// key [`UNIFIED_SOURCE_KEY`]
    Unified,
}

/// Products and taxonomy for one browsable collection
#[derive(Debug, Clone, Default)]
struct SourceCatalog {
    by_path: BTreeMap<CategoryPath, Vec<Product>>,
    taxonomy: Taxonomy,
    rejected: usize,
}

impl SourceCatalog {
    fn from_products(products: Vec<Product>, rejected: usize) -> Self {
        let taxonomy = Taxonomy::build(&products);
        let mut by_path: BTreeMap<CategoryPath, Vec<Product>> = BTreeMap::new();
        for product in products {
            by_path
                .entry(product.category_path.clone())
                .or_default()
                .push(product);
        }
        Self {
            by_path,
            taxonomy,
            rejected,
        }
    }
}

/// Immutable aggregate of all loaded sources
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    catalogs: BTreeMap<String, SourceCatalog>,
    mode: StoreMode,
}

impl CatalogStore {
    /// Load every configured source from disk.
    ///
    /// A source that fails to load is reported in the returned error list
    /// and skipped; the remaining sources still load. Row-level rejects are
    /// only logged and kept as per-source counters.
    pub fn load(config: &CatalogConfig, mode: StoreMode) -> (Self, Vec<IngestError>) {
        let mut outcomes = Vec::new();
        let mut failures = Vec::new();

        for spec in &config.sources {
            let path = config.source_path(spec);
            match ingest::ingest_file(&path, &spec.key) {
                Ok(outcome) => {
                    info!(
                        "Loaded source '{}': {} products ({} rows rejected)",
                        spec.key,
                        outcome.products.len(),
                        outcome.rejected
                    );
                    outcomes.push((spec.key.clone(), outcome));
                }
                Err(e) => {
                    warn!("Skipping source: {e}");
                    failures.push(e);
                }
            }
        }

        (Self::from_outcomes(outcomes, mode), failures)
    }

    /// Build a store from already-ingested sources
    pub fn from_outcomes(outcomes: Vec<(String, IngestOutcome)>, mode: StoreMode) -> Self {
        let mut catalogs = BTreeMap::new();
        match mode {
            StoreMode::PerSource => {
                for (key, outcome) in outcomes {
                    catalogs.insert(
                        key,
                        SourceCatalog::from_products(outcome.products, outcome.rejected),
                    );
                }
            }
            StoreMode::Unified => {
                let mut products = Vec::new();
                let mut rejected = 0;
                for (_, outcome) in outcomes {
                    products.extend(outcome.products);
                    rejected += outcome.rejected;
                }
                catalogs.insert(
                    UNIFIED_SOURCE_KEY.to_string(),
                    SourceCatalog::from_products(products, rejected),
                );
            }
        }
        Self { catalogs, mode }
    }

    /// Construction mode this store was loaded with
    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    /// Ordered enumeration of the browsable source keys
    pub fn sources(&self) -> Vec<&str> {
        self.catalogs.keys().map(String::as_str).collect()
    }

    /// Whether a source key is queryable in this store
    pub fn contains_source(&self, source_key: &str) -> bool {
        self.catalogs.contains_key(source_key)
    }

    /// Products at exactly `path` within one source; empty when nothing
    /// matches, never an error
    pub fn products_for(&self, source_key: &str, path: &CategoryPath) -> &[Product] {
        self.catalogs
            .get(source_key)
            .and_then(|catalog| catalog.by_path.get(path))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Products at `path` aggregated across several sources, in the order
    /// the keys are given
    pub fn all_products_across<'a>(
        &'a self,
        source_keys: &[&str],
        path: &CategoryPath,
    ) -> Vec<&'a Product> {
        source_keys
            .iter()
            .flat_map(|key| self.products_for(key, path).iter())
            .collect()
    }

    /// Taxonomy index for one source
    pub fn taxonomy(&self, source_key: &str) -> Option<&Taxonomy> {
        self.catalogs.get(source_key).map(|catalog| &catalog.taxonomy)
    }

    /// Diagnostic counter of rows rejected while ingesting one source
    pub fn rejected_rows(&self, source_key: &str) -> Option<usize> {
        self.catalogs.get(source_key).map(|catalog| catalog.rejected)
    }
}
