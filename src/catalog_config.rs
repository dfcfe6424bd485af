//! # Catalog Configuration Module
//!
//! This module defines the configuration for catalog loading: where the
//! source CSV files live, which source keys map to which files, and the
//! paging limits the query layer applies.

use std::env;
use std::path::{Path, PathBuf};

// Constants for catalog configuration
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;
pub const MAX_DEALS_LIMIT: usize = 100; // Upper bound on any single deals response
pub const UNIFIED_SOURCE_KEY: &str = "all";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "CATALOG_DATA_DIR";

/// One source dataset: a stable key and the CSV file holding it
#[derive(Debug, Clone)]
pub struct SourceSpec {
    /// Identifier used in queries and commands (e.g. "electronics")
    pub key: String,
    /// File name relative to the data directory
    pub file: String,
}

impl SourceSpec {
    pub fn new(key: &str, file: &str) -> Self {
        Self {
            key: key.to_string(),
            file: file.to_string(),
        }
    }
}

/// Configuration structure for catalog loading and paging
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Directory containing the source CSV files
    pub data_dir: PathBuf,
    /// Sources to load, in menu order
    pub sources: Vec<SourceSpec>,
    /// Default page size for deal listings
    pub items_per_page: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            sources: vec![
                SourceSpec::new("books", "BOOKS.csv"),
                SourceSpec::new("electronics", "ELECTRONICS.csv"),
                SourceSpec::new("clothing", "CLOTHES.csv"),
                SourceSpec::new("beauty", "BEAUTY.csv"),
                SourceSpec::new("toys", "TOYS.csv"),
                SourceSpec::new("kitchen", "KITCHEN.csv"),
                SourceSpec::new("baby", "BABY.csv"),
                SourceSpec::new("computer", "COMPUTER.csv"),
                SourceSpec::new("health", "HEALTH.csv"),
                SourceSpec::new("jwellery", "JWELLERY.csv"),
                SourceSpec::new("movies", "MOVIES.csv"),
            ],
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl CatalogConfig {
    /// Default configuration with the data directory taken from the
    /// `CATALOG_DATA_DIR` environment variable when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = env::var(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        config
    }

    /// Absolute path of one source file
    pub fn source_path(&self, spec: &SourceSpec) -> PathBuf {
        Path::new(&self.data_dir).join(&spec.file)
    }
}
