//! Store module for persisting crawl progress and scraped listings
//!
//! This module handles every file the pipeline reads or writes:
//! - the transient page-URL progress file of a category
//! - the durable listing-URL harvest store of a category
//! - the durable listing dataset of a category

mod csv_store;
mod records;
mod traits;

pub use csv_store::{CsvStore, NormalizeReport};
pub use records::{
    ListingRecord, ListingUrlRecord, PageUrlRecord, HARVESTED_PAGE_COLUMN, LISTING_URL_COLUMN,
    PAGE_URL_COLUMN,
};
pub use traits::{CsvRecord, StoreError, StoreResult};

use crate::config::StorageConfig;
use crate::site::Category;
use std::path::PathBuf;

/// File locations of every dataset, derived from the storage configuration
#[derive(Debug, Clone)]
pub struct StorePaths {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl StorePaths {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            input_dir: config.input_dir.clone(),
            output_dir: config.output_dir.clone(),
        }
    }

    /// Creates the input and output directories
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.input_dir)?;
        std::fs::create_dir_all(&self.output_dir)
    }

    /// `{input}/{category}_page_urls.csv`
    pub fn page_urls(&self, category: Category) -> PathBuf {
        self.input_dir
            .join(format!("{}_page_urls.csv", category.slug()))
    }

    /// `{input}/{category}_listing_urls.csv`
    pub fn listing_urls(&self, category: Category) -> PathBuf {
        self.input_dir
            .join(format!("{}_listing_urls.csv", category.slug()))
    }

    /// `{output}/{category}.csv`
    pub fn listings(&self, category: Category) -> PathBuf {
        self.output_dir.join(format!("{}.csv", category.slug()))
    }
}
