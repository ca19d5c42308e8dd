//! Progress statistics read from the CSV stores
//!
//! This module provides functionality for measuring how far each category
//! has progressed through the pipeline, and for displaying it.

use crate::crawler::{remaining_work, PipelineReport};
use crate::site::Category;
use crate::store::{
    CsvStore, StorePaths, HARVESTED_PAGE_COLUMN, LISTING_URL_COLUMN, PAGE_URL_COLUMN,
};
use crate::Result;
use std::collections::HashSet;

/// Progress of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStatistics {
    pub category: Category,

    /// Page URLs waiting in the progress file of an interrupted harvest
    pub pending_pages: usize,

    /// Distinct search pages present in the harvest store
    pub harvested_pages: usize,

    /// Distinct listing URLs present in the harvest store
    pub listing_urls: usize,

    /// Distinct listings present in the dataset
    pub scraped_listings: usize,

    /// Harvested listing URLs not yet in the dataset
    pub remaining_listings: usize,
}

/// Loads statistics for one category from its stores
///
/// # Arguments
///
/// * `store` - Store used to read the files
/// * `paths` - Locations of the category's files
/// * `category` - Category to measure
///
/// # Returns
///
/// * `Ok(CategoryStatistics)` - Counts; absent files count as empty
/// * `Err(ScraperError)` - A file exists but could not be read
pub fn load_statistics(
    store: &CsvStore,
    paths: &StorePaths,
    category: Category,
) -> Result<CategoryStatistics> {
    let pending: HashSet<String> = store.read_keys(&paths.page_urls(category), PAGE_URL_COLUMN)?;
    let harvested = store.read_keys(&paths.listing_urls(category), HARVESTED_PAGE_COLUMN)?;
    let listing_urls: Vec<String> = store
        .read_keys(&paths.listing_urls(category), LISTING_URL_COLUMN)?
        .into_iter()
        .collect();
    let scraped = store.read_keys(&paths.listings(category), LISTING_URL_COLUMN)?;

    Ok(CategoryStatistics {
        category,
        pending_pages: pending.len(),
        harvested_pages: harvested.len(),
        listing_urls: listing_urls.len(),
        scraped_listings: scraped.len(),
        remaining_listings: remaining_work(&listing_urls, &scraped).len(),
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &[CategoryStatistics]) {
    println!("=== Scrape Statistics ===\n");

    for entry in stats {
        println!("{} ({}):", entry.category.label(), entry.category.slug());
        println!("  Pending search pages: {}", entry.pending_pages);
        println!("  Harvested search pages: {}", entry.harvested_pages);
        println!("  Listing URLs: {}", entry.listing_urls);
        println!("  Scraped listings: {}", entry.scraped_listings);

        let completion = if entry.listing_urls > 0 {
            (entry.listing_urls - entry.remaining_listings) as f64 / entry.listing_urls as f64
                * 100.0
        } else {
            0.0
        };
        println!(
            "  Remaining listings: {} ({:.1}% complete)",
            entry.remaining_listings, completion
        );
        println!();
    }
}

/// Prints the per-stage outcome of a finished run
pub fn print_run_summary(category: Category, report: &PipelineReport) {
    println!("=== Run Summary: {} ===", category.slug());
    if let Some(harvest) = report.harvest {
        println!("  Harvest: {}", harvest);
    }
    if let Some(scrape) = report.scrape {
        println!("  Scrape: {}", scrape);
    }
}
