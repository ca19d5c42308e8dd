//! Crawler module for the three pipeline stages
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching and error classification
//! - Page-URL discovery from the pagination of each sub-type
//! - Listing-URL harvest from search result pages
//! - Listing detail scrape
//! - Bounded worker pools and resume bookkeeping
//! - Overall pipeline coordination

mod context;
mod coordinator;
mod discovery;
mod fetcher;
mod harvest;
mod pool;
mod resume;
mod scrape;

pub use context::CrawlContext;
pub use coordinator::{run_pipeline, Coordinator, PipelineReport, Stage};
pub use discovery::{
    discover_page_urls, generate_page_urls, probe_sub_types, resolve_page_count, SubTypeProbe,
};
pub use fetcher::{build_http_client, fetch_page, FetchError};
pub use harvest::harvest_listing_urls;
pub use pool::{run_bounded, StageStats};
pub use resume::remaining_work;
pub use scrape::{build_listing_record, scrape_listings};
