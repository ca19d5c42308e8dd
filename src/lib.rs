//! sreality-scraper: an incremental listing harvester for sreality.cz
//!
//! This crate discovers paginated category search results, harvests the
//! listing detail URLs found on them and scrapes every listing into a CSV
//! dataset. Every stage persists its progress so an interrupted run resumes
//! where it stopped.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod prompt;
pub mod site;
pub mod store;

use thiserror::Error;

/// Main error type for scraper operations
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Page request rejected: {0}")]
    PageRequest(#[from] PageRequestError),

    #[error("Unknown category: {0}")]
    InvalidCategory(String),

    #[error("Missing element '{element}' on {url}")]
    MissingElement { url: String, element: &'static str },

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Reasons an operator's page-count request is refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageRequestError {
    #[error("'{0}' is not a valid page count")]
    NotANumber(String),

    #[error("must scrape at least 1 page, got {0}")]
    BelowMinimum(i64),

    #[error("more than {limit} pages requires a passcode")]
    PasscodeRequired { limit: u32 },

    #[error("invalid passcode")]
    InvalidPasscode,
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_pipeline, PipelineReport, Stage};
pub use site::Category;
pub use store::CsvStore;
