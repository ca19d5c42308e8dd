//! Configuration module for the scraper
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. A `Config` is built once at startup and handed to every component
//! that needs the origin, worker counts, storage directories or the
//! page-count passcode.
//!
//! # Example
//!
//! ```no_run
//! use sreality_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Scraping {}", config.site.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AccessConfig, Config, HarvestConfig, HttpConfig, ScrapeConfig, SiteConfig, StorageConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
