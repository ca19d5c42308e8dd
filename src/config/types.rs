use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for the scraper
///
/// Every section is optional in the TOML file; omitted sections fall back to
/// the values that match the live site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Origin every search and listing URL is built from
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Numeric country code written into every listing record
    #[serde(rename = "country-code", default = "default_country_code")]
    pub country_code: u16,

    /// Currency code written into every listing record
    #[serde(rename = "currency-code", default = "default_currency_code")]
    pub currency_code: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            country_code: default_country_code(),
            currency_code: default_currency_code(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Listing-URL harvest stage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    /// Maximum number of search pages fetched at the same time
    #[serde(default = "default_harvest_workers")]
    pub workers: u32,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            workers: default_harvest_workers(),
        }
    }
}

/// Listing detail stage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Maximum number of listing pages fetched at the same time
    #[serde(default = "default_scrape_workers")]
    pub workers: u32,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            workers: default_scrape_workers(),
        }
    }
}

/// Where progress files and the final dataset live
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding page-URL and listing-URL progress files
    #[serde(rename = "input-dir", default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Directory holding the scraped listing datasets
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
        }
    }
}

/// Page-count gate
#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    /// Pages per sub-type that can be requested without a passcode
    #[serde(rename = "free-page-limit", default = "default_free_page_limit")]
    pub free_page_limit: u32,

    /// Shared secret unlocking larger page counts; unset means never unlocked
    #[serde(default)]
    pub passcode: Option<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            free_page_limit: default_free_page_limit(),
            passcode: None,
        }
    }
}

fn default_base_url() -> String {
    "https://www.sreality.cz".to_string()
}

fn default_country_code() -> u16 {
    203
}

fn default_currency_code() -> String {
    "CZK".to_string()
}

fn default_user_agent() -> String {
    format!("sreality-scraper/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_harvest_workers() -> u32 {
    30
}

fn default_scrape_workers() -> u32 {
    5
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("listings url")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_free_page_limit() -> u32 {
    5
}
