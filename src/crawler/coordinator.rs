//! Pipeline coordinator - runs the stages of one category in order
//!
//! The coordinator owns the shared crawl context and drives:
//! - the harvest stage (with discovery on first run)
//! - the scrape stage
//!
//! Each stage drains every task it dispatched before the next one starts.

use crate::config::Config;
use crate::crawler::context::CrawlContext;
use crate::crawler::harvest::harvest_listing_urls;
use crate::crawler::pool::StageStats;
use crate::crawler::scrape::scrape_listings;
use crate::prompt::Operator;
use crate::site::Category;
use crate::Result;
use std::sync::Arc;
use std::time::Instant;

/// Which stages a run executes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Stage {
    /// Harvest listing URLs, then scrape them
    #[default]
    All,
    /// Only discover pages and harvest listing URLs
    Harvest,
    /// Only scrape listing URLs harvested earlier
    Scrape,
}

impl Stage {
    fn includes_harvest(self) -> bool {
        matches!(self, Self::All | Self::Harvest)
    }

    fn includes_scrape(self) -> bool {
        matches!(self, Self::All | Self::Scrape)
    }
}

/// Per-stage outcome of a pipeline run; `None` for stages not run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub harvest: Option<StageStats>,
    pub scrape: Option<StageStats>,
}

/// Main pipeline coordinator structure
pub struct Coordinator {
    ctx: Arc<CrawlContext>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated scraper configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScraperError)` - Failed to build the client or create the
    ///   data directories
    pub fn new(config: Config) -> Result<Self> {
        let ctx = CrawlContext::new(config)?;
        ctx.paths.ensure_dirs()?;
        Ok(Self { ctx })
    }

    /// Runs the selected stages for one category
    pub async fn run(
        &self,
        category: Category,
        stage: Stage,
        operator: &mut dyn Operator,
    ) -> Result<PipelineReport> {
        let start_time = Instant::now();
        let mut report = PipelineReport::default();

        tracing::info!("Property {}: starting {:?} run", category, stage);

        if stage.includes_harvest() {
            report.harvest = Some(harvest_listing_urls(&self.ctx, category, operator).await?);
        }

        if stage.includes_scrape() {
            report.scrape = Some(scrape_listings(&self.ctx, category).await?);
        }

        tracing::info!(
            "Property {}: run finished in {:.1}s",
            category,
            start_time.elapsed().as_secs_f64()
        );
        Ok(report)
    }
}

/// Runs a complete pipeline for one category
///
/// This is the main entry point. It will:
/// 1. Build the HTTP client and compiled selectors
/// 2. Create the input and output directories
/// 3. Discover search pages if no page-URL file is pending
/// 4. Harvest listing URLs from every page not yet harvested
/// 5. Scrape every listing not yet in the dataset
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `category` - Category to work on
/// * `stage` - Stages to execute
/// * `operator` - Answers page-count and passcode questions
pub async fn run_pipeline(
    config: Config,
    category: Category,
    stage: Stage,
    operator: &mut dyn Operator,
) -> Result<PipelineReport> {
    Coordinator::new(config)?
        .run(category, stage, operator)
        .await
}
