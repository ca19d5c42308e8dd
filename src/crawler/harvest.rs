//! Listing-URL harvest stage
//!
//! Works through the search result pages of a category and records every
//! listing detail link found on them. The page-URL progress file is created
//! by discovery on the first run and reused by later runs; pages already
//! present in the harvest store are not fetched again.

use crate::crawler::context::CrawlContext;
use crate::crawler::discovery::discover_page_urls;
use crate::crawler::pool::{run_bounded, StageStats};
use crate::crawler::resume::remaining_work;
use crate::extract::{resolve_link, FieldExtractor};
use crate::prompt::Operator;
use crate::site::Category;
use crate::store::{ListingUrlRecord, PageUrlRecord, HARVESTED_PAGE_COLUMN, PAGE_URL_COLUMN};
use crate::Result;
use scraper::Html;
use std::sync::Arc;
use url::Url;

/// Runs the harvest stage for one category
///
/// Removes the page-URL progress file once every dispatched page has been
/// processed, whether or not each page succeeded.
pub async fn harvest_listing_urls(
    ctx: &Arc<CrawlContext>,
    category: Category,
    operator: &mut dyn Operator,
) -> Result<StageStats> {
    let page_file = ctx.paths.page_urls(category);
    let listing_file = ctx.paths.listing_urls(category);

    if ctx.store.exists(&page_file) {
        tracing::info!(
            "Property {}: reusing page URLs from {}",
            category,
            page_file.display()
        );
    } else {
        let urls = discover_page_urls(ctx, category, operator).await?;
        let rows: Vec<PageUrlRecord> = urls
            .into_iter()
            .map(|property_page_url| PageUrlRecord { property_page_url })
            .collect();
        ctx.store.append_many(&page_file, &rows)?;
        tracing::info!(
            "Property {}: saved {} page URLs to {}",
            category,
            rows.len(),
            page_file.display()
        );
    }

    let page_urls = ctx.store.read_column(&page_file, PAGE_URL_COLUMN)?;
    let harvested = ctx.store.read_keys(&listing_file, HARVESTED_PAGE_COLUMN)?;
    let remaining = remaining_work(&page_urls, &harvested);

    tracing::info!(
        "Property {}: {} pages to harvest ({} already done)",
        category,
        remaining.len(),
        harvested.len()
    );

    let worker_ctx = Arc::clone(ctx);
    let stats = run_bounded(
        "harvest",
        remaining,
        ctx.config.harvest.workers as usize,
        move |page_url| {
            let ctx = Arc::clone(&worker_ctx);
            async move { harvest_page(&ctx, category, &page_url).await }
        },
    )
    .await;

    if ctx.store.remove(&page_file)? {
        tracing::debug!("Removed {}", page_file.display());
    }

    tracing::info!("Property {}: harvest finished: {}", category, stats);
    Ok(stats)
}

/// Fetches one search result page and appends its listing links
async fn harvest_page(ctx: &CrawlContext, category: Category, page_url: &str) -> Result<()> {
    let body = ctx.fetch(page_url).await?;

    let slots = {
        let document = Html::parse_document(&body);
        ctx.markup.results.extract(&document)
    };
    let rows = listing_rows(page_url, category, slots)?;

    let found = rows.iter().filter(|row| row.listing_url.is_some()).count();
    if found == 0 {
        tracing::warn!("Property {}: no listing links on {}", category, page_url);
    }

    ctx.store.append_many(&ctx.paths.listing_urls(category), &rows)?;
    tracing::info!(
        "Property {}: harvested {} listing URLs from {}",
        category,
        found,
        page_url
    );
    Ok(())
}

/// One row per result slot; a page without slots yields a single marker row
/// so it still counts as harvested
fn listing_rows(
    page_url: &str,
    category: Category,
    slots: Vec<Option<String>>,
) -> Result<Vec<ListingUrlRecord>> {
    let base = Url::parse(page_url)?;
    let row = |listing_url: Option<String>| ListingUrlRecord {
        page_url: page_url.to_string(),
        property_type: category.slug().to_string(),
        listing_url,
    };

    if slots.is_empty() {
        return Ok(vec![row(None)]);
    }

    Ok(slots
        .into_iter()
        .map(|href| row(href.and_then(|href| resolve_link(&href, &base))))
        .collect())
}
