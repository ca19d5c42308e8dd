//! Page-URL discovery
//!
//! Probes page 1 of every sub-type of a category for its last page number,
//! asks the operator how many pages to take, and generates the search result
//! page URLs the harvest stage works through.

use crate::config::AccessConfig;
use crate::crawler::context::CrawlContext;
use crate::extract::FieldExtractor;
use crate::prompt::Operator;
use crate::site::{search_page_url, Category, SearchPage};
use crate::{PageRequestError, Result};
use scraper::Html;
use url::Url;

/// Last page number reported by one sub-type's first search page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubTypeProbe {
    pub sub_type: &'static str,
    pub last_page: u32,
}

/// Fetches page 1 of every sub-type and reads its pagination control
///
/// Sub-types whose page cannot be fetched or carries no usable pagination
/// are logged and left out.
pub async fn probe_sub_types(ctx: &CrawlContext, category: Category) -> Vec<SubTypeProbe> {
    let mut probes = Vec::new();

    for &sub_type in category.sub_types() {
        let url = match search_page_url(&ctx.base_url, &SearchPage::new(category, sub_type, 1)) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Property {}: bad search URL for {}: {}", category, sub_type, e);
                continue;
            }
        };

        let body = match ctx.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Property {}: skipping sub-type {}: {}", category, sub_type, e);
                continue;
            }
        };

        let last_page = {
            let document = Html::parse_document(&body);
            ctx.markup.pagination.extract(&document)
        };

        match last_page {
            Some(last_page) => {
                tracing::info!(
                    "Property {}: sub-type {} has {} pages",
                    category,
                    sub_type,
                    last_page
                );
                probes.push(SubTypeProbe {
                    sub_type,
                    last_page,
                });
            }
            None => tracing::warn!(
                "Property {}: no pagination found for sub-type {} at {}",
                category,
                sub_type,
                url
            ),
        }
    }

    probes
}

/// Validates the operator's page count against what is available
///
/// A count above `available` is clamped to it. A count above the free limit
/// needs the configured passcode; with no passcode configured such counts
/// are refused outright.
///
/// # Arguments
///
/// * `available` - Largest last-page number across all probed sub-types
/// * `access` - Free page limit and passcode
/// * `operator` - Source of the page count and passcode answers
///
/// # Returns
///
/// * `Ok(u32)` - Pages to take per sub-type, at least 1
/// * `Err(PageRequestError)` - The request is refused
pub fn resolve_page_count(
    available: u32,
    access: &AccessConfig,
    operator: &mut dyn Operator,
) -> std::result::Result<u32, PageRequestError> {
    let answer = operator.page_count(available);
    let answer = answer.trim();
    let requested: i64 = answer
        .parse()
        .map_err(|_| PageRequestError::NotANumber(answer.to_string()))?;

    let pages = if requested > i64::from(available) {
        tracing::info!(
            "Requested {} pages, only {} available; using {}",
            requested,
            available,
            available
        );
        available
    } else if requested < 1 {
        return Err(PageRequestError::BelowMinimum(requested));
    } else {
        requested as u32
    };

    if pages > access.free_page_limit {
        let limit = access.free_page_limit;
        let expected = access
            .passcode
            .as_deref()
            .ok_or(PageRequestError::PasscodeRequired { limit })?;

        let given = operator.passcode(limit);
        if given.trim().is_empty() {
            return Err(PageRequestError::PasscodeRequired { limit });
        }
        if given.trim() != expected.trim() {
            return Err(PageRequestError::InvalidPasscode);
        }
    }

    Ok(pages)
}

/// URLs for pages `1..=min(pages, last_page)` of every probed sub-type
pub fn generate_page_urls(
    base: &Url,
    category: Category,
    probes: &[SubTypeProbe],
    pages: u32,
) -> std::result::Result<Vec<String>, url::ParseError> {
    let mut urls = Vec::new();
    for probe in probes {
        let first = SearchPage::new(category, probe.sub_type, 1);
        for page in 1..=pages.min(probe.last_page) {
            urls.push(search_page_url(base, &first.with_page(page))?);
        }
    }
    Ok(urls)
}

/// Runs discovery end to end for one category
///
/// Returns an empty list, without asking the operator anything, when no
/// sub-type reports pagination.
pub async fn discover_page_urls(
    ctx: &CrawlContext,
    category: Category,
    operator: &mut dyn Operator,
) -> Result<Vec<String>> {
    let probes = probe_sub_types(ctx, category).await;

    let Some(available) = probes.iter().map(|probe| probe.last_page).max() else {
        tracing::warn!("Property {}: no sub-type reported pagination", category);
        return Ok(Vec::new());
    };

    let pages = resolve_page_count(available, &ctx.config.access, operator)?;
    let urls = generate_page_urls(&ctx.base_url, category, &probes, pages)?;

    tracing::info!(
        "Property {}: generated {} page URLs ({} pages across {} sub-types)",
        category,
        urls.len(),
        pages,
        probes.len()
    );
    Ok(urls)
}
