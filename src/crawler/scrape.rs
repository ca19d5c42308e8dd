//! Listing detail scrape stage
//!
//! Turns every harvested listing URL not yet present in the category's
//! dataset into one [`ListingRecord`].

use crate::config::SiteConfig;
use crate::crawler::context::CrawlContext;
use crate::crawler::pool::{run_bounded, StageStats};
use crate::crawler::resume::remaining_work;
use crate::extract::{
    format_price, parse_area, parse_construction, parse_location, resolve_link, FieldExtractor,
    SiteMarkup,
};
use crate::site::Category;
use crate::store::{ListingRecord, LISTING_URL_COLUMN};
use crate::{Result, ScraperError};
use chrono::{SecondsFormat, Utc};
use scraper::Html;
use std::sync::Arc;
use url::Url;

const AREA_UNIT: &str = "SQMT";

/// Parameter-table labels
const PRICE_LABELS: &[&str] = &["Celková cena:", "Cena:"];
const PRICE_NOTE: &str = "Poznámka k ceně:";
const AMENITIES: &str = "Příslušenství:";
const ENERGY_INTENSITY: &str = "Energetická náročnost:";
const CONSTRUCTION: &str = "Stavba:";
const INFRASTRUCTURE: &str = "Infrastruktura:";
const LOCALITY: &str = "Lokalita:";
const OWNERSHIP: &str = "Vlastnictví:";
const AREA: &str = "Plocha:";

/// Runs the scrape stage for one category
///
/// Normalizes the existing dataset first so duplicate and broken rows left
/// by an interrupted run do not count as done.
pub async fn scrape_listings(ctx: &Arc<CrawlContext>, category: Category) -> Result<StageStats> {
    let listing_urls = ctx
        .store
        .read_column(&ctx.paths.listing_urls(category), LISTING_URL_COLUMN)?;
    let output = ctx.paths.listings(category);

    if ctx.store.exists(&output) {
        let report = ctx.store.normalize(&output, LISTING_URL_COLUMN)?;
        tracing::info!("Property {}: normalized {}: {}", category, output.display(), report);
    }

    let scraped = ctx.store.read_keys(&output, LISTING_URL_COLUMN)?;
    let remaining = remaining_work(&listing_urls, &scraped);

    tracing::info!(
        "Property {}: {} listings to scrape ({} already scraped)",
        category,
        remaining.len(),
        scraped.len()
    );

    let worker_ctx = Arc::clone(ctx);
    let stats = run_bounded(
        "scrape",
        remaining,
        ctx.config.scrape.workers as usize,
        move |listing_url| {
            let ctx = Arc::clone(&worker_ctx);
            async move { scrape_listing(&ctx, category, &listing_url).await }
        },
    )
    .await;

    tracing::info!("Property {}: scrape finished: {}", category, stats);
    Ok(stats)
}

async fn scrape_listing(ctx: &CrawlContext, category: Category, listing_url: &str) -> Result<()> {
    let body = ctx.fetch(listing_url).await?;

    let record = {
        let document = Html::parse_document(&body);
        build_listing_record(&ctx.markup, &ctx.config.site, category, listing_url, &document)?
    };

    ctx.store.append_one(&ctx.paths.listings(category), &record)?;
    tracing::info!("Property {}: scraped listing {}", category, listing_url);
    Ok(())
}

/// Assembles the dataset row for one listing page
///
/// # Arguments
///
/// * `markup` - Compiled extractors
/// * `site` - Site constants copied into every record
/// * `category` - Category the listing was harvested under
/// * `listing_url` - URL the page was fetched from; relative links resolve
///   against it
/// * `document` - Parsed listing page
///
/// # Returns
///
/// * `Ok(ListingRecord)` - Every field found, missing ones left empty
/// * `Err(ScraperError::MissingElement)` - The page has no `h1`
pub fn build_listing_record(
    markup: &SiteMarkup,
    site: &SiteConfig,
    category: Category,
    listing_url: &str,
    document: &Html,
) -> Result<ListingRecord> {
    let heading = markup
        .heading
        .extract(document)
        .ok_or_else(|| ScraperError::MissingElement {
            url: listing_url.to_string(),
            element: "h1",
        })?;
    let page_url = Url::parse(listing_url)?;

    let location = heading
        .location
        .as_deref()
        .map(parse_location)
        .unwrap_or_default();

    let params = markup.parameters.extract(document);
    let area = params
        .get(AREA)
        .map(|text| parse_area(&text))
        .unwrap_or_default();
    let construction = params.get(CONSTRUCTION);
    let construction_parts = construction
        .as_deref()
        .map(parse_construction)
        .unwrap_or_default();
    let price = params
        .first_of(PRICE_LABELS)
        .map(|text| format_price(&text))
        .filter(|price| !price.is_empty());

    let dates = markup.footer.extract(document);
    let agent = markup.agent.extract(document);
    let resolve = |href: Option<String>| href.and_then(|href| resolve_link(&href, &page_url));

    Ok(ListingRecord {
        website_name: site.base_url.clone(),
        listing_title: heading.title,
        listing_description: markup.description.extract(document),
        property_type: category.slug().to_string(),
        country_code: site.country_code,
        location_description: params.get(LOCALITY),
        location_long: heading.location,
        location_city: location.city,
        location_region: location.district,
        location_street: location.street,
        area_unit: AREA_UNIT,
        total_area: area.total,
        usable_area: area.usable,
        built_up_area: area.built_up,
        amenities_list: params.get(AMENITIES),
        energy_intensity: params.get(ENERGY_INTENSITY),
        ownership: params.get(OWNERSHIP),
        infrastructure: params.get(INFRASTRUCTURE),
        construction,
        construction_type: construction_parts.kind,
        construction_status: construction_parts.status,
        floor_location: construction_parts.floor,
        listing_date: dates.inserted,
        listing_date_updated: dates.updated,
        currency_code: site.currency_code.clone(),
        price,
        note_on_price: params.get(PRICE_NOTE),
        agent_name: agent.name,
        agent_url: resolve(agent.profile_href),
        agent_website: resolve(agent.website_href),
        agent_email: agent.contacts.email,
        agent_phone1: agent.contacts.phone1,
        agent_phone2: agent.contacts.phone2,
        image_url: resolve(markup.image.extract(document)),
        listing_url: listing_url.to_string(),
        scraped_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}
