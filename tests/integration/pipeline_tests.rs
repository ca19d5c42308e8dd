//! Harvest and scrape end to end, including resume after an interrupted run

use crate::common::*;
use sreality_scraper::crawler::{run_pipeline, Stage};
use sreality_scraper::prompt::Operator;
use sreality_scraper::store::{
    CsvRecord, ListingRecord, HARVESTED_PAGE_COLUMN, LISTING_URL_COLUMN,
};
use sreality_scraper::Category;
use std::fs;
use tempfile::TempDir;
use wiremock::MockServer;

/// Operator for runs that must not reach discovery
struct NoQuestions;

impl Operator for NoQuestions {
    fn page_count(&mut self, _available: u32) -> String {
        panic!("page count must not be asked when page URLs are pending");
    }

    fn passcode(&mut self, _limit: u32) -> String {
        panic!("passcode must not be asked when page URLs are pending");
    }
}

#[tokio::test]
async fn test_full_pipeline() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &dir);
    let paths = paths(&config);

    mount_search_page(
        &server,
        1,
        search_page(Some(2), &[Some("/detail/a"), Some("/detail/b")]),
        None,
    )
    .await;
    mount_search_page(&server, 2, search_page(Some(2), &[Some("/detail/c"), None]), Some(1)).await;
    mount_listing(&server, "/detail/a", 200, 1).await;
    mount_listing(&server, "/detail/b", 200, 1).await;
    mount_listing(&server, "/detail/c", 404, 1).await;

    let mut operator = ScriptedOperator::new("2", None);
    let report = run_pipeline(config, Category::Other, Stage::All, &mut operator)
        .await
        .unwrap();

    let harvest = report.harvest.unwrap();
    assert_eq!((harvest.succeeded, harvest.failed), (2, 0));
    let scrape = report.scrape.unwrap();
    assert_eq!((scrape.dispatched, scrape.succeeded, scrape.failed), (3, 2, 1));

    assert!(!paths.page_urls(Category::Other).exists());

    // Four slots harvested, one of them without a link
    let harvested = column(&paths.listing_urls(Category::Other), LISTING_URL_COLUMN);
    assert_eq!(harvested.len(), 4);
    assert_eq!(harvested.iter().filter(|url| url.is_empty()).count(), 1);

    let listings_file = paths.listings(Category::Other);
    let mut scraped = column(&listings_file, LISTING_URL_COLUMN);
    scraped.sort();
    assert_eq!(
        scraped,
        vec![
            format!("{}/detail/a", server.uri()),
            format!("{}/detail/b", server.uri()),
        ]
    );

    let prices = column(&listings_file, "price");
    assert!(prices.iter().all(|price| price == "450000"));
    let cities = column(&listings_file, "location_city");
    assert!(cities.iter().all(|city| city == "Praha 1"));
    let types = column(&listings_file, "property_type");
    assert!(types.iter().all(|t| t == "ostatni"));
}

#[tokio::test]
async fn test_scrape_resume_skips_scraped_listings() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &dir);
    let paths = paths(&config);
    paths.ensure_dirs().unwrap();

    let uri = server.uri();
    fs::write(
        paths.listing_urls(Category::Other),
        format!(
            "page_url,property_type,listing_url\n\
             {uri}/hledani/ostatni?strana=1,ostatni,{uri}/detail/a\n\
             {uri}/hledani/ostatni?strana=1,ostatni,{uri}/detail/b\n\
             {uri}/hledani/ostatni?strana=1,ostatni,\n\
             {uri}/hledani/ostatni?strana=2,ostatni,{uri}/detail/c\n"
        ),
    )
    .unwrap();

    // An interrupted run left a duplicate, an empty row and a torn row behind
    let headers = ListingRecord::HEADERS.join(",");
    let width = ListingRecord::HEADERS.len();
    let row = |listing_url: &str| {
        let mut fields = vec![String::new(); width];
        fields[0] = uri.clone();
        fields[width - 2] = listing_url.to_string();
        fields.join(",")
    };
    fs::write(
        paths.listings(Category::Other),
        format!(
            "{}\n{}\n{}\n{}\n{}\n",
            headers,
            row(&format!("{uri}/detail/a")),
            row(&format!("{uri}/detail/a")),
            ",".repeat(width - 1),
            "torn,row"
        ),
    )
    .unwrap();

    mount_listing(&server, "/detail/a", 200, 0).await;
    mount_listing(&server, "/detail/b", 200, 1).await;
    mount_listing(&server, "/detail/c", 200, 1).await;

    let report = run_pipeline(config, Category::Other, Stage::Scrape, &mut NoQuestions)
        .await
        .unwrap();

    assert!(report.harvest.is_none());
    let scrape = report.scrape.unwrap();
    assert_eq!((scrape.dispatched, scrape.succeeded), (2, 2));

    let mut scraped = column(&paths.listings(Category::Other), LISTING_URL_COLUMN);
    scraped.sort();
    assert_eq!(
        scraped,
        vec![
            format!("{uri}/detail/a"),
            format!("{uri}/detail/b"),
            format!("{uri}/detail/c"),
        ]
    );
}

#[tokio::test]
async fn test_harvest_resume_skips_harvested_pages() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &dir);
    let paths = paths(&config);
    paths.ensure_dirs().unwrap();

    let uri = server.uri();
    fs::write(
        paths.page_urls(Category::Other),
        format!(
            "property_page_url\n\
             {uri}/hledani/ostatni?strana=1\n\
             {uri}/hledani/ostatni?strana=2\n\
             {uri}/hledani/ostatni?strana=3\n"
        ),
    )
    .unwrap();
    fs::write(
        paths.listing_urls(Category::Other),
        format!(
            "page_url,property_type,listing_url\n\
             {uri}/hledani/ostatni?strana=1,ostatni,{uri}/detail/a\n"
        ),
    )
    .unwrap();

    mount_search_page(&server, 1, search_page(Some(3), &[Some("/detail/a")]), Some(0)).await;
    mount_search_page(&server, 2, search_page(Some(3), &[Some("/detail/b")]), Some(1)).await;
    // Page 3 has no result slots at all
    mount_search_page(&server, 3, search_page(Some(3), &[]), Some(1)).await;

    let report = run_pipeline(config, Category::Other, Stage::Harvest, &mut NoQuestions)
        .await
        .unwrap();

    assert_eq!(report.harvest.unwrap().succeeded, 2);
    assert!(!paths.page_urls(Category::Other).exists());

    let pages = column(&paths.listing_urls(Category::Other), HARVESTED_PAGE_COLUMN);
    assert_eq!(pages.len(), 3);
    let listings = column(&paths.listing_urls(Category::Other), LISTING_URL_COLUMN);
    assert_eq!(
        listings.iter().filter(|url| url.is_empty()).count(),
        1,
        "an empty page leaves one marker row"
    );
}

#[tokio::test]
async fn test_failed_pages_are_not_marked_harvested() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &dir);
    let paths = paths(&config);
    paths.ensure_dirs().unwrap();

    let uri = server.uri();
    fs::write(
        paths.page_urls(Category::Other),
        format!(
            "property_page_url\n\
             {uri}/hledani/ostatni?strana=1\n\
             {uri}/hledani/ostatni?strana=2\n"
        ),
    )
    .unwrap();

    mount_search_page(&server, 1, search_page(Some(2), &[Some("/detail/a")]), Some(1)).await;
    // Page 2 is not mounted, so the mock server answers 404

    let report = run_pipeline(config, Category::Other, Stage::Harvest, &mut NoQuestions)
        .await
        .unwrap();

    let harvest = report.harvest.unwrap();
    assert_eq!((harvest.succeeded, harvest.failed), (1, 1));
    // The progress file is removed even though a page failed
    assert!(!paths.page_urls(Category::Other).exists());
    assert_eq!(
        column(&paths.listing_urls(Category::Other), HARVESTED_PAGE_COLUMN),
        vec![format!("{uri}/hledani/ostatni?strana=1")]
    );
}
