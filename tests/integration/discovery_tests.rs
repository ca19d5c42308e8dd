//! Discovery against a mock site: clamping, the passcode gate and sites
//! without pagination

use crate::common::*;
use sreality_scraper::crawler::{run_pipeline, PipelineReport, Stage};
use sreality_scraper::store::{HARVESTED_PAGE_COLUMN, LISTING_URL_COLUMN};
use sreality_scraper::{Category, PageRequestError, ScraperError};
use std::collections::BTreeSet;
use tempfile::TempDir;
use wiremock::MockServer;

#[tokio::test]
async fn test_page_count_clamped_to_available_pages() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &dir);
    let paths = paths(&config);

    for page in 1..=3 {
        let href = format!("/detail/prodej/ostatni/garaz/{}", page);
        mount_search_page(&server, page, search_page(Some(3), &[Some(&href)]), None).await;
    }

    let mut operator = ScriptedOperator::new("50", None);
    let report = run_pipeline(config, Category::Other, Stage::Harvest, &mut operator)
        .await
        .unwrap();

    assert!(operator.pages_asked);
    assert!(!operator.passcode_asked);
    let harvest = report.harvest.unwrap();
    assert_eq!(harvest.dispatched, 3);
    assert_eq!(harvest.succeeded, 3);

    let pages: BTreeSet<String> =
        column(&paths.listing_urls(Category::Other), HARVESTED_PAGE_COLUMN)
            .into_iter()
            .collect();
    assert_eq!(pages.len(), 3);
    assert!(!paths.page_urls(Category::Other).exists());
}

#[tokio::test]
async fn test_wrong_passcode_generates_no_urls() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &dir);
    let paths = paths(&config);

    // Only the probe of page 1 may reach the site
    mount_search_page(&server, 1, search_page(Some(10), &[Some("/detail/1")]), Some(1)).await;
    mount_search_page(&server, 2, search_page(Some(10), &[Some("/detail/2")]), Some(0)).await;

    let mut operator = ScriptedOperator::new("8", Some("guess"));
    let result = run_pipeline(config, Category::Other, Stage::All, &mut operator).await;

    assert!(matches!(
        result,
        Err(ScraperError::PageRequest(PageRequestError::InvalidPasscode))
    ));
    assert!(operator.passcode_asked);
    assert!(!paths.page_urls(Category::Other).exists());
    assert!(!paths.listing_urls(Category::Other).exists());
    assert!(!paths.listings(Category::Other).exists());
}

#[tokio::test]
async fn test_correct_passcode_unlocks_pages() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &dir);
    let paths = paths(&config);

    for page in 1..=7 {
        let href = format!("/detail/{}", page);
        mount_search_page(&server, page, search_page(Some(7), &[Some(&href)]), None).await;
    }

    let mut operator = ScriptedOperator::new("6", Some(PASSCODE));
    let report = run_pipeline(config, Category::Other, Stage::Harvest, &mut operator)
        .await
        .unwrap();

    assert_eq!(report.harvest.unwrap().succeeded, 6);
    let listings = column(&paths.listing_urls(Category::Other), LISTING_URL_COLUMN);
    assert_eq!(listings.len(), 6);
    assert!(!listings.iter().any(|url| url.ends_with("/detail/7")));
}

#[tokio::test]
async fn test_below_minimum_is_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &dir);
    let paths = paths(&config);

    mount_search_page(&server, 1, search_page(Some(4), &[Some("/detail/1")]), Some(1)).await;

    let mut operator = ScriptedOperator::new("0", None);
    let result = run_pipeline(config, Category::Other, Stage::All, &mut operator).await;

    assert!(matches!(
        result,
        Err(ScraperError::PageRequest(PageRequestError::BelowMinimum(0)))
    ));
    assert!(!paths.page_urls(Category::Other).exists());
}

#[tokio::test]
async fn test_no_pagination_skips_prompt() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &dir);

    mount_search_page(&server, 1, search_page(None, &[Some("/detail/1")]), Some(1)).await;

    let mut operator = ScriptedOperator::new("3", None);
    let report = run_pipeline(config, Category::Other, Stage::Harvest, &mut operator)
        .await
        .unwrap();

    assert!(!operator.pages_asked);
    assert_eq!(
        report,
        PipelineReport {
            harvest: Some(Default::default()),
            scrape: None,
        }
    );
}
