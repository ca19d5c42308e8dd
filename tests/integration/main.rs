//! Integration tests for the scraper
//!
//! These tests use wiremock to create a mock sreality site and run the
//! discovery, harvest and scrape stages end-to-end against it.

mod common;
mod discovery_tests;
mod pipeline_tests;
