//! Output module for run summaries and progress reports
//!
//! This module handles:
//! - Reading per-category progress counts from the CSV stores
//! - Printing progress statistics and run summaries

pub mod stats;

pub use stats::{load_statistics, print_run_summary, print_statistics, CategoryStatistics};
