//! Operator interaction
//!
//! The pipeline asks the operator for three things: the category, how many
//! search result pages to harvest and, above the free page limit, a passcode.
//! Answers given on the command line are used first; anything missing is
//! asked on stdin.

use crate::site::Category;
use crate::{Result, ScraperError};
use std::io::{self, BufRead, Write};

/// Source of the answers discovery needs while it runs
///
/// Answers are returned raw; validation belongs to the caller. Methods are
/// called synchronously from the async discovery step, before any harvest
/// worker has been spawned, so an implementation may block on input.
pub trait Operator: Send {
    /// How many pages to harvest per sub-type, given the largest page count
    /// any sub-type reported
    fn page_count(&mut self, available: u32) -> String;

    /// The passcode unlocking more than `limit` pages
    fn passcode(&mut self, limit: u32) -> String;
}

/// Operator backed by command-line answers with a stdin fallback
///
/// The stdin fallback blocks the runtime thread discovery runs on until the
/// operator answers. Passing `--pages` and `--passcode` avoids the read.
#[derive(Debug, Default)]
pub struct ConsoleOperator {
    pages: Option<String>,
    passcode: Option<String>,
}

impl ConsoleOperator {
    pub fn new(pages: Option<String>, passcode: Option<String>) -> Self {
        Self { pages, passcode }
    }
}

impl Operator for ConsoleOperator {
    fn page_count(&mut self, available: u32) -> String {
        match self.pages.take() {
            Some(pages) => pages,
            None => ask(&format!(
                "Up to {} pages available. How many pages do you want to scrape? ",
                available
            )),
        }
    }

    fn passcode(&mut self, limit: u32) -> String {
        match self.passcode.take() {
            Some(passcode) => passcode,
            None => ask(&format!(
                "Scraping more than {} pages requires a passcode: ",
                limit
            )),
        }
    }
}

/// Prints `question` and reads one line from stdin
///
/// This is a blocking read. A closed or unreadable stdin reads as an empty answer.
fn ask(question: &str) -> String {
    print!("{}", question);
    if let Err(e) = io::stdout().flush() {
        tracing::debug!("Failed to flush stdout: {}", e);
    }

    let mut answer = String::new();
    if let Err(e) = io::stdin().lock().read_line(&mut answer) {
        tracing::warn!("Failed to read operator input: {}", e);
        answer.clear();
    }
    answer.trim().to_string()
}

/// Shows the category menu and parses the operator's choice
pub fn prompt_category() -> Result<Category> {
    println!("Select a property category:");
    for (index, category) in Category::ALL.iter().enumerate() {
        println!("  {}. {} ({})", index + 1, category.label(), category.slug());
    }

    let answer = ask("Category: ");
    if answer.is_empty() {
        return Err(ScraperError::InvalidCategory(answer));
    }
    answer.parse()
}
