//! Search command implementation.
//!
//! Runs a paper search through the backend and prints the results as the
//! console rendition of the page's accordion list.

use crate::api::{ApiClient, Paper, SearchRequest};
use crate::cli::{CliResult, ExitCode, SearchCommand};
use crate::config::PapertalkConfig;

impl SearchCommand {
    /// Execute the search command.
    pub fn execute(&self) -> CliResult {
        let config = PapertalkConfig::load(None)?;
        let client = ApiClient::new(&config.server.base_url, config.server.timeout_secs)?;

        let request = SearchRequest {
            keywords: self.keywords.clone(),
            category: self.category.clone(),
            date_range: self.date_range.clone(),
            selectivityrule: self.sort.clone(),
        };

        match client.search(&request) {
            Ok(papers) => {
                render_results(&papers);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                // Failures render where the results would have gone.
                println!("\x1b[31mSearch failed: {e}\x1b[0m");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

/// Print search results as numbered entries.
fn render_results(papers: &[Paper]) {
    if papers.is_empty() {
        println!("No papers found.");
        return;
    }
    for (i, paper) in papers.iter().enumerate() {
        println!();
        println!("\x1b[1m{}. {}\x1b[0m", i + 1, paper.title);
        println!("   \x1b[2mAuthors:\x1b[0m {}", format_authors(&paper.authors));
        println!("   \x1b[2mDate:\x1b[0m    {}", format_date(&paper.date));
        println!("   \x1b[2mPDF:\x1b[0m     \x1b[34m{}\x1b[0m", paper.pdf_url);
        println!("   {}", format_abstract(&paper.summary));
    }
    println!();
}

/// Join author names the way the page listed them.
fn format_authors(authors: &[String]) -> String {
    if authors.is_empty() {
        "(unknown)".to_string()
    } else {
        authors.join(", ")
    }
}

/// Keep the date part of an ISO timestamp.
fn format_date(date: &str) -> &str {
    match date.split_once('T') {
        Some((day, _)) => day,
        None => date,
    }
}

/// Truncate long abstracts for the list view.
fn format_abstract(summary: &str) -> String {
    const MAX: usize = 280;
    let flat = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > MAX {
        let cut: String = flat.chars().take(MAX - 3).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}
