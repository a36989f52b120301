//! Sections command implementation.
//!
//! Fetches a paper's section outline from the backend and prints it as an
//! indented, numbered list.

use std::sync::LazyLock;

use anyhow::bail;
use regex::Regex;
use reqwest::Url;

use crate::api::{ApiClient, SectionsRequest, SectionsResponse};
use crate::cli::{CliResult, ExitCode, SectionsCommand};
use crate::config::PapertalkConfig;

/// Collapses runs of whitespace (including embedded newlines) in titles.
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN regex is valid"));

impl SectionsCommand {
    /// Execute the sections command.
    pub fn execute(&self) -> CliResult {
        let url = self.url.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        if url.is_none() && title.is_none() {
            bail!("please provide a PDF URL (--url) or a paper title (--title)");
        }
        if let Some(u) = url {
            if Url::parse(u).is_err() {
                bail!("please enter a valid PDF URL");
            }
        }

        let config = PapertalkConfig::load(None)?;
        let client = ApiClient::new(&config.server.base_url, config.server.timeout_secs)?;

        let request = SectionsRequest {
            url: url.map(str::to_string),
            title: title.map(str::to_string),
        };
        let response = client.pdf_sections(&request)?;
        render_sections(&response, title);
        Ok(ExitCode::SUCCESS)
    }
}

/// Print the outline, with the matched PDF link above it when present.
fn render_sections(response: &SectionsResponse, title: Option<&str>) {
    match (&response.matched_pdf, title) {
        (Some(pdf), Some(title)) => {
            println!("Matched paper: \x1b[1m{title}\x1b[0m");
            println!("\x1b[34m{pdf}\x1b[0m");
            println!();
        }
        (None, Some(_)) => {
            println!("No exact match; showing sections from the closest result.");
            println!();
        }
        _ => {}
    }

    if response.sections.is_empty() {
        println!("\x1b[2mNo sections detected.\x1b[0m");
        return;
    }
    for (i, section) in response.sections.iter().enumerate() {
        let indent = "  ".repeat(section_level(section));
        println!(
            "{}\x1b[36m{}.\x1b[0m {}",
            indent,
            i + 1,
            normalise_title(section)
        );
    }
}

/// Nesting level of a section entry; subsections indent one extra step.
fn section_level(title: &str) -> usize {
    if title.starts_with("subsection") {
        2
    } else {
        1
    }
}

/// Flatten embedded newlines and whitespace runs to single spaces.
fn normalise_title(title: &str) -> String {
    WHITESPACE_RUN.replace_all(title.trim(), " ").into_owned()
}
