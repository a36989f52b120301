//! CLI commands and argument handling.
//!
//! This module contains the clap CLI definitions and command implementations.

pub mod commands;

pub use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

/// Result type returned by every command's `execute`.
pub type CliResult = anyhow::Result<ExitCode>;

/// Translate a command result into a process exit code, printing errors.
pub fn handle_result(result: CliResult) -> ExitCode {
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {e}");
            ExitCode::FAILURE
        }
    }
}

/// Terminal companion for a paper-search-and-chat assistant backend.
///
/// Search arXiv through the backend, chat about papers with streaming
/// responses, and pull section outlines from PDFs.
#[derive(Parser, Debug)]
#[command(name = "papertalk")]
#[command(author, version = crate::VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run; omitted shows the quick-start summary.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands for papertalk.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for papers through the backend.
    ///
    /// Examples:
    ///   papertalk search "attention is all you need"
    ///   papertalk search transformers -c cs.CL -d week
    ///   papertalk search diffusion --sort correlation
    Search(SearchCommand),

    /// Chat with the paper assistant.
    ///
    /// With no message, opens the interactive chat TUI. With a message,
    /// streams one response to the console and exits.
    ///
    /// Examples:
    ///   papertalk chat
    ///   papertalk chat -m translate "The dominant sequence..."
    ///   papertalk chat -m multichat "compare these approaches" --save
    Chat(ChatCommand),

    /// Fetch a paper's section outline.
    ///
    /// Give a direct PDF URL, a paper title to match on arXiv, or both.
    Sections(SectionsCommand),

    /// View or update model settings.
    ///
    /// Settings persist in .papertalk/config.json and complete settings are
    /// pushed to the backend.
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Generate shell completions.
    ///
    /// Outputs completion script to stdout for bash, zsh, or fish.
    Completions(CompletionsCommand),
}

/// Arguments for the 'search' command.
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Search keywords.
    pub keywords: String,

    /// arXiv category to scope the query (e.g. cs.CL).
    #[arg(short = 'c', long, default_value = "all")]
    pub category: String,

    /// Time range for results.
    #[arg(short = 'd', long, value_parser = ["all", "week", "month", "year"], default_value = "all")]
    pub date_range: String,

    /// Sort rule for results.
    #[arg(short = 's', long, value_parser = ["date", "correlation"], default_value = "date")]
    pub sort: String,
}

/// Arguments for the 'chat' command.
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Message for a one-shot console chat. Omit to open the TUI.
    pub message: Option<String>,

    /// Chat function to use.
    #[arg(short = 'm', long, value_parser = ["translate", "summarize", "explain", "multichat"], default_value = "multichat")]
    pub mode: String,

    /// Export the transcript after a one-shot chat completes.
    #[arg(long)]
    pub save: bool,
}

/// Arguments for the 'sections' command.
#[derive(Args, Debug)]
pub struct SectionsCommand {
    /// Direct PDF URL to parse.
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Paper title to match on arXiv.
    #[arg(short = 't', long)]
    pub title: Option<String>,
}

/// Subcommands for settings management.
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show current settings with the API key masked.
    Show(SettingsShowCommand),
    /// Update settings and push them to the backend.
    Set(SettingsSetCommand),
}

/// Arguments for 'settings show'.
#[derive(Args, Debug)]
pub struct SettingsShowCommand {}

/// Arguments for 'settings set'.
#[derive(Args, Debug)]
pub struct SettingsSetCommand {
    /// Backend server base URL.
    #[arg(long)]
    pub server: Option<String>,

    /// Model API base URL.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Model API key.
    #[arg(long, env = "PAPERTALK_API_KEY")]
    pub api_key: Option<String>,

    /// Model name.
    #[arg(long)]
    pub model: Option<String>,
}

/// Arguments for the 'completions' command.
#[derive(Args, Debug)]
pub struct CompletionsCommand {
    /// Shell to generate completions for.
    #[arg(value_parser = ["bash", "zsh", "fish"])]
    pub shell: String,
}
