//! papertalk - terminal companion for a paper-search-and-chat backend.
//!
//! This is the main entry point for the papertalk CLI.

use clap::Parser;
use papertalk::cli::{handle_result, Cli, CliResult, Commands, ExitCode, SettingsCommands};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let result: CliResult = match cli.command {
        None => {
            // No subcommand provided - show help
            println!("papertalk - chat with your papers from the terminal.");
            println!();
            println!("Run 'papertalk --help' for available commands.");
            println!();
            println!("Quick start:");
            println!("  papertalk search \"attention is all you need\"");
            println!("  papertalk chat                          # interactive TUI");
            println!("  papertalk chat -m translate \"...\"       # one-shot streaming");
            println!("  papertalk sections -t \"paper title\"");
            Ok(ExitCode::SUCCESS)
        }
        Some(cmd) => match cmd {
            Commands::Search(c) => c.execute(),
            Commands::Chat(c) => c.execute(),
            Commands::Sections(c) => c.execute(),
            Commands::Settings(subcmd) => match subcmd {
                SettingsCommands::Show(c) => c.execute(),
                SettingsCommands::Set(c) => c.execute(),
            },
            Commands::Completions(c) => c.execute(),
        },
    };

    handle_result(result)
}
