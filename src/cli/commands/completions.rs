//! Completions command implementation.
//!
//! This module implements the `papertalk completions` command for generating
//! shell completions.

use std::io;

use anyhow::bail;
use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::{Cli, CliResult, CompletionsCommand, ExitCode};

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self) -> CliResult {
        let shell = match self.shell.as_str() {
            "bash" => Shell::Bash,
            "zsh" => Shell::Zsh,
            "fish" => Shell::Fish,
            other => bail!("unsupported shell: {other}"),
        };

        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "papertalk", &mut io::stdout());
        Ok(ExitCode::SUCCESS)
    }
}
