//! Settings command implementation.
//!
//! Settings live in .papertalk/config.json; once all three model fields are
//! present they are pushed to the backend, which answers with a
//! confirmation message.

use crate::api::{ApiClient, SettingsRequest};
use crate::cli::{CliResult, ExitCode, SettingsSetCommand, SettingsShowCommand};
use crate::config::PapertalkConfig;

impl SettingsShowCommand {
    /// Execute the 'settings show' command.
    pub fn execute(&self) -> CliResult {
        let config = PapertalkConfig::load(None)?;
        println!("\x1b[1mServer\x1b[0m");
        println!("  Base URL: {}", config.server.base_url);
        println!("  Timeout:  {}s", config.server.timeout_secs);
        println!();
        println!("\x1b[1mModel\x1b[0m");
        println!(
            "  Base URL: {}",
            config.model.base_url.as_deref().unwrap_or("(not set)")
        );
        println!("  API key:  {}", config.model.masked_key());
        println!(
            "  Model:    {}",
            config.model.model.as_deref().unwrap_or("(not set)")
        );
        println!();
        println!("\x1b[1mExport\x1b[0m");
        println!("  Directory: {}", config.export.dir);
        Ok(ExitCode::SUCCESS)
    }
}

impl SettingsSetCommand {
    /// Execute the 'settings set' command.
    pub fn execute(&self) -> CliResult {
        let mut config = PapertalkConfig::load(None)?;

        if let Some(server) = &self.server {
            config.server.base_url = server.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.model.base_url = Some(base_url.clone());
        }
        if let Some(api_key) = &self.api_key {
            config.model.api_key = Some(api_key.clone());
        }
        if let Some(model) = &self.model {
            config.model.model = Some(model.clone());
        }

        let path = config.save(None)?;
        println!("\x1b[32mSettings saved to:\x1b[0m {}", path.display());

        if config.model.is_complete() {
            push_to_backend(&config);
        } else {
            println!(
                "\x1b[2mModel settings incomplete; not pushed to the backend yet.\x1b[0m"
            );
        }
        Ok(ExitCode::SUCCESS)
    }
}

/// Push complete model settings to the backend and print its ack.
fn push_to_backend(config: &PapertalkConfig) {
    let request = SettingsRequest {
        base_url: config.model.base_url.clone().unwrap_or_default(),
        api_key: config.model.api_key.clone().unwrap_or_default(),
        model: config.model.model.clone().unwrap_or_default(),
    };
    let result = ApiClient::new(&config.server.base_url, config.server.timeout_secs)
        .and_then(|client| client.save_settings(&request));
    match result {
        Ok(ack) => println!("\x1b[32m{}\x1b[0m", ack.message),
        Err(e) => eprintln!("\x1b[31mFailed to save settings to the backend:\x1b[0m {e}"),
    }
}
