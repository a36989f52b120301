//! Chat command implementation.
//!
//! With no message the interactive TUI opens; with a message one response
//! streams to the console. Both paths share the renderer in
//! [`crate::stream`]: thinking text prints dim, the answer prints normally
//! once the marker arrives.

use std::io::Write;
use std::path::Path;

use anyhow::bail;
use chrono::Local;

use crate::api::{ApiClient, ChatMode};
use crate::cli::{ChatCommand, CliResult, ExitCode};
use crate::config::PapertalkConfig;
use crate::stream::{render_stream, ChatView};
use crate::transcript::{Transcript, TranscriptError};

impl ChatCommand {
    /// Execute the chat command.
    pub fn execute(&self) -> CliResult {
        let config = PapertalkConfig::load(None)?;
        let mode = ChatMode::parse(&self.mode).unwrap_or_default();

        match &self.message {
            Some(message) => one_shot(&config, mode, message, self.save),
            None => {
                crate::tui::run_chat_tui(&config, mode)?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Stream a single chat response to the console.
fn one_shot(config: &PapertalkConfig, mode: ChatMode, message: &str, save: bool) -> CliResult {
    let message = message.trim();
    if message.is_empty() {
        bail!("please enter a message");
    }

    let client = ApiClient::new(&config.server.base_url, config.server.timeout_secs)?;
    let mut transcript = Transcript::new();
    transcript.push_user(message);

    println!("\x1b[1mYou\x1b[0m ({mode}): {message}");

    let code = match client.chat(mode, message) {
        Ok(mut stream) => {
            let mut view = ConsoleView::default();
            let outcome = render_stream(&mut stream, &mut view, &mut transcript);
            println!();
            if outcome.failed {
                ExitCode::FAILURE
            } else {
                transcript.push_assistant(outcome.assistant_text());
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            // Request failures land in the transcript like stream failures.
            transcript.push_error(e.to_string());
            println!("\x1b[31m{}\x1b[0m", transcript.visible_text());
            ExitCode::FAILURE
        }
    };

    if save {
        export_transcript(&transcript, &config.export.dir);
    }

    Ok(code)
}

/// Export the transcript, reporting the outcome on the console.
fn export_transcript(transcript: &Transcript, dir: &str) {
    match transcript.export_to(Path::new(dir), Local::now().date_naive()) {
        Ok(path) => println!("\x1b[32mTranscript saved to:\x1b[0m {}", path.display()),
        Err(TranscriptError::Empty) => {
            eprintln!("\x1b[33mNo chat history to export.\x1b[0m");
        }
        Err(e) => eprintln!("\x1b[31mExport failed:\x1b[0m {e}"),
    }
}

/// Console sink for the stream renderer.
///
/// A terminal cannot replace a region in place, so this prints only what
/// each region gained since the last call: thinking dim, answer normal,
/// with a one-time separator when the thinking block collapses.
#[derive(Debug, Default)]
struct ConsoleView {
    printed_thinking: usize,
    printed_answer: usize,
    collapse_announced: bool,
}

/// The unseen tail of an append-only region.
fn unseen<'a>(full: &'a str, printed: &mut usize) -> &'a str {
    let tail = &full[*printed..];
    *printed = full.len();
    tail
}

impl ChatView for ConsoleView {
    fn show_thinking(&mut self, markdown: &str) {
        print!("\x1b[2m{}\x1b[0m", unseen(markdown, &mut self.printed_thinking));
    }

    fn show_thinking_collapsed(&mut self, raw: &str) {
        let tail = unseen(raw, &mut self.printed_thinking);
        if !tail.is_empty() {
            print!("\x1b[2m{}\x1b[0m", tail);
        }
        if !self.collapse_announced {
            self.collapse_announced = true;
            println!();
            println!("\x1b[2m── thinking done ──\x1b[0m");
        }
    }

    fn show_answer(&mut self, markdown: &str) {
        print!("{}", unseen(markdown, &mut self.printed_answer));
    }

    fn show_transcript(&mut self, text: &str) {
        println!();
        println!("\x1b[31m{}\x1b[0m", text);
    }

    fn scroll_to_bottom(&mut self) {
        // The console analogue: make everything printed so far visible.
        let _ = std::io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unseen_returns_only_new_text() {
        let mut printed = 0;
        assert_eq!(unseen("abc", &mut printed), "abc");
        assert_eq!(unseen("abcdef", &mut printed), "def");
        assert_eq!(unseen("abcdef", &mut printed), "");
    }

    #[test]
    fn test_console_view_tracks_regions_independently() {
        let mut view = ConsoleView::default();
        view.show_thinking("think");
        view.show_answer("answer");
        assert_eq!(view.printed_thinking, 5);
        assert_eq!(view.printed_answer, 6);
    }

    #[test]
    fn test_collapse_announced_once() {
        let mut view = ConsoleView::default();
        view.show_thinking_collapsed("t");
        assert!(view.collapse_announced);
        // Further collapsed renders must not re-announce; tracked lengths
        // stay monotonic.
        view.show_thinking_collapsed("t");
        assert_eq!(view.printed_thinking, 1);
    }
}
