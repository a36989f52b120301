//! Chat TUI application state and event handling.
//!
//! The terminal half mirrors the usual ratatui setup: raw mode, alternate
//! screen, a tick loop polling crossterm events plus an `mpsc` channel fed
//! by the stream worker thread. The state half is plain data so every
//! handler is testable without a live terminal.

use std::io::{self, Read, Stdout};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::api::{ApiClient, ChatMode};
use crate::config::PapertalkConfig;
use crate::stream::{ChatView, StreamRenderer};
use crate::transcript::Transcript;

use super::ui;

/// Events sent to the TUI by the stream worker.
#[derive(Debug)]
pub enum TuiEvent {
    /// One raw chunk from the response body.
    Chunk(Vec<u8>),
    /// The stream ended normally.
    StreamEnd,
    /// The request or a stream read failed.
    StreamFailed(String),
}

/// Actions the key bindings can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the TUI.
    Quit,
    /// Send the input line as a chat message.
    Submit,
    /// Cycle the chat mode.
    CycleMode,
    /// Export the transcript to a file.
    ExportTranscript,
    /// Expand or collapse the thinking panel.
    ToggleThinking,
    /// Scroll the transcript up.
    ScrollUp,
    /// Scroll the transcript down.
    ScrollDown,
}

/// One key binding: chord to action.
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    /// Key code of the chord.
    pub code: KeyCode,
    /// Modifier keys of the chord.
    pub modifiers: KeyModifiers,
    /// Action the chord triggers.
    pub action: Action,
}

/// The key binding table, built once at initialisation.
pub fn key_bindings() -> Vec<Binding> {
    vec![
        Binding {
            code: KeyCode::Esc,
            modifiers: KeyModifiers::NONE,
            action: Action::Quit,
        },
        Binding {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            action: Action::Submit,
        },
        Binding {
            code: KeyCode::Tab,
            modifiers: KeyModifiers::NONE,
            action: Action::CycleMode,
        },
        Binding {
            code: KeyCode::Char('e'),
            modifiers: KeyModifiers::CONTROL,
            action: Action::ExportTranscript,
        },
        Binding {
            code: KeyCode::Char('t'),
            modifiers: KeyModifiers::CONTROL,
            action: Action::ToggleThinking,
        },
        Binding {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            action: Action::ScrollUp,
        },
        Binding {
            code: KeyCode::Down,
            modifiers: KeyModifiers::NONE,
            action: Action::ScrollDown,
        },
    ]
}

/// Look up the action bound to a key chord.
pub fn lookup_action(
    bindings: &[Binding],
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Option<Action> {
    bindings
        .iter()
        .find(|b| b.code == code && b.modifiers == modifiers)
        .map(|b| b.action)
}

/// The two render regions plus the transcript log, as plain data.
#[derive(Debug, Default)]
pub struct ChatPanels {
    /// Thinking region text (markdown while streaming, raw once collapsed).
    pub thinking: String,
    /// Whether the thinking region became a collapsible block.
    pub thinking_collapsed: bool,
    /// Answer region text, preamble included.
    pub answer: String,
    /// Chat log region text.
    pub transcript_text: String,
    /// Whether the view should stick to the bottom.
    pub stick_to_bottom: bool,
}

impl ChatView for ChatPanels {
    fn show_thinking(&mut self, markdown: &str) {
        self.thinking = markdown.to_string();
        self.thinking_collapsed = false;
    }

    fn show_thinking_collapsed(&mut self, raw: &str) {
        self.thinking = raw.to_string();
        self.thinking_collapsed = true;
    }

    fn show_answer(&mut self, markdown: &str) {
        self.answer = markdown.to_string();
    }

    fn show_transcript(&mut self, text: &str) {
        self.transcript_text = text.to_string();
    }

    fn scroll_to_bottom(&mut self) {
        self.stick_to_bottom = true;
    }
}

/// Chat TUI state (separate from the terminal for borrowing).
#[derive(Debug)]
pub struct ChatState {
    /// The session transcript, owned here and passed to the renderer.
    pub transcript: Transcript,
    /// Render regions.
    pub panels: ChatPanels,
    /// Renderer for the in-flight request, if any.
    pub renderer: Option<StreamRenderer>,
    /// Input line.
    pub input: String,
    /// Current chat mode.
    pub mode: ChatMode,
    /// Whether a stream is in flight.
    pub busy: bool,
    /// User override to re-expand a collapsed thinking block.
    pub thinking_expanded: bool,
    /// Blocking alert shown on the status line.
    pub status: Option<String>,
    /// Manual scroll offset from the bottom of the transcript.
    pub scroll_offset: u16,
    /// Where exports are written.
    pub export_dir: String,
}

impl ChatState {
    /// Create state for a fresh session.
    pub fn new(mode: ChatMode, export_dir: String) -> Self {
        Self {
            transcript: Transcript::new(),
            panels: ChatPanels::default(),
            renderer: None,
            input: String::new(),
            mode,
            busy: false,
            thinking_expanded: false,
            status: None,
            scroll_offset: 0,
            export_dir,
        }
    }

    /// Validate and accept the input line as a new message.
    ///
    /// Returns the message to send, or `None` with a status alert set. A
    /// submission while a stream is in flight is rejected rather than
    /// interleaved.
    pub fn submit(&mut self) -> Option<String> {
        let message = self.input.trim().to_string();
        if message.is_empty() {
            self.status = Some("Please enter a message.".to_string());
            return None;
        }
        if self.busy {
            self.status = Some("A response is still streaming.".to_string());
            return None;
        }
        self.status = None;
        self.input.clear();
        self.transcript.push_user(message.as_str());
        self.panels.transcript_text = self.transcript.visible_text();
        self.panels.thinking.clear();
        self.panels.thinking_collapsed = false;
        self.panels.answer.clear();
        self.thinking_expanded = false;
        self.scroll_offset = 0;
        self.renderer = Some(StreamRenderer::new());
        self.busy = true;
        Some(message)
    }

    /// Handle one worker event.
    pub fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Chunk(bytes) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.feed(&bytes, &mut self.panels);
                }
            }
            TuiEvent::StreamEnd => {
                if let Some(renderer) = self.renderer.take() {
                    let outcome = renderer.finish(&mut self.panels);
                    self.transcript.push_assistant(outcome.assistant_text());
                    self.panels.transcript_text = self.transcript.visible_text();
                }
                self.busy = false;
            }
            TuiEvent::StreamFailed(message) => {
                if let Some(renderer) = self.renderer.take() {
                    renderer.fail(&message, &mut self.transcript, &mut self.panels);
                }
                self.busy = false;
            }
        }
    }

    /// Export the transcript, surfacing the outcome on the status line.
    pub fn export(&mut self) {
        let result = self
            .transcript
            .export_to(Path::new(&self.export_dir), Local::now().date_naive());
        self.status = Some(match result {
            Ok(path) => format!("Transcript saved to {}", path.display()),
            Err(e) => e.to_string(),
        });
    }

    /// Apply a bound action. Returns false when the TUI should quit.
    ///
    /// Submit is handled by the caller (it spawns the worker); everything
    /// else lands here.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::CycleMode => self.mode = self.mode.next(),
            Action::ExportTranscript => self.export(),
            Action::ToggleThinking => {
                if self.panels.thinking_collapsed {
                    self.thinking_expanded = !self.thinking_expanded;
                }
            }
            Action::ScrollUp => {
                self.panels.stick_to_bottom = false;
                self.scroll_offset = self.scroll_offset.saturating_add(1);
            }
            Action::ScrollDown => {
                if self.scroll_offset > 0 {
                    self.scroll_offset -= 1;
                } else {
                    self.panels.stick_to_bottom = true;
                }
            }
            Action::Submit => {}
        }
        true
    }
}

/// Chat TUI application.
pub struct ChatTui {
    /// Terminal instance.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Worker event receiver.
    rx: Receiver<TuiEvent>,
    /// Worker event sender (cloned into stream workers).
    tx: Sender<TuiEvent>,
    /// Application state.
    state: ChatState,
    /// Key binding table.
    bindings: Vec<Binding>,
}

impl ChatTui {
    /// Set up the terminal and create the application.
    pub fn new(mode: ChatMode, export_dir: String) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let (tx, rx) = mpsc::channel();

        Ok(Self {
            terminal,
            rx,
            tx,
            state: ChatState::new(mode, export_dir),
            bindings: key_bindings(),
        })
    }

    /// Run the event loop until the user quits.
    pub fn run(&mut self, client: &ApiClient) -> io::Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            let state = &self.state;
            self.terminal.draw(|f| ui::draw(f, state))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && !self.handle_key(key.code, key.modifiers, client) {
                        break;
                    }
                }
            }

            while let Ok(event) = self.rx.try_recv() {
                self.state.handle_event(event);
            }

            if last_tick.elapsed() >= tick_rate {
                last_tick = Instant::now();
            }
        }

        Ok(())
    }

    /// Handle one key press. Returns false to quit.
    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, client: &ApiClient) -> bool {
        if let Some(action) = lookup_action(&self.bindings, code, modifiers) {
            if action == Action::Submit {
                if let Some(message) = self.state.submit() {
                    self.spawn_stream(client, message);
                }
                return true;
            }
            return self.state.apply(action);
        }
        // Anything unbound edits the input line.
        match code {
            KeyCode::Char(c) if modifiers.intersection(KeyModifiers::CONTROL).is_empty() => {
                self.state.input.push(c);
            }
            KeyCode::Backspace => {
                self.state.input.pop();
            }
            _ => {}
        }
        true
    }

    /// Spawn the worker thread that reads the stream for one request.
    fn spawn_stream(&self, client: &ApiClient, message: String) {
        let tx = self.tx.clone();
        let client = client.clone();
        let mode = self.state.mode;
        thread::spawn(move || {
            match client.chat(mode, &message) {
                Ok(mut stream) => {
                    let mut buf = [0u8; 4096];
                    loop {
                        match stream.read(&mut buf) {
                            Ok(0) => {
                                let _ = tx.send(TuiEvent::StreamEnd);
                                break;
                            }
                            Ok(n) => {
                                if tx.send(TuiEvent::Chunk(buf[..n].to_vec())).is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                let _ = tx.send(TuiEvent::StreamFailed(e.to_string()));
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(TuiEvent::StreamFailed(e.to_string()));
                }
            }
        });
    }

    /// Clean up and restore the terminal.
    pub fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for ChatTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Open the chat TUI against the configured backend.
pub fn run_chat_tui(config: &PapertalkConfig, mode: ChatMode) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.server.base_url, config.server.timeout_secs)?;
    let mut app = ChatTui::new(mode, config.export.dir.clone())?;
    app.run(&client)?;
    app.cleanup()?;
    Ok(())
}
