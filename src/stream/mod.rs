//! Streaming chat response renderer.
//!
//! Consumes the chunked UTF-8 body of a streaming chat response and
//! incrementally renders two regions: a "thinking" region and an "answer"
//! region. The literal marker `</think>` switches routing from the first to
//! the second; the transition is one-way. Rendering goes through the
//! [`ChatView`] trait so the same renderer drives the console, the TUI, and
//! tests.

use std::io::Read;

use crate::transcript::Transcript;

/// Marker separating reasoning output from the final answer.
pub const THINK_MARKER: &str = "</think>";

/// Preamble seeded into the answer region before any answer text arrives.
pub const ANSWER_PREAMBLE: &str = "\n**Paper assistant**:\n\n";

/// Read buffer size for pulling chunks off a response body.
const READ_BUFFER_SIZE: usize = 8192;

/// Rendering sink for the two chat regions.
///
/// Implementations receive the full accumulated text for a region on every
/// call and are expected to replace that region's contents, mirroring how
/// the page re-rendered its boxes per chunk.
pub trait ChatView {
    /// Render the thinking region as formatted (markdown) text.
    fn show_thinking(&mut self, markdown: &str);

    /// Render the thinking region as a collapsed block holding the raw
    /// accumulated thinking text.
    fn show_thinking_collapsed(&mut self, raw: &str);

    /// Render the answer region as formatted (markdown) text.
    fn show_answer(&mut self, markdown: &str);

    /// Replace the whole chat area with the transcript's visible text.
    /// Used after a stream failure.
    fn show_transcript(&mut self, text: &str);

    /// Move the view's scroll position to the bottom.
    fn scroll_to_bottom(&mut self);
}

/// Stateful UTF-8 decoder for byte chunks.
///
/// A streamed body may split a multi-byte sequence across chunks; incomplete
/// trailing bytes are held until the next chunk completes them. Invalid
/// bytes decode to U+FFFD rather than aborting the stream.
#[derive(Debug, Default)]
pub struct ChunkDecoder {
    pending: Vec<u8>,
}

impl ChunkDecoder {
    /// Create a decoder with no pending bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk of bytes, returning all complete characters.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(s) => {
                    out.push_str(s);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(std::str::from_utf8(&self.pending[..valid]).expect("valid prefix"));
                    match e.error_len() {
                        // Incomplete trailing sequence: hold for the next chunk.
                        None => {
                            self.pending.drain(..valid);
                            break;
                        }
                        // Invalid bytes mid-stream: substitute and continue.
                        Some(n) => {
                            out.push('\u{FFFD}');
                            self.pending.drain(..valid + n);
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush any held bytes at end of stream, substituting if incomplete.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let out = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        out
    }
}

/// Accumulator routing decoded text into thinking and answer buffers.
///
/// While the marker has not been seen, a trailing substring that is a proper
/// prefix of `</think>` is held back so a marker split across chunk
/// boundaries is still detected.
#[derive(Debug)]
pub struct ThinkSplitter {
    think_text: String,
    response_text: String,
    think_done: bool,
    carry: String,
    preamble_len: usize,
}

impl ThinkSplitter {
    /// Create a splitter seeded with the default answer preamble.
    pub fn new() -> Self {
        Self::with_preamble(ANSWER_PREAMBLE)
    }

    /// Create a splitter seeded with a custom answer preamble.
    pub fn with_preamble(preamble: &str) -> Self {
        Self {
            think_text: String::new(),
            response_text: preamble.to_string(),
            think_done: false,
            carry: String::new(),
            preamble_len: preamble.len(),
        }
    }

    /// Whether the marker has been seen. One-way.
    pub fn think_done(&self) -> bool {
        self.think_done
    }

    /// Accumulated thinking text (marker excluded, carry excluded).
    pub fn think_text(&self) -> &str {
        &self.think_text
    }

    /// Accumulated answer region text, preamble included.
    pub fn response_text(&self) -> &str {
        &self.response_text
    }

    /// Answer text with the preamble stripped.
    pub fn answer_body(&self) -> &str {
        &self.response_text[self.preamble_len..]
    }

    /// Route one decoded chunk, in arrival order.
    pub fn push(&mut self, chunk: &str) {
        if self.think_done {
            self.response_text.push_str(chunk);
            return;
        }
        let mut text = std::mem::take(&mut self.carry);
        text.push_str(chunk);
        if let Some(pos) = text.find(THINK_MARKER) {
            // Transition checked before routing; the marker itself is consumed.
            self.think_done = true;
            self.think_text.push_str(&text[..pos]);
            self.response_text.push_str(&text[pos + THINK_MARKER.len()..]);
        } else {
            let held = trailing_marker_prefix_len(&text);
            let keep = text.len() - held;
            self.think_text.push_str(&text[..keep]);
            self.carry = text[keep..].to_string();
        }
    }

    /// Flush an unresolved partial marker into the thinking text.
    ///
    /// Called at end of stream: a held-back `</th` that never completed is
    /// ordinary content, not a marker.
    pub fn finish(&mut self) {
        if !self.carry.is_empty() {
            let carry = std::mem::take(&mut self.carry);
            self.think_text.push_str(&carry);
        }
    }
}

impl Default for ThinkSplitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Length of the longest proper prefix of the marker that suffixes `text`.
fn trailing_marker_prefix_len(text: &str) -> usize {
    for len in (1..THINK_MARKER.len()).rev() {
        if len <= text.len() && text.ends_with(&THINK_MARKER[..len]) {
            return len;
        }
    }
    0
}

/// What a completed or failed stream left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Accumulated thinking text.
    pub think_text: String,
    /// Answer text with the preamble stripped.
    pub answer_body: String,
    /// Whether the marker was seen.
    pub think_done: bool,
    /// Whether the stream failed mid-read.
    pub failed: bool,
}

impl StreamOutcome {
    /// The text an assistant transcript entry should carry.
    ///
    /// When no marker ever arrived the whole response lives in the thinking
    /// buffer; that is still what the assistant said.
    pub fn assistant_text(&self) -> &str {
        if self.think_done {
            &self.answer_body
        } else {
            &self.think_text
        }
    }
}

/// Decodes byte chunks, routes them, and re-renders the view per chunk.
///
/// Owned exclusively by one in-flight request and discarded when the request
/// completes or fails.
#[derive(Debug, Default)]
pub struct StreamRenderer {
    decoder: ChunkDecoder,
    splitter: ThinkSplitter,
}

impl StreamRenderer {
    /// Create a renderer with empty buffers and the default preamble.
    pub fn new() -> Self {
        Self {
            decoder: ChunkDecoder::new(),
            splitter: ThinkSplitter::new(),
        }
    }

    /// Whether the marker has been seen.
    pub fn think_done(&self) -> bool {
        self.splitter.think_done()
    }

    /// Feed one raw chunk and re-render both regions.
    pub fn feed<V: ChatView>(&mut self, bytes: &[u8], view: &mut V) {
        let chunk = self.decoder.decode(bytes);
        if chunk.is_empty() {
            return;
        }
        self.splitter.push(&chunk);
        self.render(view);
    }

    /// End of stream: flush held bytes and the partial-marker carry, render
    /// one final time, and hand back the accumulated buffers.
    pub fn finish<V: ChatView>(mut self, view: &mut V) -> StreamOutcome {
        let tail = self.decoder.finish();
        if !tail.is_empty() {
            self.splitter.push(&tail);
        }
        self.splitter.finish();
        self.render(view);
        StreamOutcome {
            think_text: self.splitter.think_text,
            answer_body: self.splitter.response_text[self.splitter.preamble_len..].to_string(),
            think_done: self.splitter.think_done,
            failed: false,
        }
    }

    /// Stream failure: append one error entry to the transcript, re-render
    /// the transcript as formatted text, and stop. The error is swallowed.
    pub fn fail<V: ChatView>(
        self,
        error: &str,
        transcript: &mut Transcript,
        view: &mut V,
    ) -> StreamOutcome {
        transcript.push_error(error);
        view.show_transcript(&transcript.visible_text());
        view.scroll_to_bottom();
        StreamOutcome {
            think_text: self.splitter.think_text,
            answer_body: self.splitter.response_text[self.splitter.preamble_len..].to_string(),
            think_done: self.splitter.think_done,
            failed: true,
        }
    }

    fn render<V: ChatView>(&self, view: &mut V) {
        if self.splitter.think_done() {
            view.show_thinking_collapsed(self.splitter.think_text());
            view.show_answer(self.splitter.response_text());
        } else {
            view.show_thinking(self.splitter.think_text());
        }
        view.scroll_to_bottom();
    }
}

/// Pull-driven render loop over a blocking response body.
///
/// Reads chunks until end of stream or the first read error. One outstanding
/// read at a time; no cancellation, no timeout, no retry.
pub fn render_stream<R: Read, V: ChatView>(
    reader: &mut R,
    view: &mut V,
    transcript: &mut Transcript,
) -> StreamOutcome {
    let mut renderer = StreamRenderer::new();
    let mut buf = [0u8; READ_BUFFER_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return renderer.finish(view),
            Ok(n) => renderer.feed(&buf[..n], view),
            Err(e) => return renderer.fail(&e.to_string(), transcript, view),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Recording view for asserting render calls without a terminal.
    #[derive(Debug, Default)]
    struct RecordingView {
        thinking: Vec<String>,
        collapsed: Vec<String>,
        answers: Vec<String>,
        transcripts: Vec<String>,
        scrolls: usize,
    }

    impl ChatView for RecordingView {
        fn show_thinking(&mut self, markdown: &str) {
            self.thinking.push(markdown.to_string());
        }
        fn show_thinking_collapsed(&mut self, raw: &str) {
            self.collapsed.push(raw.to_string());
        }
        fn show_answer(&mut self, markdown: &str) {
            self.answers.push(markdown.to_string());
        }
        fn show_transcript(&mut self, text: &str) {
            self.transcripts.push(text.to_string());
        }
        fn scroll_to_bottom(&mut self) {
            self.scrolls += 1;
        }
    }

    /// Reader that yields fixed chunks, then an optional error.
    struct ChunkReader {
        chunks: Vec<Vec<u8>>,
        next: usize,
        fail_at_end: bool,
    }

    impl ChunkReader {
        fn new(chunks: &[&str]) -> Self {
            Self {
                chunks: chunks.iter().map(|c| c.as_bytes().to_vec()).collect(),
                next: 0,
                fail_at_end: false,
            }
        }

        fn failing(chunks: &[&str]) -> Self {
            let mut reader = Self::new(chunks);
            reader.fail_at_end = true;
            reader
        }
    }

    impl Read for ChunkReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.next >= self.chunks.len() {
                if self.fail_at_end {
                    return Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"));
                }
                return Ok(0);
            }
            let chunk = &self.chunks[self.next];
            self.next += 1;
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn test_decoder_passes_ascii_through() {
        let mut decoder = ChunkDecoder::new();
        assert_eq!(decoder.decode(b"hello"), "hello");
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn test_decoder_reassembles_split_multibyte() {
        // "论" is e8 ae ba
        let bytes = "论文".as_bytes();
        let mut decoder = ChunkDecoder::new();
        assert_eq!(decoder.decode(&bytes[..2]), "");
        assert_eq!(decoder.decode(&bytes[2..]), "论文");
    }

    #[test]
    fn test_decoder_substitutes_invalid_bytes() {
        let mut decoder = ChunkDecoder::new();
        let out = decoder.decode(&[b'a', 0xff, b'b']);
        assert_eq!(out, "a\u{FFFD}b");
    }

    #[test]
    fn test_decoder_finish_flushes_incomplete_tail() {
        let bytes = "文".as_bytes();
        let mut decoder = ChunkDecoder::new();
        assert_eq!(decoder.decode(&bytes[..1]), "");
        assert_eq!(decoder.finish(), "\u{FFFD}");
    }

    #[test]
    fn test_splitter_no_marker_routes_to_thinking_only() {
        let mut splitter = ThinkSplitter::new();
        splitter.push("first ");
        splitter.push("second");
        splitter.finish();
        assert!(!splitter.think_done());
        assert_eq!(splitter.think_text(), "first second");
        assert_eq!(splitter.answer_body(), "");
    }

    #[test]
    fn test_splitter_marker_in_single_chunk() {
        let mut splitter = ThinkSplitter::new();
        splitter.push("abc</think>def");
        assert!(splitter.think_done());
        assert_eq!(splitter.think_text(), "abc");
        assert_eq!(splitter.answer_body(), "def");
        assert_eq!(
            splitter.response_text(),
            format!("{}def", ANSWER_PREAMBLE)
        );
    }

    #[test]
    fn test_splitter_marker_split_across_chunks() {
        let mut splitter = ThinkSplitter::new();
        splitter.push("abc</th");
        // The partial marker is held back, not rendered as thinking text.
        assert_eq!(splitter.think_text(), "abc");
        assert!(!splitter.think_done());
        splitter.push("ink>def");
        assert!(splitter.think_done());
        assert_eq!(splitter.think_text(), "abc");
        assert_eq!(splitter.answer_body(), "def");
    }

    #[test]
    fn test_splitter_marker_split_one_byte_at_a_time() {
        let mut splitter = ThinkSplitter::new();
        for c in "abc</think>def".chars() {
            splitter.push(&c.to_string());
        }
        assert!(splitter.think_done());
        assert_eq!(splitter.think_text(), "abc");
        assert_eq!(splitter.answer_body(), "def");
    }

    #[test]
    fn test_splitter_false_marker_prefix_flushes() {
        let mut splitter = ThinkSplitter::new();
        splitter.push("abc</th");
        splitter.push("is is not a marker");
        assert!(!splitter.think_done());
        assert_eq!(splitter.think_text(), "abc</this is not a marker");
    }

    #[test]
    fn test_splitter_unresolved_carry_flushes_at_finish() {
        let mut splitter = ThinkSplitter::new();
        splitter.push("abc</think");
        assert_eq!(splitter.think_text(), "abc");
        splitter.finish();
        assert_eq!(splitter.think_text(), "abc</think");
        assert!(!splitter.think_done());
    }

    #[test]
    fn test_splitter_routes_everything_after_marker_to_answer() {
        let mut splitter = ThinkSplitter::new();
        splitter.push("x</think>");
        splitter.push("a</think>b");
        // A second marker is ordinary answer text; the transition is one-way.
        assert_eq!(splitter.answer_body(), "a</think>b");
    }

    #[test]
    fn test_trailing_marker_prefix_len() {
        assert_eq!(trailing_marker_prefix_len("abc"), 0);
        assert_eq!(trailing_marker_prefix_len("abc<"), 1);
        assert_eq!(trailing_marker_prefix_len("abc</th"), 4);
        assert_eq!(trailing_marker_prefix_len("abc</think"), 7);
        // `<` alone at the end of a longer `<` run still counts once.
        assert_eq!(trailing_marker_prefix_len("<<"), 1);
    }

    #[test]
    fn test_render_stream_no_marker_renders_thinking_only() {
        let mut reader = ChunkReader::new(&["all reasoning, ", "no answer"]);
        let mut view = RecordingView::default();
        let mut transcript = Transcript::new();
        let outcome = render_stream(&mut reader, &mut view, &mut transcript);

        assert!(!outcome.think_done);
        assert!(!outcome.failed);
        assert_eq!(outcome.think_text, "all reasoning, no answer");
        assert!(view.collapsed.is_empty());
        assert!(view.answers.is_empty());
        assert_eq!(view.thinking.last().unwrap(), "all reasoning, no answer");
    }

    #[test]
    fn test_render_stream_single_chunk_with_marker() {
        let mut reader = ChunkReader::new(&["abc</think>def"]);
        let mut view = RecordingView::default();
        let mut transcript = Transcript::new();
        let outcome = render_stream(&mut reader, &mut view, &mut transcript);

        assert!(outcome.think_done);
        assert_eq!(view.collapsed.last().unwrap(), "abc");
        assert_eq!(
            view.answers.last().unwrap(),
            &format!("{}def", ANSWER_PREAMBLE)
        );
        assert_eq!(outcome.answer_body, "def");
    }

    #[test]
    fn test_render_stream_detects_marker_split_across_chunks() {
        let mut reader = ChunkReader::new(&["abc</th", "ink>def"]);
        let mut view = RecordingView::default();
        let mut transcript = Transcript::new();
        let outcome = render_stream(&mut reader, &mut view, &mut transcript);

        assert!(outcome.think_done);
        assert_eq!(outcome.think_text, "abc");
        assert_eq!(outcome.answer_body, "def");
    }

    #[test]
    fn test_render_stream_scrolls_after_each_chunk() {
        let mut reader = ChunkReader::new(&["a", "b", "c"]);
        let mut view = RecordingView::default();
        let mut transcript = Transcript::new();
        render_stream(&mut reader, &mut view, &mut transcript);
        // Three chunks plus the final render at end of stream.
        assert_eq!(view.scrolls, 4);
    }

    #[test]
    fn test_render_stream_failure_appends_one_error_entry() {
        let mut reader = ChunkReader::failing(&["partial thinking"]);
        let mut view = RecordingView::default();
        let mut transcript = Transcript::new();
        transcript.push_user("hello");
        let before = transcript.len();

        let outcome = render_stream(&mut reader, &mut view, &mut transcript);

        assert!(outcome.failed);
        assert_eq!(transcript.len(), before + 1);
        let shown = view.transcripts.last().unwrap();
        assert!(shown.contains("hello"));
        assert!(shown.contains("connection reset"));
    }

    #[test]
    fn test_render_stream_reassembles_multibyte_across_chunks() {
        let text = "思考</think>结论";
        let bytes = text.as_bytes();
        // Split inside the first multi-byte character.
        let mut reader = ChunkReader {
            chunks: vec![bytes[..2].to_vec(), bytes[2..].to_vec()],
            next: 0,
            fail_at_end: false,
        };
        let mut view = RecordingView::default();
        let mut transcript = Transcript::new();
        let outcome = render_stream(&mut reader, &mut view, &mut transcript);

        assert_eq!(outcome.think_text, "思考");
        assert_eq!(outcome.answer_body, "结论");
    }

    #[test]
    fn test_outcome_assistant_text_prefers_answer() {
        let outcome = StreamOutcome {
            think_text: "reasoning".to_string(),
            answer_body: "answer".to_string(),
            think_done: true,
            failed: false,
        };
        assert_eq!(outcome.assistant_text(), "answer");
    }

    #[test]
    fn test_outcome_assistant_text_falls_back_to_thinking() {
        let outcome = StreamOutcome {
            think_text: "only reasoning".to_string(),
            answer_body: String::new(),
            think_done: false,
            failed: false,
        };
        assert_eq!(outcome.assistant_text(), "only reasoning");
    }
}
