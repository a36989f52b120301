//! Performance benchmarks for papertalk.
//!
//! Run with: cargo bench
//!
//! These benchmarks measure the hot paths of the streaming renderer:
//! - Chunk decoding and marker splitting
//! - The full render loop over a buffered body
//! - Markdown rendering
//! - Transcript text assembly

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use papertalk::stream::{render_stream, ChatView, ChunkDecoder, ThinkSplitter};
use papertalk::transcript::Transcript;
use papertalk::tui::markdown;

/// View that discards every render call.
struct NullView;

impl ChatView for NullView {
    fn show_thinking(&mut self, _markdown: &str) {}
    fn show_thinking_collapsed(&mut self, _raw: &str) {}
    fn show_answer(&mut self, _markdown: &str) {}
    fn show_transcript(&mut self, _text: &str) {}
    fn scroll_to_bottom(&mut self) {}
}

fn bench_splitter(c: &mut Criterion) {
    let mut group = c.benchmark_group("splitter");
    for chunks in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("push", chunks), &chunks, |b, &chunks| {
            b.iter(|| {
                let mut splitter = ThinkSplitter::new();
                for i in 0..chunks {
                    if i == chunks / 2 {
                        splitter.push("</think>");
                    }
                    splitter.push(black_box("a modest chunk of response text "));
                }
                splitter.finish();
                black_box(splitter.think_done())
            });
        });
    }
    group.finish();
}

fn bench_decoder(c: &mut Criterion) {
    let body = "思考中，这是一段多字节文本。".repeat(64);
    let bytes = body.as_bytes();
    c.bench_function("decoder_multibyte", |b| {
        b.iter(|| {
            let mut decoder = ChunkDecoder::new();
            let mut total = 0usize;
            for chunk in bytes.chunks(7) {
                total += decoder.decode(black_box(chunk)).len();
            }
            black_box(total)
        });
    });
}

fn bench_render_stream(c: &mut Criterion) {
    let mut body = "reasoning ".repeat(200);
    body.push_str("</think>");
    body.push_str(&"answer text ".repeat(200));
    let bytes = body.into_bytes();

    c.bench_function("render_stream_buffered", |b| {
        b.iter(|| {
            let mut reader = Cursor::new(bytes.clone());
            let mut view = NullView;
            let mut transcript = Transcript::new();
            black_box(render_stream(&mut reader, &mut view, &mut transcript))
        });
    });
}

fn bench_markdown(c: &mut Criterion) {
    let text = "# Heading\n\nSome **bold** text with `code` spans.\n- one\n- two\n".repeat(20);
    c.bench_function("markdown_render", |b| {
        b.iter(|| black_box(markdown::render(black_box(&text))));
    });
}

fn bench_transcript(c: &mut Criterion) {
    let mut transcript = Transcript::new();
    for i in 0..50 {
        transcript.push_user(format!("question {i}"));
        transcript.push_assistant("an answer of reasonable length ".repeat(8));
    }
    c.bench_function("transcript_visible_text", |b| {
        b.iter(|| black_box(transcript.visible_text()));
    });
}

criterion_group!(
    benches,
    bench_splitter,
    bench_decoder,
    bench_render_stream,
    bench_markdown,
    bench_transcript
);
criterion_main!(benches);
