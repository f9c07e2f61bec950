//! Criterion benchmarks for the routing hot path.
//!
//! Key metrics:
//! - Per-message routing cost for samples, console text and mixed traffic
//! - Raw transcript appends once the window is full
//!
//! Run with: cargo bench --bench stream_router

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serial_scope::config::EngineConfig;
use serial_scope::data::ring_buffer::RawRingBuffer;
use serial_scope::{Channel, Message, StreamRouter};

fn traffic(kind: &str, count: usize) -> Vec<Message> {
    (0..count)
        .map(|i| {
            let text = match kind {
                "samples" => format!("temp:{}\n", i % 100),
                "console" => format!("status line {}\n", i % 7),
                _ if i % 2 == 0 => format!("acc:{}\n", i),
                _ => "ready\n".to_string(),
            };
            Message::simulated(format!("src-{}", i % 4), text)
        })
        .collect()
}

/// Routing throughput for different traffic mixes.
fn router_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("router_route");
    let count = 1_000;

    for kind in ["samples", "console", "mixed"] {
        let messages = traffic(kind, count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("route", kind), &messages, |b, messages| {
            let mut router = StreamRouter::new(&EngineConfig::default(), Channel::Simulator);
            b.iter(|| {
                for message in messages {
                    black_box(router.route(black_box(message)));
                }
            });
        });
    }

    group.finish();
}

/// Appending to a full raw transcript.
fn raw_buffer_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("raw_buffer_append");

    for (name, size) in [("16B", 16), ("256B", 256), ("4KB", 4096)] {
        let chunk = "x".repeat(size);
        let mut rb = RawRingBuffer::new(5000);
        rb.append(&"y".repeat(5000));

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("append", name), &chunk, |b, chunk| {
            b.iter(|| rb.append(black_box(chunk)));
        });
    }

    group.finish();
}

criterion_group!(benches, router_throughput, raw_buffer_append);
criterion_main!(benches);
