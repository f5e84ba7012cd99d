//! Benchmarks for the wire codec and the line strategy
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use liveplotter::config::StrategySettings;
use liveplotter::figure::Figure;
use liveplotter::protocol::{decode_frame, encode_frame, Message};
use liveplotter::strategy::{build_strategy, StrategyKind};
use liveplotter::types::{Matrix, Topic, Value};

fn bench_scalar_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_frame");
    let topic = Topic::new("sine").unwrap();
    let message = Message::Data(Value::from((0.7071, 12.5)));
    let parts = encode_frame(&topic, &message).unwrap();

    group.throughput(Throughput::Elements(1));
    group.bench_function("encode", |b| {
        b.iter(|| encode_frame(black_box(&topic), black_box(&message)).unwrap())
    });
    group.bench_function("decode", |b| {
        b.iter(|| decode_frame(black_box(&parts)).unwrap())
    });
    group.finish();
}

fn bench_matrix_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix_frame");
    let topic = Topic::new("divtime").unwrap();

    for size in [50usize, 200, 500].iter() {
        let data = (0..size * size).map(|i| (i % 97) as f64).collect();
        let matrix = Matrix::new(*size, *size, data).unwrap();
        let message = Message::Data(Value::Matrix(matrix));
        let parts = encode_frame(&topic, &message).unwrap();

        group.throughput(Throughput::Bytes(parts[1].len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &message, |b, message| {
            b.iter(|| encode_frame(&topic, black_box(message)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &parts, |b, parts| {
            b.iter(|| decode_frame(black_box(parts)).unwrap())
        });
    }
    group.finish();
}

fn bench_line_plot_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_plot_loop");

    for frequency in [1u32, 10, 100].iter() {
        group.throughput(Throughput::Elements(1_000));
        group.bench_with_input(
            BenchmarkId::new("1000_values", frequency),
            frequency,
            |b, &frequency| {
                b.iter(|| {
                    let settings = StrategySettings::default().with_plot_frequency(frequency);
                    let mut strategy = build_strategy(StrategyKind::Line, &settings);
                    let mut figure = Figure::new();
                    strategy.init(&mut figure).unwrap();
                    for i in 0..1_000u64 {
                        let value = Value::Scalar((i as f64 * 0.01).sin());
                        black_box(strategy.plot_loop(&value, i, &mut figure).unwrap());
                    }
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_scalar_frames,
    bench_matrix_frames,
    bench_line_plot_loop
);
criterion_main!(benches);
