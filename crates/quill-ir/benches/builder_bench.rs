//! Benchmarks for Quill circuit construction
//!
//! Run with: cargo bench -p quill-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use quill_ir::{Circuit, Container, Register};
use std::f64::consts::PI;

/// Benchmark single-gate appends
fn bench_gate_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_append");

    group.bench_function("h_gate", |b| {
        let mut circuit = Circuit::with_registers("bench", 10, 0);
        let q = Register::quantum("q", 10);
        b.iter(|| {
            circuit.h(black_box(&q.bit(0))).unwrap();
        });
    });

    group.bench_function("rx_gate", |b| {
        let mut circuit = Circuit::with_registers("bench", 10, 0);
        let q = Register::quantum("q", 10);
        b.iter(|| {
            circuit.rx(black_box(PI / 4.0), black_box(&q.bit(0))).unwrap();
        });
    });

    group.bench_function("cx_gate", |b| {
        let mut circuit = Circuit::with_registers("bench", 10, 0);
        let q = Register::quantum("q", 10);
        b.iter(|| {
            circuit.cx(black_box(&q.bit(0)), black_box(&q.bit(1))).unwrap();
        });
    });

    group.finish();
}

/// Benchmark whole-register application
fn bench_whole_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("whole_register");

    for size in &[2u32, 5, 10, 50] {
        group.bench_with_input(BenchmarkId::new("h_all", size), size, |b, &n| {
            b.iter(|| {
                let mut circuit = Circuit::with_registers("bench", n, 0);
                circuit.h_all(black_box("q")).unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark GHZ circuit creation and rendering
fn bench_ghz(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz");

    for size in &[3u32, 10, 50] {
        group.bench_with_input(BenchmarkId::new("create", size), size, |b, &n| {
            b.iter(|| Circuit::ghz(black_box(n)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("render", size), size, |b, &n| {
            let circuit = Circuit::ghz(n).unwrap();
            b.iter(|| black_box(circuit.render()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gate_append, bench_whole_register, bench_ghz);
criterion_main!(benches);
