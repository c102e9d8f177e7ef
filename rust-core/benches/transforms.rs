//! Transform and batch-operation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use waveform_workbench::gate::{GateConfig, GatePipeline};
use waveform_workbench::records::{envelope, smooth_records};
use waveform_workbench::spectrum::fft_in_place;
use waveform_workbench::spectrum::EnvelopeConfig;

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft");

    for size in [256usize, 1024, 4096, 16384].iter() {
        let re: Vec<f64> = (0..*size).map(|i| (i as f64 * 0.01).sin()).collect();

        group.bench_with_input(BenchmarkId::new("forward", size), &re, |b, signal| {
            b.iter(|| {
                let mut re = signal.clone();
                let mut im = vec![0.0; re.len()];
                fft_in_place(black_box(&mut re), black_box(&mut im), true)
            });
        });
    }

    group.finish();
}

fn bench_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("records");

    // 256 records of 500 samples: a Gaussian-modulated burst that moves across records
    let record_length = 500;
    let samples: Vec<f64> = (0..256 * record_length)
        .map(|k| {
            let record = (k / record_length) as f64;
            let t = (k % record_length) as f64 - 200.0 - 0.2 * record;
            (-t * t / 400.0).exp() * (0.7 * t).cos()
        })
        .collect();

    group.bench_with_input(BenchmarkId::new("envelope", record_length), &samples, |b, s| {
        b.iter(|| envelope(black_box(s), record_length, &EnvelopeConfig::default()));
    });

    group.bench_with_input(BenchmarkId::new("smooth", record_length), &samples, |b, s| {
        b.iter(|| smooth_records(black_box(s), record_length, 0.05, 1.0));
    });

    let pipeline = GatePipeline::new(GateConfig {
        threshold: 0.5,
        ..GateConfig::default()
    })
    .unwrap();
    group.bench_with_input(BenchmarkId::new("gate_pipeline", record_length), &samples, |b, s| {
        b.iter(|| pipeline.run(black_box(s), record_length));
    });

    group.finish();
}

criterion_group!(benches, bench_fft, bench_records);
criterion_main!(benches);
