//! Benchmarks for pixel scaling, hit-testing and the measure pass.

use std::rc::Rc;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lumen_chart::prelude::*;
use lumen_chart::{AxisOrientation, Bounds, Scaler};
use lumen_test_utils::{ManualClock, RecordingHost, RecordingSurface};

fn line_chart(samples: usize) -> Chart {
    let values = (0..samples).map(|i| ((i as f64) * 0.1).sin() * 100.0);
    Chart::cartesian()
        .config(
            ChartConfig::default()
                .without_animations()
                .with_update_throttle(Duration::ZERO)
                .with_draw_margin(Margin::zero()),
        )
        .host(Rc::new(RecordingHost::new()))
        .clock(Rc::new(ManualClock::new()))
        .series(Series::builder(SeriesKind::Line).values(values).build())
        .size(1920.0, 1080.0)
        .build()
        .expect("chart should build")
}

fn bench_scaler(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaler");

    for size in [1_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));
        let scaler = Scaler::new(
            Vec2::new(40.0, 0.0),
            Vec2::new(1880.0, 1040.0),
            AxisOrientation::Y,
            Bounds::new(-250.0, 1e4),
            false,
        );
        let values: Vec<f64> = (0..size).map(|i| i as f64 * 0.1).collect();

        group.bench_with_input(BenchmarkId::new("to_pixels", size), &values, |b, values| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &value in values {
                    sum += scaler.to_pixels(black_box(value));
                }
                sum
            });
        });

        group.bench_with_input(BenchmarkId::new("round_trip", size), &values, |b, values| {
            b.iter(|| {
                let mut sum = 0.0f64;
                for &value in values {
                    sum += scaler.to_chart_values(scaler.to_pixels(black_box(value)));
                }
                sum
            });
        });
    }

    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("points_at");

    for samples in [100, 10_000] {
        let chart = line_chart(samples);
        chart.draw_frame(&mut RecordingSurface::new());

        for strategy in [FindingStrategy::NearestPrimary, FindingStrategy::NearestBoth] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", strategy), samples),
                &samples,
                |b, _| {
                    b.iter(|| {
                        chart
                            .points_at(
                                black_box(Vec2::new(960.0, 540.0)),
                                strategy,
                                FindPointFor::HoverEvent,
                            )
                            .map(|hits| hits.len())
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("measure");

    for samples in [100, 10_000] {
        group.throughput(Throughput::Elements(samples as u64));
        let chart = line_chart(samples);
        let mut surface = RecordingSurface::new();

        group.bench_with_input(BenchmarkId::from_parameter(samples), &samples, |b, _| {
            b.iter(|| {
                chart.update();
                chart.draw_frame(&mut surface);
                surface.clear();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scaler, bench_hit_test, bench_measure);
criterion_main!(benches);
