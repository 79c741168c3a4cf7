// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lasercut_preview::geometry::{csg_difference, extrude_profile, Primitive, Profile};
use lasercut_preview::pipeline::classify;
use lasercut_preview::{svg, Pipeline, PreviewConfig};
use nalgebra::{Point2, Vector3};
use std::fmt::Write;

/// Plate with `n` evenly spaced round holes
fn perforated_plate(n: usize) -> String {
    let mut svg = String::from(r#"<svg viewBox="0 0 200 100"><path d="M0 0 H200 V100 H0 Z"/>"#);
    for i in 0..n {
        let cx = 200.0 * (i as f64 + 0.5) / n as f64;
        let _ = write!(svg, r#"<circle cx="{:.3}" cy="50" r="4"/>"#, cx);
    }
    svg.push_str("</svg>");
    svg
}

fn ring(radius: f64, segments: usize) -> Vec<Point2<f64>> {
    (0..segments)
        .map(|i| {
            let a = std::f64::consts::TAU * i as f64 / segments as f64;
            Point2::new(radius * a.cos(), radius * a.sin())
        })
        .collect()
}

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");
    let config = PreviewConfig::default();

    for holes in [1, 8, 32] {
        let markup = perforated_plate(holes);
        group.bench_with_input(BenchmarkId::new("plate", holes), &markup, |b, markup| {
            b.iter(|| svg::decompose(black_box(markup), &config));
        });
    }

    let curvy = r#"<svg><path d="M0 0 C 20 -20 40 20 60 0 S 100 20 120 0 Q 140 40 120 80 A 40 40 0 0 1 0 80 Z"/></svg>"#;
    group.bench_function("curves", |b| {
        b.iter(|| svg::decompose(black_box(curvy), &config));
    });

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let config = PreviewConfig::default();
    let shapes = svg::decompose(&perforated_plate(32), &config);

    c.bench_function("classify_32_holes", |b| {
        b.iter(|| classify(black_box(shapes.clone()), config.hole_area_ratio));
    });
}

fn bench_extrude(c: &mut Criterion) {
    let mut group = c.benchmark_group("extrude");

    for segments in [32, 128, 512] {
        let profile = Profile::new(ring(40.0, segments));
        group.bench_with_input(
            BenchmarkId::new("disc", segments),
            &profile,
            |b, profile| {
                b.iter(|| extrude_profile(black_box(profile), 1.0));
            },
        );
    }

    let mut washer = Profile::new(ring(40.0, 128));
    washer.add_hole(&ring(15.0, 64));
    group.bench_function("washer", |b| {
        b.iter(|| extrude_profile(black_box(&washer), 1.0));
    });

    group.finish();
}

fn bench_csg(c: &mut Criterion) {
    let mut group = c.benchmark_group("csg");

    let slab = Primitive::cube(Vector3::new(80.0, 40.0, 1.0), true).to_mesh();
    for segments in [16, 32, 64] {
        let cutter = Primitive::cylinder(3.0, 8.0, segments, true).to_mesh();
        group.bench_with_input(
            BenchmarkId::new("slab_minus_cylinder", segments),
            &cutter,
            |b, cutter| {
                b.iter(|| csg_difference(black_box(&slab), black_box(cutter)));
            },
        );
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);

    let pipeline = Pipeline::new();
    for holes in [0, 1, 4, 8] {
        let markup = perforated_plate(holes);
        group.bench_with_input(BenchmarkId::new("render", holes), &markup, |b, markup| {
            b.iter(|| pipeline.render(black_box(markup), Some(3.0)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_decompose,
    bench_classify,
    bench_extrude,
    bench_csg,
    bench_pipeline
);
criterion_main!(benches);
