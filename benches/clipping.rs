use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use windowpane::bench::{
    bezier, sutherland_hodgman, weiler_atherton, CohenSutherland, LiangBarsky, LineClipper,
};
use windowpane::clipper::ClipRect;
use windowpane::math::Vec3;

fn window() -> ClipRect {
    ClipRect::centered(800.0, 600.0)
}

/// Segments fanning out from inside the window, about half of them crossing
/// its border.
fn segments() -> Vec<(Vec3, Vec3)> {
    (0..360)
        .map(|deg| {
            let angle = (deg as f64).to_radians();
            let reach = if deg % 2 == 0 { 300.0 } else { 900.0 };
            (
                Vec3::xy(20.0 * angle.cos(), 20.0 * angle.sin()),
                Vec3::xy(reach * angle.cos(), reach * angle.sin()),
            )
        })
        .collect()
}

/// Regular convex polygon centered on the window.
fn regular_polygon(sides: usize, radius: f64) -> Vec<Vec3> {
    (0..sides)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / sides as f64;
            Vec3::xy(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn benchmark_line_clippers(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_clipping");
    let rect = window();
    let segments = segments();

    let clippers: [(&str, &dyn LineClipper); 2] = [
        ("cohen_sutherland", &CohenSutherland),
        ("liang_barsky", &LiangBarsky),
    ];
    for (name, clipper) in clippers {
        group.bench_function(BenchmarkId::new(name, segments.len()), |b| {
            b.iter(|| {
                segments
                    .iter()
                    .filter_map(|&(p, q)| clipper.clip_line(black_box(p), black_box(q), &rect))
                    .count()
            });
        });
    }

    group.finish();
}

fn benchmark_polygon_clippers(c: &mut Criterion) {
    let mut group = c.benchmark_group("polygon_clipping");
    let rect = window();

    for sides in [8, 64, 512] {
        let polygon = regular_polygon(sides, 450.0);

        group.bench_with_input(BenchmarkId::new("weiler_atherton", sides), &polygon, |b, poly| {
            b.iter(|| weiler_atherton(black_box(poly), &rect));
        });

        group.bench_with_input(
            BenchmarkId::new("sutherland_hodgman", sides),
            &polygon,
            |b, poly| {
                b.iter(|| sutherland_hodgman(black_box(poly), &rect));
            },
        );
    }

    group.finish();
}

fn benchmark_curve_tessellation(c: &mut Criterion) {
    let control: Vec<Vec3> = (0..31)
        .map(|i| Vec3::xy(i as f64 * 20.0, if i % 2 == 0 { 0.0 } else { 100.0 }))
        .collect();

    c.bench_function("bezier_10_segments", |b| {
        b.iter(|| bezier(black_box(&control), 0.01));
    });
}

criterion_group!(
    benches,
    benchmark_line_clippers,
    benchmark_polygon_clippers,
    benchmark_curve_tessellation
);
criterion_main!(benches);
