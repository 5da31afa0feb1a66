use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geo_topology::{cascaded_union, node, triangulate, PrecisionModel, SnapRoundingNoder};
use geo_types::{Coord, Geometry, LineString, Polygon};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn grid_lines(n: usize) -> Vec<Geometry<f64>> {
    let mut lines = Vec::new();
    for i in 0..=n {
        lines.push(
            LineString::from(vec![(0.0, i as f64), (n as f64, i as f64)]).into(),
        );
        lines.push(
            LineString::from(vec![(i as f64, 0.0), (i as f64, n as f64)]).into(),
        );
    }
    lines
}

fn random_squares(n: usize, seed: u64) -> Vec<Polygon<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let x = rng.gen_range(0.0..100.0);
            let y = rng.gen_range(0.0..100.0);
            let w = rng.gen_range(1.0..8.0);
            Polygon::new(
                LineString::from(vec![
                    (x, y),
                    (x + w, y),
                    (x + w, y + w),
                    (x, y + w),
                    (x, y),
                ]),
                vec![],
            )
        })
        .collect()
}

fn random_sites(n: usize, seed: u64) -> Vec<Coord<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Coord {
            x: rng.gen_range(0.0..1000.0),
            y: rng.gen_range(0.0..1000.0),
        })
        .collect()
}

fn bench_noding(c: &mut Criterion) {
    let mut group = c.benchmark_group("noding");
    group.sample_size(10);
    for size in [10, 20, 40].iter() {
        group.bench_with_input(BenchmarkId::new("grid", size), size, |b, &size| {
            let lines = grid_lines(size);
            b.iter(|| node(&lines).unwrap());
        });
    }
    group.finish();
}

fn bench_snap_rounding(c: &mut Criterion) {
    let mut group = c.benchmark_group("snap_rounding");
    group.sample_size(10);
    let lines = grid_lines(20);
    let strings: Vec<_> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, g)| match g {
            Geometry::LineString(ls) => {
                Some(geo_topology::SegmentString::new(ls.0.clone(), i))
            }
            _ => None,
        })
        .collect();
    let noder = SnapRoundingNoder::new(PrecisionModel::fixed(100.0));
    group.bench_function("grid_20", |b| b.iter(|| noder.node(&strings).unwrap()));
    group.finish();
}

fn bench_cascaded_union(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascaded_union");
    group.sample_size(10);
    for size in [16, 64, 256].iter() {
        group.bench_with_input(BenchmarkId::new("squares", size), size, |b, &size| {
            let polys = random_squares(size, 1);
            b.iter(|| cascaded_union(&polys).unwrap());
        });
    }
    group.finish();
}

fn bench_triangulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulation");
    group.sample_size(10);
    for size in [100, 1000, 5000].iter() {
        group.bench_with_input(BenchmarkId::new("random", size), size, |b, &size| {
            let sites = random_sites(size, 2);
            b.iter(|| triangulate(&sites).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_noding,
    bench_snap_rounding,
    bench_cascaded_union,
    bench_triangulation
);
criterion_main!(benches);
