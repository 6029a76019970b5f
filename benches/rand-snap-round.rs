use criterion::*;
use geo_snap_round::{Config, SnapRounder};

#[path = "utils/random.rs"]
mod random;
use rand::thread_rng;
use random::*;

const GRID: i64 = 1024;

fn uniform_sr(c: &mut Criterion) {
    let mut group = c.benchmark_group("snap round - uniform random rings");
    for log_n in (6..11).step_by(2) {
        let n = 1 << log_n;
        let ring = random_ring(&mut thread_rng(), n, GRID);
        group.bench_with_input(BenchmarkId::from_parameter(n), &ring, |b, ring| {
            b.iter(|| SnapRounder::default().run(black_box(ring)).unwrap().coords().len())
        });
    }
    group.finish();
}

fn star_sr(c: &mut Criterion) {
    let mut group = c.benchmark_group("snap round - star rings");
    for log_n in (6..13).step_by(2) {
        let n = 1 << log_n;
        let ring = star_ring(&mut thread_rng(), n, GRID as f64);
        group.bench_with_input(BenchmarkId::new("plain", n), &ring, |b, ring| {
            b.iter(|| SnapRounder::default().run(black_box(ring)).unwrap().coords().len())
        });
        group.bench_with_input(BenchmarkId::new("topology", n), &ring, |b, ring| {
            b.iter(|| {
                SnapRounder::new(Config::default().link_topology(true))
                    .run(black_box(ring))
                    .unwrap()
                    .coords()
                    .len()
            })
        });
    }
    group.finish();
}

criterion_group!(random, uniform_sr, star_sr);
criterion_main!(random);
