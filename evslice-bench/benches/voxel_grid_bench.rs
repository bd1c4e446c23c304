use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use evslice_core::kernels::voxel_grid::to_voxel_grid;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DURATION: i64 = 100_000;

struct Columns {
    xs: Vec<f32>,
    ys: Vec<f32>,
    ts: Vec<i64>,
    ps: Vec<i8>,
}

fn make_columns(n: usize, w: usize, h: usize, seed: u64) -> Columns {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cols = Columns {
        xs: Vec::with_capacity(n),
        ys: Vec::with_capacity(n),
        ts: Vec::with_capacity(n),
        ps: Vec::with_capacity(n),
    };
    for i in 0..n {
        let t = if n > 1 {
            ((i as i64) * DURATION) / ((n - 1) as i64)
        } else {
            0
        };
        // Sub-pixel coordinates, as the rectifier would produce.
        cols.xs.push(rng.gen_range(0.0..w as f32 - 1.0));
        cols.ys.push(rng.gen_range(0.0..h as f32 - 1.0));
        cols.ts.push(t);
        cols.ps.push(if rng.gen_bool(0.5) { 1i8 } else { -1i8 });
    }
    cols
}

pub fn voxel_grid_bench(c: &mut Criterion) {
    let sizes = [(346usize, 260usize), (640, 480)];
    let counts = [5_000usize, 10_000, 50_000];
    let num_bins = [4usize, 8usize];

    let mut group = c.benchmark_group("voxel_grid");

    for &(w, h) in &sizes {
        for &n in &counts {
            let seed = 0xC0FFEE ^ ((w as u64) << 32) ^ ((h as u64) << 16) ^ (n as u64);
            let cols = make_columns(n, w, h, seed);
            for &nb in &num_bins {
                group.throughput(Throughput::Elements(n as u64));
                let id = BenchmarkId::new(format!("{}x{}-n{}-B{}", w, h, n, nb), "");
                group.bench_with_input(id, &cols, |b, cols| {
                    b.iter(|| {
                        let out = to_voxel_grid(
                            black_box(&cols.xs),
                            black_box(&cols.ys),
                            black_box(&cols.ts),
                            black_box(&cols.ps),
                            w,
                            h,
                            nb,
                            None,
                            false,
                        )
                        .unwrap();
                        black_box(out);
                    });
                });
            }
        }
    }

    group.finish();
}

criterion_group!(benches, voxel_grid_bench);
criterion_main!(benches);
