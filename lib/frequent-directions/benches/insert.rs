use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use frequent_directions::FrequentDirections;
use ndarray::Array2;
use rand::SeedableRng as _;
use rand_distr::{Distribution as _, StandardNormal};

fn make_rows(count: usize, dimension: usize) -> Array2<f64> {
    let seed = 0xC0FFEE;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    Array2::from_shape_simple_fn((count, dimension), || StandardNormal.sample(&mut rng))
}

fn bench_insert(c: &mut Criterion) {
    let rows = 1_000;
    let shapes = [(4, 32), (8, 64), (16, 128), (32, 256)];

    let mut group = c.benchmark_group("frequent-directions/insert");
    for (ell, dimension) in shapes {
        let input = make_rows(rows, dimension);

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("ell={}/M={}", ell, dimension)),
            &input,
            |b, input| {
                b.iter(|| {
                    let mut sketch = FrequentDirections::new(ell, None).expect("sketch parameters should be valid");
                    sketch.add_rows(input.view()).expect("rows should be accepted");
                    sketch.finalize().expect("sketch should be finalizable")
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_insert);
criterion_main!(benches);
