use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lumen_rank::top_k;

fn scores(len: usize) -> Vec<f32> {
    (0..len as u32)
        .map(|i| (i.wrapping_mul(2_654_435_761) % 10_007) as f32 / 10_007.0)
        .collect()
}

fn bench_top_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_k");
    for len in [1_000usize, 21_843, 100_000] {
        let data = scores(len);
        group.bench_with_input(BenchmarkId::new("k5", len), &data, |b, data| {
            b.iter(|| top_k(black_box(data), 5).expect("valid k"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_top_k);
criterion_main!(benches);
