use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lumen_core::Size;
use lumen_preprocess::{Preprocessor, ResizeFilter};
use lumen_test_utils::gradient_image;

fn bench_preprocess(c: &mut Criterion) {
    let source = gradient_image(1280, 720);
    let mut group = c.benchmark_group("preprocess_720p");
    for filter in [
        ResizeFilter::Nearest,
        ResizeFilter::Bilinear,
        ResizeFilter::Bicubic,
    ] {
        let pre = Preprocessor::new(Size::square(256), Size::square(224), filter)
            .expect("valid geometry");
        group.bench_with_input(BenchmarkId::from_parameter(filter), &source, |b, image| {
            b.iter(|| pre.apply(black_box(image)).expect("preprocess"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_preprocess);
criterion_main!(benches);
