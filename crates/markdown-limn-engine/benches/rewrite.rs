use criterion::{Criterion, criterion_group, criterion_main};
use markdown_limn_engine::{FontSpec, render};

fn generate_markup(paragraphs: usize) -> String {
    let mut out = String::new();
    for i in 0..paragraphs {
        out.push_str(&format!(
            "Paragraph {i} with **bold words**, __italic spans__, ~~old text~~ and ```marked``` parts.\n"
        ));
    }
    out
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewrite");
    group.sample_size(10);

    let font = FontSpec::new("Helvetica", 14.0);
    let content = generate_markup(100);
    group.bench_function("render_100_paragraphs", |b| {
        b.iter(|| {
            let styled = render(std::hint::black_box(&content), &font, None, 0).unwrap();
            std::hint::black_box(styled);
        });
    });

    let long_line = generate_markup(1).repeat(50).replace('\n', " ");
    group.bench_function("render_single_long_line", |b| {
        b.iter(|| {
            let styled = render(std::hint::black_box(&long_line), &font, None, 280).unwrap();
            std::hint::black_box(styled);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
