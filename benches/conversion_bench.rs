//! Conversion performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stlconv::*;
use std::fs;
use tempfile::TempDir;

const AD_TEMPLATE: &str = r##"<style>
.ad { background: <tagd:style name="CustomResultsAdUrlBackGround" value="#ffffff" type="color" />; }
.ad-title { color: <tagd:style name="CMResultsAdTitle" value="#1a0dab" type="color" />; }
.arrow-cta {
    border: 1px solid <tagd:style name="AdBorder" value="#cccccc" type="color" />;
    background: <tagd:style type="color" name="CMAdsLabel" value="#0066cc" />;
}
@media (min-width: 768px) {
    .arrow-cta { border-color: <tagd:style name="AdBorder" value="#999999" type="color" />; }
}
</style>
<div class="ad"><a class="ad-title"><tagd:style type="content" name="CallToAction" value="Learn more" /></a></div>
"##;

fn bench_simple_conversion(c: &mut Criterion) {
    c.bench_function("simple_conversion", |b| {
        b.iter(|| convert(black_box(AD_TEMPLATE)))
    });
}

fn bench_large_document_conversion(c: &mut Criterion) {
    // Many repeated ad blocks: every block after the first collides
    let mut content = String::new();
    for _ in 0..500 {
        content.push_str(AD_TEMPLATE);
    }

    c.bench_function("large_document_conversion", |b| {
        b.iter(|| convert(black_box(&content)))
    });
}

fn bench_file_conversion(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("ad.html");
    let output_path = temp_dir.path().join("ad.converted.html");
    fs::write(&input_path, AD_TEMPLATE).unwrap();

    let options = ConverterOptions::default();
    c.bench_function("file_conversion", |b| {
        b.iter(|| {
            convert_file(
                black_box(input_path.to_str().unwrap()),
                black_box(output_path.to_str().unwrap()),
                black_box(&options),
            )
            .unwrap()
        })
    });
}

fn bench_property_operations(c: &mut Criterion) {
    let converted = convert(AD_TEMPLATE);

    let mut group = c.benchmark_group("property_operations");
    group.bench_function("extract_properties", |b| {
        b.iter(|| extract_properties(black_box(&converted)))
    });
    group.bench_function("substitute_defaults", |b| {
        b.iter(|| substitute_defaults(black_box(&converted)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_simple_conversion,
    bench_large_document_conversion,
    bench_file_conversion,
    bench_property_operations
);
criterion_main!(benches);
