use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use xmldoc::Document;

/// A wide and moderately deep document: `sections` sections of 20 entries, each with a few fields.
fn build(sections: usize) -> Document {
    let mut document = Document::with_root("catalog").unwrap();
    let mut root = document.root_mut();
    for s in 0..sections {
        let mut section = root.add_tag("section").unwrap();
        section.add_attribute("index", s as i64).unwrap();
        for e in 0..20 {
            let mut entry = section.add_tag("entry").unwrap();
            entry.add_attribute("id", format!("{s}-{e}")).unwrap();
            entry.add_value_tag("title", "Programação Avançada").unwrap();
            entry.add_value_tag("ects", 6.0).unwrap();
            entry.add_value_tag("active", e % 2 == 0).unwrap();
        }
    }
    document
}

fn serialize(document: &Document) {
    let _ = document.serialize();
}

fn search(document: &Document) {
    let _ = document.search("entry/ects");
}

fn criterion_benchmark(c: &mut Criterion) {
    let document = build(50);

    c.bench_function("serialize", |b| b.iter(|| serialize(black_box(&document))));

    c.bench_function("search", |b| b.iter(|| search(black_box(&document))));

    c.bench_function("build", |b| b.iter(|| build(black_box(50))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
