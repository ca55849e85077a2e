use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use findmark_core::{
    Document, FindConfig, FindEngine, HighlightManager, MemoryPreferences, Preferences, Rect,
    SearchOptions, Viewport, compile, scan,
};

fn large_page(paragraph_count: usize) -> Document {
    let mut doc = Document::new(Viewport::new(1280.0, 800.0));
    for i in 0..paragraph_count {
        let p = doc.append_element(doc.root(), "p").unwrap();
        doc.append_text(
            p,
            &format!("{i:06} the quick brown fox jumps over the lazy dog (findmark benchmark)"),
        )
        .unwrap();
        doc.set_rect(p, Rect::new(0.0, i as f64 * 24.0, 900.0, 20.0))
            .unwrap();
    }
    doc
}

fn bench_scan(c: &mut Criterion) {
    let doc = large_page(20_000);
    let options = SearchOptions::default();
    let rule = compile("fox", options).unwrap().unwrap();
    c.bench_function("scan/20k_paragraphs", |b| {
        b.iter(|| black_box(scan(black_box(&doc), &rule, options)))
    });

    let regex = SearchOptions {
        use_regex: true,
        ..options
    };
    let rule = compile(r"\b0+1\d{2}\b", regex).unwrap().unwrap();
    c.bench_function("scan/20k_paragraphs_regex", |b| {
        b.iter(|| black_box(scan(black_box(&doc), &rule, regex)))
    });
}

fn bench_materialize_and_clear(c: &mut Criterion) {
    let doc = large_page(5_000);
    let options = SearchOptions::default();
    let rule = compile("o", options).unwrap().unwrap();
    let ranges = scan(&doc, &rule, options);

    c.bench_function("materialize_clear/5k_paragraphs", |b| {
        b.iter_batched(
            || (doc.clone(), HighlightManager::new(&FindConfig::default())),
            |(mut doc, mut marks)| {
                black_box(marks.materialize(&mut doc, &ranges));
                marks.clear(&mut doc);
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_typing_query(c: &mut Criterion) {
    let doc = large_page(5_000);
    c.bench_function("set_query/typing_5_chars", |b| {
        b.iter_batched(
            || {
                let engine = FindEngine::new(MemoryPreferences::new(Preferences::default()));
                (doc.clone(), engine)
            },
            |(mut doc, mut engine)| {
                engine.open(&mut doc);
                let mut query = String::new();
                for ch in "jumps".chars() {
                    query.push(ch);
                    engine.set_query(&mut doc, &query);
                }
                engine.run_deferred(&mut doc);
                black_box(engine.status());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_scan,
    bench_materialize_and_clear,
    bench_typing_query
);
criterion_main!(benches);
