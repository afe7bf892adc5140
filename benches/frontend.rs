mod common;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use exprlang::config::FrontendConfig;
use exprlang::{frontend, lexer, parser, semantic};

fn bench_frontend(c: &mut Criterion) {
    let config = FrontendConfig::default();
    for (label, path) in common::workloads() {
        let source = common::load_source(&path);
        let tokens = lexer::tokenize(&source);
        let tree = common::load_tree(&source, &label);

        c.bench_function(&format!("frontend_tokenize_{label}"), |b| {
            b.iter(|| {
                let out = lexer::tokenize(black_box(&source));
                black_box(out);
            })
        });

        c.bench_function(&format!("frontend_parse_only_{label}"), |b| {
            b.iter(|| {
                let out = parser::parse_tokens(black_box(&tokens)).expect("parse");
                black_box(out);
            })
        });

        c.bench_function(&format!("frontend_analyze_only_{label}"), |b| {
            b.iter(|| {
                let mut tree = tree.clone();
                let out = semantic::analyze(black_box(&mut tree));
                black_box(out);
            })
        });

        c.bench_function(&format!("frontend_full_{label}"), |b| {
            b.iter(|| {
                let out = frontend::run(black_box(&source), &config);
                black_box(out);
            })
        });
    }
}

criterion_group!(benches, bench_frontend);
criterion_main!(benches);
