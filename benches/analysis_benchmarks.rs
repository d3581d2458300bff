//! Benchmarks for lexing, scanning and completion.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pinelens_assist::{CompletionAssembler, CompletionRequest, ParameterInfoResolver};
use pinelens_buffer::SourceText;
use pinelens_scanner::scan_document;
use pinelens_syntax::tokenize;

/// Generates a script with `blocks` repetitions of a small indicator body.
fn generate_script(blocks: usize) -> String {
    let mut script = String::from("//@version=5\nindicator(\"Bench\", overlay = true)\n");
    for i in 0..blocks {
        script.push_str(&format!(
            "var float acc{i} = 0.0\n\
             length{i} = input.int(20, \"Length {i}\")\n\
             function band{i}(src, mult = 2.0) => ta.sma(src, length{i}) * mult\n\
             if close > acc{i}\n    acc{i} := close // running max\n\
             plot(band{i}(close), color = #2962FF)\n"
        ));
    }
    script
}

fn bench_lexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexing");

    for size in [10, 100, 1000].iter() {
        let script = generate_script(*size);
        group.bench_with_input(BenchmarkId::new("tokenize", size), &script, |b, script| {
            b.iter(|| black_box(tokenize(black_box(script))))
        });
    }

    group.finish();
}

fn bench_scanning(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanning");

    for size in [10, 100, 1000].iter() {
        let script = generate_script(*size);
        group.bench_with_input(BenchmarkId::new("scan_document", size), &script, |b, script| {
            b.iter(|| black_box(scan_document(black_box(script))))
        });
    }

    group.finish();
}

fn bench_completion(c: &mut Criterion) {
    let mut group = c.benchmark_group("completion");
    let assembler = CompletionAssembler::default();
    let resolver = ParameterInfoResolver::default();

    for size in [10, 100, 1000].iter() {
        let mut script = generate_script(*size);
        script.push_str("x = ta.");
        let request = CompletionRequest {
            text: &script,
            offset: script.len(),
            language: "pine",
        };
        group.bench_with_input(BenchmarkId::new("member_access", size), &request, |b, request| {
            b.iter(|| black_box(assembler.complete(black_box(request))))
        });

        let mut call = generate_script(*size);
        call.push_str("y = band0(close, ");
        group.bench_with_input(BenchmarkId::new("user_signature", size), &call, |b, call| {
            b.iter(|| black_box(resolver.resolve(black_box(call), call.len())))
        });
    }

    group.finish();
}

fn bench_line_lookup(c: &mut Criterion) {
    let script = generate_script(1000);
    let source = SourceText::new(&script);

    c.bench_function("line_of_middle_offset", |b| {
        b.iter(|| black_box(source.line_of(black_box(script.len() / 2))))
    });
}

criterion_group!(
    benches,
    bench_lexing,
    bench_scanning,
    bench_completion,
    bench_line_lookup,
);
criterion_main!(benches);
