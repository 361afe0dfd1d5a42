use std::fmt::Write;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

struct Corpus {
    name: &'static str,
    source: String,
}

fn build_flat_corpus() -> String {
    let mut src = String::with_capacity(256_000);

    for i in 0..5_000usize {
        let _ = writeln!(src, "key_{i}: implicit value {i}");
    }

    src
}

fn build_nested_corpus() -> String {
    let mut src = String::with_capacity(256_000);

    for i in 0..1_500usize {
        let _ = writeln!(
            src,
            "entry_{i}: {{\n  id: {i}\n  tags: [ a, b, c ]\n  nested: {{ deep: true }}\n}}"
        );
    }

    src
}

fn build_commented_corpus() -> String {
    let mut src = String::with_capacity(256_000);

    for i in 0..1_500usize {
        let _ = writeln!(src, "// header {i}");
        let _ = writeln!(src, "member_{i}: {i} // eol {i}");
        let _ = writeln!(src);
    }

    src
}

fn corpora() -> Vec<Corpus> {
    vec![
        Corpus {
            name: "flat",
            source: build_flat_corpus(),
        },
        Corpus {
            name: "nested",
            source: build_nested_corpus(),
        },
        Corpus {
            name: "commented",
            source: build_commented_corpus(),
        },
    ]
}

fn bench_parser(c: &mut Criterion) {
    let corpora = corpora();

    let mut group = c.benchmark_group("parser");
    for corpus in &corpora {
        group.throughput(Throughput::Bytes(corpus.source.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(corpus.name),
            &corpus.source,
            |b, source| {
                b.iter(|| {
                    let value = xjs::parse(source).expect("benchmark corpus parses");
                    black_box(value)
                });
            },
        );
    }
    group.finish();
}

fn bench_json_parser(c: &mut Criterion) {
    let mut src = String::with_capacity(256_000);
    src.push('{');
    for i in 0..5_000usize {
        if i > 0 {
            src.push(',');
        }
        let _ = write!(src, "\"key_{i}\": [{i}, \"text {i}\", true]");
    }
    src.push('}');

    let mut group = c.benchmark_group("json_parser");
    group.throughput(Throughput::Bytes(src.len() as u64));
    group.bench_function("strict", |b| {
        b.iter(|| {
            let value = xjs::parse_json(&src).expect("benchmark corpus parses");
            black_box(value)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_parser, bench_json_parser);
criterion_main!(benches);
