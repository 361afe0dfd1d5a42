use std::fmt::Write;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xjs::syntax::tokenizer::Tokenizer;

struct Corpus {
    name: &'static str,
    source: String,
}

fn build_member_heavy_corpus() -> String {
    let mut src = String::with_capacity(256_000);

    for i in 0..4_000usize {
        let _ = writeln!(src, "key_{i}: value number {i}");
        let _ = writeln!(src, "num_{i}: {}.5", i);
        let _ = writeln!(src, "flag_{i}: true");
    }

    src
}

fn build_comment_heavy_corpus() -> String {
    let mut src = String::with_capacity(256_000);

    for i in 0..3_000usize {
        let _ = writeln!(src, "// line comment {i}");
        let _ = writeln!(src, "x_{i}: {i} // trailing comment");
        let _ = writeln!(src, "/* block comment {} {} */", i, i + 1);
        let _ = writeln!(src, "# hash comment {i}");
        let _ = writeln!(src, "y_{i}: {i}");
    }

    src
}

fn build_string_heavy_corpus() -> String {
    let mut src = String::with_capacity(256_000);

    for i in 0..2_000usize {
        let _ = writeln!(src, "single_{i}: 'quoted value {i}'");
        let _ = writeln!(src, "double_{i}: \"escaped \\n value {i}\"");
        let _ = writeln!(src, "multi_{i}:\n  '''\n  line a {i}\n  line b\n  '''");
    }

    src
}

fn bench_tokenizer(c: &mut Criterion) {
    let corpora = [
        Corpus {
            name: "members",
            source: build_member_heavy_corpus(),
        },
        Corpus {
            name: "comments",
            source: build_comment_heavy_corpus(),
        },
        Corpus {
            name: "strings",
            source: build_string_heavy_corpus(),
        },
    ];

    let mut group = c.benchmark_group("tokenizer");
    for corpus in &corpora {
        group.throughput(Throughput::Bytes(corpus.source.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(corpus.name),
            &corpus.source,
            |b, source| {
                b.iter(|| {
                    let mut count = 0usize;
                    for token in Tokenizer::new(source.as_str()) {
                        let token = token.expect("benchmark corpus tokenizes");
                        count += 1;
                        black_box(&token);
                    }
                    count
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_tokenizer);
criterion_main!(benches);
