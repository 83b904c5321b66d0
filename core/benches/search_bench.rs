use criterion::{criterion_group, criterion_main, Criterion};
use vecrank::normalize::{Normalizer, StemNormalizer};
use vecrank::{Index, Model, Query};

const TEXT: &str = "Quantum computers exploit superposition and entanglement. \
    Machine learning systems learn statistical patterns from data. \
    Robots combine sensing, planning and actuation in the physical world. \
    Cells are the basic structural unit of every living organism.";

fn corpus() -> Vec<Vec<String>> {
    TEXT.split(". ")
        .cycle()
        .take(400)
        .enumerate()
        .map(|(i, s)| StemNormalizer.normalize(&format!("{s} document{i}")))
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_paragraph", |b| b.iter(|| StemNormalizer.normalize(TEXT)));
}

fn bench_search(c: &mut Criterion) {
    let docs = corpus();
    let query = Query::parse("quantum or robot").unwrap();
    for model in Model::ALL {
        let index = Index::build(&docs, model).unwrap();
        c.bench_function(&format!("search_{model}"), |b| b.iter(|| index.search(&query)));
    }
    c.bench_function("build_cosine", |b| b.iter(|| Index::build(&docs, Model::Cosine)));
}

criterion_group!(benches, bench_normalize, bench_search);
criterion_main!(benches);
