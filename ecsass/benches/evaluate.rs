use criterion::{criterion_group, criterion_main, Criterion};
use ecsass::evaluator::{Evaluator, EvaluatorParams};
use ecsass::overlap::WindowPreference;
use ecsass::parser::parse;
use ecsass::resolver::MemoryResolver;
use ecsass::sequence::Sequence;
use lazy_static::lazy_static;

lazy_static! {
    static ref MOTIF: String = "ACGTTGCA".repeat(8);
    static ref INSERT_10K: Sequence = Sequence::new(format!(
        "{}{}{}",
        *MOTIF,
        "GATTACA".repeat(1420),
        *MOTIF
    ));
    static ref RESOLVER: MemoryResolver = MemoryResolver::new()
        .with("insert", INSERT_10K.clone())
        .with("LTR", "TGTGGAAAATCTCTAGCA".repeat(20).as_str());
}

const RECIPE: &str = "INV(FILE(LTR)) ~+ (FILE(insert)[:-10] ~* 4) + SEQ(ACGT) * 16 + FILE(LTR)![5:-5]";

fn parse_recipe(c: &mut Criterion) {
    c.bench_function("Parse recipe", |b| {
        b.iter(|| {
            let expr = parse(RECIPE).unwrap();
            assert!(!expr.is_term());
        })
    });
}

fn overlap_duplicate_10k(c: &mut Criterion) {
    let params = EvaluatorParams::builder()
        .window_preference(WindowPreference::largest_first(4, 100))
        .build();
    let evaluator = Evaluator::with_params(&*RESOLVER, params);

    c.bench_function("Overlap-duplicate 10k insert", |b| {
        b.iter(|| {
            let seq = evaluator.evaluate("FILE(insert) ~* 10").unwrap();
            assert_eq!(seq.len(), 10 * (INSERT_10K.len() - MOTIF.len()) + MOTIF.len());
        })
    });
}

fn evaluate_recipe(c: &mut Criterion) {
    let evaluator = Evaluator::new(&*RESOLVER);

    c.bench_function("Evaluate recipe", |b| {
        b.iter(|| {
            let seq = evaluator.evaluate(RECIPE).unwrap();
            assert!(!seq.is_empty());
        })
    });
}

criterion_group!(
    benches,
    parse_recipe,
    overlap_duplicate_10k,
    evaluate_recipe
);
criterion_main!(benches);
