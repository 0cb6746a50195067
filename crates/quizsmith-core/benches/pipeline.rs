use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizsmith_core::concepts::extract_concepts;
use quizsmith_core::engine::QuizEngine;
use quizsmith_core::facts::extract_facts;
use quizsmith_core::normalize::normalize;

const SHORT_LESSON: &str = "\
    Photosynthesis is the process by which plants convert sunlight into chemical energy. \
    Chlorophyll is the green pigment that captures light inside plant cells. \
    Respiration causes plants to release stored energy during the night. \
    Deforestation leads to soil erosion and habitat loss in many regions.";

fn long_lesson() -> String {
    let paragraph = "\
        The water cycle is the continuous movement of water through the environment. \
        Evaporation causes surface water to rise into the atmosphere as vapor. \
        Condensation leads to the formation of clouds high above the ground. \
        Precipitation is the process that returns water to the surface as rain or snow. \
        Rivers carry runoff water back toward the oceans over many days.\n\n";
    paragraph.repeat(40)
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let long = long_lesson();

    group.bench_function("short", |b| b.iter(|| normalize(black_box(SHORT_LESSON))));
    group.bench_function("long", |b| b.iter(|| normalize(black_box(&long))));

    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");
    let long = long_lesson();
    let normalized = normalize(&long).unwrap();

    group.bench_function("concepts", |b| {
        b.iter(|| extract_concepts(black_box(&normalized), None))
    });
    group.bench_function("facts", |b| b.iter(|| extract_facts(black_box(&normalized))));

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let long = long_lesson();
    let engine = QuizEngine::rule_only();

    group.bench_function("short,n=5", |b| {
        b.iter(|| engine.generate(black_box(SHORT_LESSON), black_box(5)))
    });
    group.bench_function("long,n=10", |b| {
        b.iter(|| engine.generate(black_box(&long), black_box(10)))
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_extraction, bench_generate);
criterion_main!(benches);
