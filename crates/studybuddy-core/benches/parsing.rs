use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use studybuddy_core::entities::parse_term_list;
use studybuddy_core::model::Entity;
use studybuddy_core::question::{assemble_question, parse_generation};

fn bench_parse_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_generation");
    let entity = Entity::from("Mitochondria");

    let well_formed = "Question: Which organelle produces most ATP?\n\
                       Answer: Mitochondria\n\
                       Distractors: Ribosome, Golgi apparatus, Lysosome";

    let chatty = {
        let mut s = String::from("Sure! Here is a question about the material.\n\n");
        for i in 0..30 {
            s.push_str(&format!("Note {i}: the cell has many parts.\n"));
        }
        s.push_str("Question: What is the powerhouse of the cell?\nAnswer: Mitochondria\n");
        s
    };

    let no_markers = "Mitochondria are the powerhouse of the cell.";

    group.bench_function("well_formed", |b| {
        b.iter(|| parse_generation(black_box(well_formed), &entity))
    });

    group.bench_function("chatty", |b| {
        b.iter(|| parse_generation(black_box(&chatty), &entity))
    });

    group.bench_function("no_markers", |b| {
        b.iter(|| parse_generation(black_box(no_markers), &entity))
    });

    group.bench_function("assemble_with_padding", |b| {
        let material = "Mitochondria convert nutrients into adenosine triphosphate inside cells.";
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| {
            let parsed = parse_generation(black_box(chatty.as_str()), &entity);
            assemble_question(parsed, material, &mut rng)
        })
    });

    group.finish();
}

fn bench_term_list(c: &mut Criterion) {
    let list: String = (0..100).map(|i| format!("{i}. Term number {i}\n")).collect();

    c.bench_function("parse_term_list", |b| {
        b.iter(|| parse_term_list(black_box(&list)))
    });
}

criterion_group!(benches, bench_parse_generation, bench_term_list);
criterion_main!(benches);
