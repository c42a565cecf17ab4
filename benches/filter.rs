use bibtex_refman::{Criterion as Field, FieldName, Query, Reference};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SURNAMES: &[&str] = &[
    "Doe", "Roe", "Vihavainen", "Collins", "Brown", "Holum", "Luukkainen", "Kurhila",
];
const JOURNALS: &[&str] = &["American Educator", "Tech Journal", "ACM Inroads"];

fn generate_references(n: usize, rng: &mut StdRng) -> Vec<Reference> {
    (0..n)
        .map(|i| {
            let authors: Vec<String> = (0..rng.gen_range(1..4))
                .map(|_| {
                    let surname = SURNAMES.choose(rng).copied().unwrap_or("Doe");
                    format!("Author{} {surname}", rng.gen_range(0..100))
                })
                .collect();
            let year = rng.gen_range(1990..2025).to_string();
            let base = Reference::article()
                .with(FieldName::Author, authors.join(", "))
                .and_then(|r| r.with(FieldName::Title, format!("Study number {i}")))
                .and_then(|r| r.with(FieldName::Year, year))
                .unwrap();
            if i % 4 == 0 {
                let mut paper = Reference::inproceedings();
                paper.assign(FieldName::Author, base.author()).unwrap();
                paper.assign(FieldName::Title, base.title()).unwrap();
                paper.assign(FieldName::Year, base.year()).unwrap();
                paper.assign(FieldName::BookTitle, "SIGCSE '11").unwrap();
                paper
            } else {
                let journal = JOURNALS.choose(rng).copied().unwrap_or("Tech Journal");
                base.with(FieldName::Journal, journal).unwrap()
            }
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut group = c.benchmark_group("filter");

    let queries = [
        ("substring_author", Query::new().with(Field::Author, "doe")),
        (
            "exact_authors",
            Query::new().with(Field::Author, "\"Author7 Doe\", roe"),
        ),
        (
            "journal_and_year",
            Query::new()
                .with(Field::Journal, "educator")
                .with(Field::Year, "2011"),
        ),
    ];

    for size in [100, 1000, 10_000] {
        let references = generate_references(size, &mut rng);
        for (name, query) in &queries {
            group.bench_with_input(BenchmarkId::new(*name, size), &references, |b, refs| {
                b.iter(|| {
                    let hits = query.apply(black_box(refs));
                    black_box(hits);
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
