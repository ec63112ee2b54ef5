use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spam_classifier::{
    models::TfidfVectorizer,
    pipelines::text_classification::{featurize, predict, train, Classifier, Config},
};

const CORPUS: &[(&str, usize)] = &[
    ("Hello friend, are we still on for lunch?", 0),
    ("WIN FREE CASH NOW, text CLAIM to 80082", 1),
    ("Can you pick up milk on the way home", 0),
    ("Congratulations! You have been selected for a free cruise", 1),
    ("Running late, see you in ten minutes", 0),
    ("URGENT: your account has a prize waiting, call now", 1),
];

fn fitted() -> (TfidfVectorizer, Classifier) {
    let texts: Vec<&str> = CORPUS.iter().map(|(text, _)| *text).collect();
    let labels: Vec<usize> = CORPUS.iter().map(|(_, label)| *label).collect();

    let mut vectorizer = TfidfVectorizer::default();
    let features = vectorizer.fit_transform(&texts).unwrap();

    let mut classifier = Classifier::new(Config::new().with_num_epochs(20));
    train(&features, &labels, &mut classifier).unwrap();

    (vectorizer, classifier)
}

fn bench_featurize(c: &mut Criterion) {
    let (vectorizer, classifier) = fitted();
    let text: &[&str] = &["Claim your FREE prize now, friend"];

    c.bench_function("featurize", |b| {
        b.iter(|| featurize(black_box(text), &vectorizer).unwrap())
    });

    c.bench_function("featurize + predict", |b| {
        b.iter(|| {
            let features = featurize(black_box(text), &vectorizer).unwrap();
            predict(&features, &classifier).unwrap()
        })
    });
}

criterion_group!(benches, bench_featurize);
criterion_main!(benches);
