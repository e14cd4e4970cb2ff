use std::hint::black_box;

use benchmarks::SyntheticReviews;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use review_sentiment::config::{FeaturizerConfig, TextSource, Weighting};
use review_sentiment::preprocessing::{TextFeaturizer, Transformer};
use review_sentiment::pipeline::TrainingPipeline;
use review_sentiment::trainer::SdcaTrainer;

fn pipeline(featurizer: FeaturizerConfig) -> TrainingPipeline {
    let trainer = SdcaTrainer::builder()
        .max_epochs(20)
        .build()
        .expect("valid trainer settings");
    TrainingPipeline::new(featurizer, trainer, TextSource::Body)
}

fn bench_train_corpus_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("train");
    for n in [100usize, 1_000, 5_000].iter() {
        let reviews = SyntheticReviews::new(42).labeled(*n);
        let training = pipeline(FeaturizerConfig::default());
        group.bench_with_input(BenchmarkId::new("reviews", n), n, |b, _| {
            b.iter(|| {
                let artifact = training
                    .train(black_box(&reviews))
                    .expect("training succeeds");
                black_box(artifact)
            });
        });
    }
    group.finish();
}

fn bench_train_weighting(c: &mut Criterion) {
    let reviews = SyntheticReviews::new(42).labeled(1_000);
    let mut group = c.benchmark_group("train_weighting");
    for (name, weighting) in [("tf", Weighting::TermFrequency), ("tfidf", Weighting::TfIdf)] {
        let training = pipeline(FeaturizerConfig::default().with_weighting(weighting));
        group.bench_function(name, |b| {
            b.iter(|| black_box(training.train(black_box(&reviews)).expect("training succeeds")));
        });
    }
    group.finish();
}

fn bench_fit_featurizer(c: &mut Criterion) {
    let corpus: Vec<String> = SyntheticReviews::new(3)
        .labeled(5_000)
        .into_iter()
        .map(|r| r.body)
        .collect();
    let featurizer = TextFeaturizer::new(FeaturizerConfig::default());

    c.bench_function("fit_featurizer_5000", |b| {
        b.iter(|| black_box(featurizer.fit(black_box(&corpus)).expect("fit succeeds")));
    });
}

criterion_group!(
    benches,
    bench_train_corpus_size,
    bench_train_weighting,
    bench_fit_featurizer
);
criterion_main!(benches);
