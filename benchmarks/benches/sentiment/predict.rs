use std::hint::black_box;

use benchmarks::SyntheticReviews;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use review_sentiment::config::{FeaturizerConfig, TextSource};
use review_sentiment::dataset::UnlabeledReview;
use review_sentiment::pipeline::{InferencePipeline, TrainingPipeline};
use review_sentiment::trainer::SdcaTrainer;

/// Train a model once for prediction benchmarks
fn trained_pipeline() -> InferencePipeline {
    let reviews = SyntheticReviews::new(42).labeled(2_000);
    let trainer = SdcaTrainer::builder().build().expect("valid trainer settings");
    let artifact = TrainingPipeline::new(FeaturizerConfig::default(), trainer, TextSource::Body)
        .train(&reviews)
        .expect("training succeeds");
    InferencePipeline::new(artifact).expect("consistent artifact")
}

fn bench_predict_single(c: &mut Criterion) {
    let pipeline = trained_pipeline();
    let review = UnlabeledReview::from_body("loved the product and the delivery was fast");

    c.bench_function("predict_single", |b| {
        b.iter(|| black_box(pipeline.predict(black_box(&review)).expect("prediction")));
    });
}

fn bench_predict_batch(c: &mut Criterion) {
    let pipeline = trained_pipeline();

    let mut group = c.benchmark_group("predict_batch");
    for batch_size in [10usize, 100, 1_000, 10_000].iter() {
        let reviews = SyntheticReviews::new(7).unlabeled(*batch_size);
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            batch_size,
            |b, _| {
                b.iter(|| {
                    black_box(
                        pipeline
                            .predict_batch(black_box(&reviews))
                            .expect("prediction"),
                    )
                });
            },
        );
    }
    group.finish();
}

fn bench_predict_sequential(c: &mut Criterion) {
    let pipeline = trained_pipeline();
    let reviews = SyntheticReviews::new(7).unlabeled(1_000);

    c.bench_function("predict_sequential_1000", |b| {
        b.iter(|| {
            for review in &reviews {
                black_box(pipeline.predict(black_box(review)).expect("prediction"));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_predict_single,
    bench_predict_batch,
    bench_predict_sequential
);
criterion_main!(benches);
