//! End-to-end scenarios for training, persisting and scoring reviews.

use review_sentiment::config::{FeaturizerConfig, TextSource, Weighting};
use review_sentiment::dataset::{LabeledReview, UnlabeledReview};
use review_sentiment::error::{Result, SentimentError};
use review_sentiment::loss::sigmoid;
use review_sentiment::pipeline::{InferencePipeline, ModelArtifact, TrainingPipeline};
use review_sentiment::preprocessing::FittedTransformer;
use review_sentiment::trainer::SdcaTrainer;

fn micro_reviews() -> Vec<LabeledReview> {
    vec![
        LabeledReview::new(true, "", "Great product"),
        LabeledReview::new(false, "", "Terrible service"),
        LabeledReview::new(true, "", "Loved it"),
        LabeledReview::new(false, "", "Awful experience"),
    ]
}

fn default_pipeline() -> TrainingPipeline {
    TrainingPipeline::new(
        FeaturizerConfig::default(),
        SdcaTrainer::builder().build().unwrap(),
        TextSource::Body,
    )
}

fn probe_texts() -> Vec<UnlabeledReview> {
    vec![
        UnlabeledReview::from_body("Loved the product"),
        UnlabeledReview::from_body("Terrible, awful service"),
        UnlabeledReview::from_body("great experience"),
        UnlabeledReview::from_body("quantum zebra"),
        UnlabeledReview::from_body(""),
    ]
}

#[test]
fn test_loved_the_product_is_positive() -> Result<()> {
    let artifact = default_pipeline().train(&micro_reviews())?;
    let inference = InferencePipeline::new(artifact)?;

    let prediction = inference.predict(&UnlabeledReview::from_body("Loved the product"))?;

    assert!(prediction.predicted_label);
    assert!(prediction.probability > 0.5);
    assert!(prediction.score > 0.0);
    Ok(())
}

#[test]
fn test_negative_words_score_negative() -> Result<()> {
    let artifact = default_pipeline().train(&micro_reviews())?;
    let inference = InferencePipeline::new(artifact)?;

    let prediction = inference.predict(&UnlabeledReview::from_body("terrible experience"))?;

    assert!(!prediction.predicted_label);
    assert!(prediction.probability < 0.5);
    Ok(())
}

#[test]
fn test_unseen_words_score_the_bias() -> Result<()> {
    let artifact = default_pipeline().train(&micro_reviews())?;
    let bias = artifact.classifier().bias();
    let inference = InferencePipeline::new(artifact)?;

    let prediction = inference.predict(&UnlabeledReview::from_body("quantum zebra xylophone"))?;

    assert!((prediction.score as f64 - bias).abs() < 1e-6);
    assert!((prediction.probability as f64 - sigmoid(bias)).abs() < 1e-6);
    // Balanced classes keep the prior near even odds.
    assert!((prediction.probability - 0.5).abs() < 0.05);
    Ok(())
}

#[test]
fn test_unseen_words_do_not_change_vector_length() -> Result<()> {
    let artifact = default_pipeline().train(&micro_reviews())?;
    let featurizer = artifact.featurizer();
    let n = featurizer.n_features_out();

    assert_eq!(featurizer.transform("great").len(), n);
    assert_eq!(featurizer.transform("great zebra unicorn").len(), n);
    assert_eq!(featurizer.transform("").len(), n);
    Ok(())
}

#[test]
fn test_transform_is_deterministic() -> Result<()> {
    let artifact = default_pipeline().train(&micro_reviews())?;
    for review in probe_texts() {
        assert_eq!(artifact.featurize(&review), artifact.featurize(&review));
    }
    Ok(())
}

#[test]
fn test_label_always_matches_probability() -> Result<()> {
    let artifact = default_pipeline().train(&micro_reviews())?;
    let inference = InferencePipeline::new(artifact)?;
    for prediction in inference.predict_batch(&probe_texts())? {
        assert_eq!(prediction.predicted_label, prediction.probability >= 0.5);
        assert!((0.0..=1.0).contains(&prediction.probability));
    }
    Ok(())
}

#[test]
fn test_save_load_gives_identical_predictions() -> std::result::Result<(), Box<dyn std::error::Error>>
{
    let pipeline = TrainingPipeline::new(
        FeaturizerConfig::default().with_weighting(Weighting::TfIdf),
        SdcaTrainer::builder().build()?,
        TextSource::TitleAndBody,
    );
    let artifact = pipeline.train(&micro_reviews())?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("model.bin");
    artifact.save_to_file(&path)?;
    let loaded = ModelArtifact::load_from_file(&path)?;

    assert_eq!(loaded.text_source(), TextSource::TitleAndBody);
    assert_eq!(loaded.featurizer().vocabulary(), artifact.featurizer().vocabulary());

    let original = InferencePipeline::new(artifact)?;
    let restored = InferencePipeline::new(loaded)?;
    for review in probe_texts() {
        let a = original.predict(&review)?;
        let b = restored.predict(&review)?;
        assert_eq!(a.predicted_label, b.predicted_label);
        assert!((a.probability - b.probability).abs() < 1e-5);
        assert!((a.score - b.score).abs() < 1e-5);
    }
    Ok(())
}

#[test]
fn test_single_class_dataset_is_insufficient() {
    let rows = vec![
        LabeledReview::new(false, "", "Terrible service"),
        LabeledReview::new(false, "", "Awful experience"),
    ];
    let err = default_pipeline().train(&rows).unwrap_err();
    assert!(matches!(err, SentimentError::InsufficientData(_)));
}

#[test]
fn test_empty_dataset_is_rejected() {
    let err = default_pipeline().train(&[]).unwrap_err();
    assert!(matches!(err, SentimentError::EmptyDataset(_)));
}

#[test]
fn test_training_is_reproducible() -> Result<()> {
    let a = default_pipeline().train(&micro_reviews())?;
    let b = default_pipeline().train(&micro_reviews())?;
    assert_eq!(a.extract_params(), b.extract_params());
    Ok(())
}

#[test]
fn test_corrupted_artifact_file_is_invalid() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("model.bin");
    std::fs::write(&path, b"definitely not a model")?;

    let err = ModelArtifact::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SentimentError::InvalidArtifact(_)));
    Ok(())
}

#[test]
fn test_mismatched_artifact_params_are_invalid() -> Result<()> {
    let artifact = default_pipeline().train(&micro_reviews())?;
    let mut params = artifact.extract_params();
    params.classifier.weights.pop();

    let err = ModelArtifact::from_params(params).unwrap_err();
    assert!(matches!(err, SentimentError::InvalidArtifact(_)));
    Ok(())
}
