/// A marker type indicating that a model is **not yet trained**.
///
/// Used as the state parameter of [`LinearClassifier`](crate::model::linear::LinearClassifier):
/// - Training (`SdcaTrainer::fit`) requires an `Unfitted` model and consumes it.
/// - Inference methods (`predict`) are **not available** until the model is `Fitted`.
#[derive(Debug, Clone, Copy)]
pub struct Unfitted;

/// A marker type indicating that a model has been **fully trained**.
///
/// A `Fitted` model contains **only inference parameters** (weights and bias); no
/// dual variables, shuffle state or training hyperparameters survive fitting.
/// Its parameters can no longer change.
#[derive(Debug, Clone, Copy)]
pub struct Fitted;
