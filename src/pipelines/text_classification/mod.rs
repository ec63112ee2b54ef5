use burn::backend::{Autodiff, NdArray};

/// Featurized training items
pub mod item;

/// Batcher
pub mod batcher;

/// Classifier wrapper around the logistic regression model
pub mod classifier;

/// Training
pub mod training;

/// Inference
pub mod inference;

/// The fitted vectorizer and classifier as a single service context
pub mod pipeline;

pub use batcher::Batcher;
pub use classifier::{Classifier, ClassifierError};
pub use inference::{featurize, predict};
pub use item::Item;
pub use pipeline::{Pipeline, Predictor};
pub use training::{load_data, train, Config};

/// CPU backend used for inference
pub type Backend = NdArray<f32>;

/// CPU backend with automatic differentiation, used for training
pub type TrainingBackend = Autodiff<Backend>;
