use std::{collections::BTreeSet, path::Path};

use burn::{
    data::{dataloader::DataLoaderBuilder, dataset::InMemDataset},
    module::AutodiffModule,
    optim::{AdamWConfig, GradientsParams, Optimizer},
    tensor::{backend::AutodiffBackend, ElementConversion},
    LearningRate,
};
use log::{debug, info};

use crate::{
    datasets::spam_or_ham,
    models::{FeatureMatrix, LogisticRegression, LogisticRegressionConfig, TfidfVectorizer},
};

use super::{Batcher, Classifier, ClassifierError, Item};

/// Define configuration struct for training
#[derive(burn::config::Config, Debug)]
pub struct Config {
    /// Batch size
    #[config(default = 64)]
    pub batch_size: usize,

    /// Number of epochs
    #[config(default = 100)]
    pub num_epochs: usize,

    /// Initial learning rate
    #[config(default = 1e-1)]
    pub learning_rate: LearningRate,

    /// Inverse L2 regularization strength
    #[config(default = 1.0)]
    pub c: f64,

    /// Seed for shuffling batches
    #[config(default = 42)]
    pub seed: u64,
}

/// Load a labeled CSV file and fit a TF-IDF vectorizer over every message.
///
/// Returns the training feature matrix, the class id of each row, and the fitted vectorizer.
pub fn load_data<P: AsRef<Path>>(
    path: P,
) -> anyhow::Result<(FeatureMatrix, Vec<usize>, TfidfVectorizer)> {
    let path = path.as_ref();
    info!("Loading data from {}", path.display());

    let dataset = spam_or_ham::Dataset::load(path)
        .map_err(|e| anyhow!("Unable to load dataset {}: {}", path.display(), e))?;

    let labels = dataset.labels();

    let mut vectorizer = TfidfVectorizer::default();
    let features = vectorizer
        .fit_transform(&dataset.texts())
        .map_err(|e| anyhow!("Unable to fit vectorizer: {}", e))?;

    info!(
        "Loaded {} messages with a vocabulary of {} terms",
        labels.len(),
        features.n_features()
    );

    Ok((features, labels, vectorizer))
}

/// Fit `model` in place on every row of `features` and return it.
pub fn train<'a>(
    features: &FeatureMatrix,
    labels: &[usize],
    model: &'a mut Classifier,
) -> Result<&'a mut Classifier, ClassifierError> {
    info!("Training model on {} messages", labels.len());

    model.fit(features, labels)
}

/// Check that a training set can be fit by a classifier with `n_classes` outputs
pub fn validate(
    features: &FeatureMatrix,
    labels: &[usize],
    n_classes: usize,
) -> Result<(), ClassifierError> {
    if features.n_rows() != labels.len() {
        return Err(ClassifierError::LengthMismatch {
            features: features.n_rows(),
            labels: labels.len(),
        });
    }

    if labels.is_empty() || features.n_features() == 0 {
        return Err(ClassifierError::Empty);
    }

    if let Some(&label) = labels.iter().find(|&&label| label >= n_classes) {
        return Err(ClassifierError::UnknownLabel(label));
    }

    let distinct: BTreeSet<usize> = labels.iter().copied().collect();
    if distinct.len() < 2 {
        return Err(ClassifierError::SingleClass);
    }

    Ok(())
}

/// Run the optimization loop and return the fitted model on the inner backend
pub fn fit<B: AutodiffBackend>(
    features: &FeatureMatrix,
    labels: &[usize],
    model_config: &LogisticRegressionConfig,
    config: &Config,
    device: &B::Device,
) -> Result<LogisticRegression<B::InnerBackend>, ClassifierError> {
    validate(features, labels, model_config.n_classes)?;

    let n_samples = labels.len();

    let items = features
        .rows()
        .iter()
        .cloned()
        .zip(labels.iter().copied())
        .map(|(row, label)| Item::new(row, label))
        .collect();

    let batcher = Batcher::<B>::new(features.n_features(), device.clone());

    let dataloader = DataLoaderBuilder::new(batcher)
        .batch_size(config.batch_size.max(1))
        .shuffle(config.seed)
        .build(InMemDataset::new(items));

    let mut model = model_config.init::<B>(device);

    // Explicit L2 term in the loss replaces AdamW's decoupled decay
    let mut optim = AdamWConfig::new()
        .with_weight_decay(0.0)
        .init::<B, LogisticRegression<B>>();

    for epoch in 1..=config.num_epochs {
        let mut epoch_loss = 0.0;
        let mut batches = 0;

        for batch in dataloader.iter() {
            let output = model.forward_classification(batch.inputs, batch.targets, n_samples);

            epoch_loss += output.loss.clone().into_scalar().elem::<f64>();
            batches += 1;

            let grads = output.loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);

            model = optim.step(config.learning_rate, model, grads);
        }

        debug!(
            "Epoch {}/{}: loss {:.5}",
            epoch,
            config.num_epochs,
            epoch_loss / batches.max(1) as f64
        );
    }

    Ok(model.valid())
}
