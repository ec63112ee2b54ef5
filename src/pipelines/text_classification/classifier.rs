use std::sync::{Mutex, PoisonError};

use crate::{
    datasets::spam_or_ham::Category,
    models::{FeatureMatrix, LogisticRegression, LogisticRegressionConfig},
    utils::{
        classes::argmax_rows,
        tensors::{dense_from_sparse, rows_from_tensor},
    },
};

use super::{training, Backend, TrainingBackend};

/// Classifier Error
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ClassifierError {
    /// The classifier was used before being fitted
    #[error("the classifier has not been fitted")]
    NotFitted,

    /// Features and labels have different lengths
    #[error("found {features} feature rows but {labels} labels")]
    LengthMismatch {
        /// Number of feature rows
        features: usize,
        /// Number of labels
        labels: usize,
    },

    /// There is nothing to train on
    #[error("cannot fit on an empty training set")]
    Empty,

    /// Only one class is present in the labels
    #[error("training data must contain at least two classes")]
    SingleClass,

    /// A label is outside the known class ids
    #[error("unknown class id {0}")]
    UnknownLabel(usize),

    /// Features come from a different feature space than the one fitted
    #[error("expected {expected} features, found {found}")]
    FeatureMismatch {
        /// Width the model was fitted on
        expected: usize,
        /// Width of the given matrix
        found: usize,
    },
}

/// A fitted model and the configuration it was built from.
///
/// Burn parameters initialize lazily and are not `Sync`, so the module sits behind a lock
/// and callers work on clones, which share the underlying weights.
#[derive(Debug)]
struct Fitted {
    config: LogisticRegressionConfig,
    model: Mutex<LogisticRegression<Backend>>,
}

impl Fitted {
    fn new(config: LogisticRegressionConfig, model: LogisticRegression<Backend>) -> Self {
        Self {
            config,
            model: Mutex::new(model),
        }
    }

    /// A clone of the model. Nothing mutates it in place, so a poisoned lock is still usable.
    fn model(&self) -> LogisticRegression<Backend> {
        self.model
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clone for Fitted {
    fn clone(&self) -> Self {
        Self::new(self.config.clone(), self.model())
    }
}

/// A binary message classifier backed by a logistic regression model
#[derive(Debug, Clone)]
pub struct Classifier {
    config: training::Config,
    fitted: Option<Fitted>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(training::Config::new())
    }
}

impl Classifier {
    /// Create an unfitted classifier
    pub fn new(config: training::Config) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    /// Wrap an already-fitted model
    pub fn from_model(
        config: training::Config,
        model_config: LogisticRegressionConfig,
        model: LogisticRegression<Backend>,
    ) -> Self {
        Self {
            config,
            fitted: Some(Fitted::new(model_config, model)),
        }
    }

    /// The training configuration
    pub fn config(&self) -> &training::Config {
        &self.config
    }

    /// Whether `fit` has completed
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn fitted(&self) -> Result<&Fitted, ClassifierError> {
        self.fitted.as_ref().ok_or(ClassifierError::NotFitted)
    }

    /// The configuration of the fitted model
    pub fn model_config(&self) -> Result<&LogisticRegressionConfig, ClassifierError> {
        Ok(&self.fitted()?.config)
    }

    /// A handle to the fitted model
    pub fn model(&self) -> Result<LogisticRegression<Backend>, ClassifierError> {
        Ok(self.fitted()?.model())
    }

    /// Fit on every row of `features`, replacing any previous fit
    pub fn fit(
        &mut self,
        features: &FeatureMatrix,
        labels: &[usize],
    ) -> Result<&mut Self, ClassifierError> {
        let model_config = LogisticRegressionConfig::new(features.n_features())
            .with_n_classes(Category::ALL.len())
            .with_c(self.config.c);

        let device = Default::default();
        let model = training::fit::<TrainingBackend>(
            features,
            labels,
            &model_config,
            &self.config,
            &device,
        )?;

        self.fitted = Some(Fitted::new(model_config, model));

        Ok(self)
    }

    /// Per-class probabilities for each row
    pub fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<Vec<f32>>, ClassifierError> {
        let fitted = self.fitted()?;

        if features.n_features() != fitted.config.n_features {
            return Err(ClassifierError::FeatureMismatch {
                expected: fitted.config.n_features,
                found: features.n_features(),
            });
        }

        if features.is_empty() {
            return Ok(Vec::new());
        }

        let device = Default::default();
        let inputs = dense_from_sparse::<Backend>(features.rows(), features.n_features(), &device);

        Ok(rows_from_tensor(fitted.model().infer(inputs)))
    }

    /// The most probable class id for each row
    pub fn predict(&self, features: &FeatureMatrix) -> Result<Vec<usize>, ClassifierError> {
        Ok(argmax_rows(&self.predict_proba(features)?))
    }
}
