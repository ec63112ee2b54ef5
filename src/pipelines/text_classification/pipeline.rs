use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::Path,
};

use burn::{
    backend::ndarray::NdArrayDevice,
    config::Config as _,
    module::Module,
    record::{CompactRecorder, Recorder},
};
use derive_new::new;
use log::info;

use crate::models::{
    logistic_regression::LogisticRegressionRecord, LogisticRegressionConfig, TfidfVectorizer,
};

use super::{featurize, load_data, predict, train, Backend, Classifier, Config};

/// File name of the saved configuration, inside an artifact directory
pub static CONFIG_FILE: &str = "config.json";

/// File name of the saved vectorizer, inside an artifact directory
pub static VECTORIZER_FILE: &str = "vectorizer.json";

/// File stem of the saved model weights, inside an artifact directory
pub static MODEL_FILE: &str = "model";

/// Anything that can turn texts into class ids
pub trait Predictor: Send + Sync {
    /// Predict one class id per text
    fn predict(&self, texts: &[String]) -> anyhow::Result<Vec<usize>>;
}

/// The configuration persisted alongside a trained pipeline
#[derive(burn::config::Config, Debug)]
pub struct ArtifactConfig {
    /// The training configuration the model was fitted with
    pub training: Config,

    /// The model configuration
    pub model: LogisticRegressionConfig,
}

/// A fitted vectorizer and classifier, immutable once constructed
#[derive(Debug, Clone, new)]
pub struct Pipeline {
    vectorizer: TfidfVectorizer,
    classifier: Classifier,
}

impl Pipeline {
    /// Load a CSV dataset, fit the vectorizer, and train the classifier on all of it
    pub fn from_csv<P: AsRef<Path>>(path: P, config: Config) -> anyhow::Result<Self> {
        let (features, labels, vectorizer) = load_data(path)?;

        let mut classifier = Classifier::new(config);
        train(&features, &labels, &mut classifier)
            .map_err(|e| anyhow!("Unable to train classifier: {}", e))?;

        Ok(Self::new(vectorizer, classifier))
    }

    /// The fitted vectorizer
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// The fitted classifier
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Per-class probabilities for each text
    pub fn predict_proba<S: AsRef<str>>(&self, texts: &[S]) -> anyhow::Result<Vec<Vec<f32>>> {
        let features = featurize(texts, &self.vectorizer)?;

        Ok(self.classifier.predict_proba(&features)?)
    }

    /// Save the configuration, vectorizer, and model weights into `artifact_dir`
    pub fn save<P: AsRef<Path>>(&self, artifact_dir: P) -> anyhow::Result<()> {
        let artifact_dir = artifact_dir.as_ref();
        let model_config = self.classifier.model_config()?;
        let model = self.classifier.model()?;

        fs::create_dir_all(artifact_dir)?;

        ArtifactConfig::new(self.classifier.config().clone(), model_config.clone())
            .save(artifact_dir.join(CONFIG_FILE))
            .map_err(|e| anyhow!("Unable to save config file: {}", e))?;

        let writer = BufWriter::new(File::create(artifact_dir.join(VECTORIZER_FILE))?);
        serde_json::to_writer(writer, &self.vectorizer)
            .map_err(|e| anyhow!("Unable to save vectorizer: {}", e))?;

        CompactRecorder::new()
            .record(model.into_record(), artifact_dir.join(MODEL_FILE))
            .map_err(|e| anyhow!("Unable to save model weights: {}", e))?;

        info!("Saved pipeline to {}", artifact_dir.display());

        Ok(())
    }

    /// Restore a pipeline written by [`Pipeline::save`]
    pub fn load<P: AsRef<Path>>(artifact_dir: P) -> anyhow::Result<Self> {
        let artifact_dir = artifact_dir.as_ref();

        let config = ArtifactConfig::load(artifact_dir.join(CONFIG_FILE))
            .map_err(|e| anyhow!("Unable to load config file: {}", e))?;

        let reader = BufReader::new(File::open(artifact_dir.join(VECTORIZER_FILE))?);
        let vectorizer: TfidfVectorizer = serde_json::from_reader(reader)
            .map_err(|e| anyhow!("Unable to load vectorizer: {}", e))?;

        if !vectorizer.is_fitted() {
            return Err(anyhow!("The saved vectorizer has not been fitted"));
        }

        let device = NdArrayDevice::Cpu;
        let record: LogisticRegressionRecord<Backend> = CompactRecorder::new()
            .load(artifact_dir.join(MODEL_FILE), &device)
            .map_err(|e| anyhow!("Unable to load trained model weights: {}", e))?;

        let model = config.model.init::<Backend>(&device).load_record(record);

        info!("Loaded pipeline from {}", artifact_dir.display());

        Ok(Self::new(
            vectorizer,
            Classifier::from_model(config.training, config.model, model),
        ))
    }
}

impl Predictor for Pipeline {
    fn predict(&self, texts: &[String]) -> anyhow::Result<Vec<usize>> {
        let features = featurize(texts, &self.vectorizer)?;

        Ok(predict(&features, &self.classifier)?)
    }
}
