use log::info;

use crate::models::{FeatureMatrix, TfidfVectorizer, VectorizerError};

use super::{Classifier, ClassifierError};

/// Map raw texts into the vectorizer's feature space, without refitting
pub fn featurize<S: AsRef<str>>(
    texts: &[S],
    vectorizer: &TfidfVectorizer,
) -> Result<FeatureMatrix, VectorizerError> {
    info!("Creating features for {} texts", texts.len());

    vectorizer.transform(texts)
}

/// The predicted class id for each row of `features`
pub fn predict(features: &FeatureMatrix, model: &Classifier) -> Result<Vec<usize>, ClassifierError> {
    info!("Predicting {} rows", features.n_rows());

    model.predict(features)
}
