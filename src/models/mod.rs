/// TF-IDF text vectorization
pub mod tfidf;

/// Logistic regression classifier
pub mod logistic_regression;

pub use logistic_regression::{LogisticRegression, LogisticRegressionConfig};
pub use tfidf::{FeatureMatrix, TfidfConfig, TfidfVectorizer, VectorizerError};
