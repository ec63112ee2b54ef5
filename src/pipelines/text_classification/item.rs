use derive_new::new;

use crate::models::tfidf::SparseRow;

/// A single training example: one featurized message and its class id
#[derive(Clone, Debug, new)]
pub struct Item {
    /// Sparse TF-IDF features
    pub features: SparseRow,

    /// The class id
    pub label: usize,
}
