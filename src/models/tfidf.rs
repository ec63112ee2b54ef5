use std::collections::{BTreeMap, BTreeSet, HashMap};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::classes::invert_map;

lazy_static! {
    /// Tokens are runs of two or more word characters
    static ref TOKEN_PATTERN: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

/// A sparse row: `(column, value)` pairs sorted by column
pub type SparseRow = Vec<(usize, f32)>;

/// Row normalization applied after TF-IDF weighting
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Scale each row to unit euclidean length
    #[default]
    L2,

    /// Scale each row so its absolute values sum to one
    L1,

    /// Leave rows unscaled
    None,
}

/// Vectorizer settings
#[derive(burn::config::Config, Debug)]
pub struct TfidfConfig {
    /// Lower-case text before tokenizing
    #[config(default = true)]
    pub lowercase: bool,

    /// Add one to document frequencies, as if an extra document contained every term once
    #[config(default = true)]
    pub smooth_idf: bool,

    /// Replace term counts with `1 + ln(count)`
    #[config(default = false)]
    pub sublinear_tf: bool,

    /// Row normalization
    #[config(default = "Norm::L2")]
    pub norm: Norm,
}

/// A sparse, row-oriented feature matrix produced by the vectorizer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    n_features: usize,
    rows: Vec<SparseRow>,
}

impl FeatureMatrix {
    /// Build a matrix from sparse rows. Columns outside `0..n_features` are dropped.
    pub fn new(n_features: usize, rows: Vec<SparseRow>) -> Self {
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.retain(|(col, _)| *col < n_features);
                row.sort_by_key(|(col, _)| *col);
                row
            })
            .collect();

        Self { n_features, rows }
    }

    /// Number of rows (one per input text)
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (the vocabulary size)
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Whether the matrix has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The sparse rows
    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    /// A single sparse row
    pub fn row(&self, index: usize) -> Option<&SparseRow> {
        self.rows.get(index)
    }

    /// The number of stored (non-zero) values
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// The value at the given position, zero if not stored
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.rows
            .get(row)
            .and_then(|r| {
                r.binary_search_by_key(&col, |(c, _)| *c)
                    .ok()
                    .map(|i| r[i].1)
            })
            .unwrap_or(0.0)
    }
}

/// Vectorizer Error
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum VectorizerError {
    /// The vectorizer was used before being fitted
    #[error("the vectorizer has not been fitted")]
    NotFitted,

    /// Fitting produced no terms
    #[error("empty vocabulary: the documents contain no tokens")]
    EmptyVocabulary,
}

/// Fitted state: the vocabulary and one IDF weight per column
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Fitted {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f32>,
}

/// Converts raw text into TF-IDF weighted term vectors
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: TfidfConfig,
    fitted: Option<Fitted>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(TfidfConfig::new())
    }
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer
    pub fn new(config: TfidfConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    /// The vectorizer settings
    pub fn config(&self) -> &TfidfConfig {
        &self.config
    }

    /// Whether `fit` has completed
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// The learned term to column mapping
    pub fn vocabulary(&self) -> Result<&BTreeMap<String, usize>, VectorizerError> {
        Ok(&self.state()?.vocabulary)
    }

    /// The learned IDF weight of each column
    pub fn idf(&self) -> Result<&[f32], VectorizerError> {
        Ok(&self.state()?.idf)
    }

    /// Terms ordered by column
    pub fn feature_names(&self) -> Result<Vec<String>, VectorizerError> {
        let by_column: BTreeMap<usize, String> = invert_map(self.vocabulary()?.clone());

        Ok(by_column.into_values().collect())
    }

    /// Split text into terms
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.config.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        TOKEN_PATTERN
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Learn the vocabulary and IDF weights from a corpus, replacing any previous fit
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<&mut Self, VectorizerError> {
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for document in documents {
            let terms: BTreeSet<String> = self.tokenize(document.as_ref()).into_iter().collect();

            for term in terms {
                *document_frequency.entry(term).or_default() += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(VectorizerError::EmptyVocabulary);
        }

        let sorted: BTreeMap<String, usize> = document_frequency.into_iter().collect();

        let n_documents = documents.len() as f64;
        let smoothing = if self.config.smooth_idf { 1.0 } else { 0.0 };

        let idf = sorted
            .values()
            .map(|&df| ((n_documents + smoothing) / (df as f64 + smoothing)).ln() + 1.0)
            .map(|w| w as f32)
            .collect();

        let vocabulary = sorted
            .into_keys()
            .enumerate()
            .map(|(column, term)| (term, column))
            .collect();

        self.fitted = Some(Fitted { vocabulary, idf });

        Ok(self)
    }

    /// Map texts into the learned feature space. Terms outside the vocabulary are ignored.
    pub fn transform<S: AsRef<str>>(
        &self,
        documents: &[S],
    ) -> Result<FeatureMatrix, VectorizerError> {
        let fitted = self.state()?;

        let rows = documents
            .iter()
            .map(|document| self.weigh(fitted, document.as_ref()))
            .collect();

        Ok(FeatureMatrix {
            n_features: fitted.idf.len(),
            rows,
        })
    }

    /// Fit on a corpus and return its feature matrix
    pub fn fit_transform<S: AsRef<str>>(
        &mut self,
        documents: &[S],
    ) -> Result<FeatureMatrix, VectorizerError> {
        self.fit(documents)?;
        self.transform(documents)
    }

    fn state(&self) -> Result<&Fitted, VectorizerError> {
        self.fitted.as_ref().ok_or(VectorizerError::NotFitted)
    }

    fn weigh(&self, fitted: &Fitted, document: &str) -> SparseRow {
        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();

        for term in self.tokenize(document) {
            if let Some(&column) = fitted.vocabulary.get(&term) {
                *counts.entry(column).or_default() += 1.0;
            }
        }

        let mut row: SparseRow = counts
            .into_iter()
            .map(|(column, count)| {
                let tf = if self.config.sublinear_tf {
                    1.0 + count.ln()
                } else {
                    count
                };

                (column, tf * fitted.idf[column])
            })
            .collect();

        let norm = match self.config.norm {
            Norm::L2 => row.iter().map(|(_, v)| v * v).sum::<f32>().sqrt(),
            Norm::L1 => row.iter().map(|(_, v)| v.abs()).sum::<f32>(),
            Norm::None => 1.0,
        };

        // All-zero rows stay all-zero
        if norm > 0.0 {
            for (_, value) in row.iter_mut() {
                *value /= norm;
            }
        }

        row
    }
}
