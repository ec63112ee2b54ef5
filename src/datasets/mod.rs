/// The spam-or-ham SMS dataset
pub mod spam_or_ham;

/// Dataset Error
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// The CSV file could not be opened or parsed
    #[error("unable to read dataset: {0}")]
    Csv(#[from] csv::Error),

    /// A data record did not have exactly two fields
    #[error("line {line}: expected 2 fields, found {found}")]
    FieldCount {
        /// 1-based line number of the record
        line: u64,
        /// The number of fields actually present
        found: usize,
    },

    /// A label token was not one of the known categories
    #[error("line {line}: unknown category {value:?}")]
    UnknownCategory {
        /// 1-based line number of the record
        line: u64,
        /// The unrecognized label token
        value: String,
    },
}
