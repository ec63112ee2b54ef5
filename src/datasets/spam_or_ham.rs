use std::{fmt::Display, path::Path};

use burn::data::dataset::{self, Dataset as _, InMemDataset};
use derive_new::new;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use super::DatasetError;

/// The default location of the dataset, relative to the working directory
pub static DEFAULT_PATH: &str = "spamorham.csv";

/// The category of a message
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A legitimate message
    Ham,

    /// An unsolicited message
    Spam,
}

impl Category {
    /// All categories, ordered by class id
    pub const ALL: [Category; 2] = [Category::Ham, Category::Spam];

    /// Look up a category by its exact label token. Matching is case-sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ham" => Some(Category::Ham),
            "spam" => Some(Category::Spam),
            _ => None,
        }
    }

    /// The integer class id used by the classifier
    pub fn id(&self) -> usize {
        match self {
            Category::Ham => 0,
            Category::Spam => 1,
        }
    }

    /// Look up a category by its class id
    pub fn from_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Ham => "ham",
            Category::Spam => "spam",
        };

        write!(f, "{}", name)
    }
}

/// A labeled message
#[derive(Clone, Debug, Serialize, Deserialize, new)]
pub struct Item {
    /// The message category
    pub category: Category,

    /// The message text, trimmed of surrounding whitespace
    pub text: String,
}

/// Struct for the spam-or-ham dataset
pub struct Dataset {
    /// Underlying In-Memory dataset
    dataset: InMemDataset<Item>,
}

impl dataset::Dataset<Item> for Dataset {
    /// Returns a specific item from the dataset
    fn get(&self, index: usize) -> Option<Item> {
        self.dataset.get(index)
    }

    /// Returns the length of the dataset
    fn len(&self) -> usize {
        self.dataset.len()
    }
}

impl Dataset {
    /// Build a dataset from already-labeled items
    pub fn from_items(items: Vec<Item>) -> Self {
        Self {
            dataset: InMemDataset::new(items),
        }
    }

    /// Load the dataset from a two-column CSV file (`category`, `message_text`).
    ///
    /// The first record is always treated as a header and skipped. Every other record must
    /// have exactly two fields and a label of either `ham` or `spam`. A blank line between
    /// records counts as a record with no fields.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        reader.headers()?;

        let mut items = Vec::new();
        let mut record = csv::StringRecord::new();
        let mut line = reader.position().line();

        while reader.read_record(&mut record)? {
            let consumed = reader.position().line() - line;
            let embedded: u64 = record.iter().map(|field| field.matches('\n').count() as u64).sum();

            // The csv reader drops empty lines, which show up as extra lines consumed
            if consumed > embedded + 1 {
                return Err(DatasetError::FieldCount { line, found: 0 });
            }

            if record.len() != 2 {
                return Err(DatasetError::FieldCount {
                    line,
                    found: record.len(),
                });
            }

            let category =
                Category::from_token(&record[0]).ok_or_else(|| DatasetError::UnknownCategory {
                    line,
                    value: record[0].to_string(),
                })?;

            items.push(Item::new(category, record[1].trim().to_string()));

            line = reader.position().line();
        }

        if reader.position().line() > line {
            return Err(DatasetError::FieldCount { line, found: 0 });
        }

        Ok(Self::from_items(items))
    }

    /// The message texts, in file order
    pub fn texts(&self) -> Vec<String> {
        self.dataset.iter().map(|item| item.text).collect()
    }

    /// The integer class ids, in file order
    pub fn labels(&self) -> Vec<usize> {
        self.dataset.iter().map(|item| item.category.id()).collect()
    }

    /// Returns up to `amount` distinct random samples from the dataset
    pub fn get_samples(&self, amount: usize) -> Vec<Item> {
        let mut rng = rand::thread_rng();
        let amount = amount.min(self.len());

        index::sample(&mut rng, self.len(), amount)
            .into_iter()
            .filter_map(|i| self.get(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::*;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_load_skips_header_and_maps_labels() {
        let f = write_csv(
            "category,message_text\nham,\"Hello friend\"\nspam,\"WIN FREE CASH NOW\"\nham,see you soon\n",
        );

        let data = Dataset::load(f.path()).unwrap();

        assert_eq!(data.len(), 3);
        assert_eq!(data.labels(), vec![0, 1, 0]);
        assert_eq!(
            data.texts(),
            vec!["Hello friend", "WIN FREE CASH NOW", "see you soon"]
        );
    }

    #[test]
    fn test_load_skips_first_row_whatever_it_contains() {
        let f = write_csv("spam,this looks like data\nham,but it was the header\n");

        let data = Dataset::load(f.path()).unwrap();

        assert_eq!(data.labels(), vec![0]);
    }

    #[test]
    fn test_load_trims_text() {
        let f = write_csv("category,message_text\nspam,\"  call now\n\"\n");

        let data = Dataset::load(f.path()).unwrap();

        assert_eq!(data.texts(), vec!["call now"]);
    }

    #[test]
    fn test_load_rejects_unknown_category() {
        let f = write_csv("category,message_text\nham,hi\nSpam,hello\n");

        let Err(err) = Dataset::load(f.path()) else {
            panic!("expected an unknown category error");
        };

        match err {
            DatasetError::UnknownCategory { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "Spam");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_rejects_wrong_field_count() {
        let f = write_csv("category,message_text\nham,hi,extra\n");

        let Err(err) = Dataset::load(f.path()) else {
            panic!("expected a field count error");
        };

        assert!(matches!(err, DatasetError::FieldCount { found: 3, .. }));
    }

    #[test]
    fn test_load_rejects_blank_row_between_records() {
        let f = write_csv("category,message_text\nham,hi\n\nspam,win cash\n");

        let Err(err) = Dataset::load(f.path()) else {
            panic!("expected a blank row to fail loading");
        };

        match err {
            DatasetError::FieldCount { line, found } => {
                assert_eq!(line, 3);
                assert_eq!(found, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_accepts_multiline_quoted_text() {
        let f = write_csv("category,message_text\nham,\"first\nsecond\"\nspam,win cash\n");

        let data = Dataset::load(f.path()).unwrap();

        assert_eq!(data.labels(), vec![0, 1]);
        assert_eq!(data.texts(), vec!["first\nsecond", "win cash"]);
    }

    #[test]
    fn test_load_missing_file() {
        let Err(err) = Dataset::load("/nonexistent/spamorham.csv") else {
            panic!("expected a missing file to fail loading");
        };

        assert!(matches!(err, DatasetError::Csv(_)));
    }

    #[test]
    fn test_category_ids_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_id(category.id()), Some(category));
            assert_eq!(Category::from_token(&category.to_string()), Some(category));
        }
        assert_eq!(Category::from_id(2), None);
    }

    #[test]
    fn test_get_samples_is_bounded() {
        let data = Dataset::from_items(vec![
            Item::new(Category::Ham, "a".to_string()),
            Item::new(Category::Spam, "b".to_string()),
        ]);

        assert_eq!(data.get_samples(10).len(), 2);
        assert_eq!(data.get_samples(1).len(), 1);
    }
}
