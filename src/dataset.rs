//! Labeled comment datasets: CSV ingestion, spam/ham partition, train/test split.
//!
//! Rows look like `[meta.., comment_text, label, ...]`. The leading metadata
//! columns (author, date, id in the YouTube spam collection) are dropped,
//! the comment is normalized, and the label must be `0` (ham) or `1` (spam).

use std::io::Read;
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, DatasetResult};
use crate::normalize::normalize;

/// Default number of leading metadata columns to drop.
pub const DEFAULT_SKIP_COLUMNS: usize = 3;

/// Default fraction of the dataset used for training.
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

// ── Label ──────────────────────────────────────────────────────────────────

/// Ground-truth class of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Legitimate comment, label value `0`.
    Ham,
    /// Unwanted or promotional comment, label value `1`.
    Spam,
}

impl Label {
    /// Parse a dataset label cell (`"0"` or `"1"`, surrounding whitespace ignored).
    pub fn parse(cell: &str) -> Option<Self> {
        match cell.trim() {
            "0" => Some(Self::Ham),
            "1" => Some(Self::Spam),
            _ => None,
        }
    }

    /// Numeric label value: ham = 0, spam = 1.
    pub fn value(self) -> u8 {
        match self {
            Self::Ham => 0,
            Self::Spam => 1,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ham => write!(f, "ham"),
            Self::Spam => write!(f, "spam"),
        }
    }
}

// ── LabeledExample ─────────────────────────────────────────────────────────

/// A normalized comment paired with its ground-truth label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledExample {
    comment: String,
    label: Label,
}

impl LabeledExample {
    /// Normalize `raw` and pair it with `label`.
    pub fn new(raw: &str, label: Label) -> Self {
        Self {
            comment: normalize(raw),
            label,
        }
    }

    /// The normalized comment text.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn is_spam(&self) -> bool {
        self.label == Label::Spam
    }
}

// ── Loading ────────────────────────────────────────────────────────────────

/// How to read a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetOptions {
    /// Leading metadata columns dropped from every row.
    pub skip_columns: usize,
    /// Whether the first row is a header to skip.
    pub has_header: bool,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            skip_columns: DEFAULT_SKIP_COLUMNS,
            has_header: true,
        }
    }
}

/// Load and normalize a labeled dataset from a CSV file.
pub fn load_csv(path: &Path, options: DatasetOptions) -> DatasetResult<Vec<LabeledExample>> {
    let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let examples = read_csv(std::io::BufReader::new(file), options)?;
    tracing::info!(
        path = %path.display(),
        rows = examples.len(),
        "loaded dataset"
    );
    Ok(examples)
}

/// Read a labeled dataset from any CSV source.
///
/// Rows are numbered from 1, not counting the header. A row with fewer than
/// `skip_columns + 2` cells fails with [`DatasetError::MalformedRow`].
pub fn read_csv<R: Read>(reader: R, options: DatasetOptions) -> DatasetResult<Vec<LabeledExample>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(options.has_header)
        .flexible(true)
        .from_reader(reader);

    let expected = options.skip_columns + 2;
    let mut examples = Vec::new();

    for (i, record) in rdr.records().enumerate() {
        let row = i + 1;
        let record = record.map_err(|e| DatasetError::Csv {
            message: format!("row {row}: {e}"),
        })?;

        if record.len() < expected {
            return Err(DatasetError::MalformedRow {
                row,
                expected,
                found: record.len(),
            });
        }

        let text = &record[options.skip_columns];
        let label_cell = &record[options.skip_columns + 1];
        let label = Label::parse(label_cell).ok_or_else(|| DatasetError::InvalidLabel {
            row,
            label: label_cell.to_string(),
        })?;

        examples.push(LabeledExample::new(text, label));
    }

    Ok(examples)
}

// ── Partition & split ──────────────────────────────────────────────────────

/// Separate comments by class, returning `(spam, ham)`.
pub fn partition_by_label(examples: &[LabeledExample]) -> (Vec<&str>, Vec<&str>) {
    examples
        .iter()
        .fold((Vec::new(), Vec::new()), |(mut spam, mut ham), ex| {
            match ex.label {
                Label::Spam => spam.push(ex.comment()),
                Label::Ham => ham.push(ex.comment()),
            }
            (spam, ham)
        })
}

/// Disjoint train and test subsets of a dataset.
#[derive(Debug, Clone, Default)]
pub struct Split {
    pub train: Vec<LabeledExample>,
    pub test: Vec<LabeledExample>,
}

/// Shuffle `examples` with `rng` and cut them into train and test subsets.
///
/// The first `floor((n + 1) * ratio)` shuffled examples (at most `n`) form
/// the training set; the rest form the test set. `ratio` must lie in (0, 1].
pub fn split<R: Rng + ?Sized>(
    mut examples: Vec<LabeledExample>,
    ratio: f64,
    rng: &mut R,
) -> DatasetResult<Split> {
    if !(ratio > 0.0 && ratio <= 1.0) {
        return Err(DatasetError::InvalidRatio { ratio });
    }

    examples.shuffle(rng);
    let cut = split_point(examples.len(), ratio);
    let test = examples.split_off(cut);

    tracing::debug!(train = examples.len(), test = test.len(), "split dataset");
    Ok(Split {
        train: examples,
        test,
    })
}

fn split_point(n: usize, ratio: f64) -> usize {
    (((n + 1) as f64 * ratio).floor() as usize).min(n)
}

// ── Stats ──────────────────────────────────────────────────────────────────

/// Class balance of a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub rows: usize,
    pub spam: usize,
    pub ham: usize,
}

impl DatasetStats {
    pub fn of(examples: &[LabeledExample]) -> Self {
        let spam = examples.iter().filter(|e| e.is_spam()).count();
        Self {
            rows: examples.len(),
            spam,
            ham: examples.len() - spam,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SAMPLE: &str = "\
COMMENT_ID,AUTHOR,DATE,CONTENT,CLASS
a1,Alice,2015-01-01,\"Check out my channel https://youtu.be/x!!\",1
b2,Bob,2015-01-02,Great video thanks,0
c3,Carol,2015-01-03,\"Love this song, <br /> so good\",0
";

    fn examples(n: usize) -> Vec<LabeledExample> {
        (0..n)
            .map(|i| {
                let label = if i % 2 == 0 { Label::Spam } else { Label::Ham };
                LabeledExample::new(&format!("comment number {i}"), label)
            })
            .collect()
    }

    // ── Labels ─────────────────────────────────────────────────────────

    #[test]
    fn label_parsing() {
        assert_eq!(Label::parse("0"), Some(Label::Ham));
        assert_eq!(Label::parse(" 1 "), Some(Label::Spam));
        assert_eq!(Label::parse("2"), None);
        assert_eq!(Label::parse("spam"), None);
        assert_eq!(Label::Spam.value(), 1);
        assert_eq!(Label::Ham.to_string(), "ham");
    }

    // ── Loading ────────────────────────────────────────────────────────

    #[test]
    fn reads_and_normalizes_rows() {
        let rows = read_csv(SAMPLE.as_bytes(), DatasetOptions::default()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].comment(), "check out my channel link");
        assert_eq!(rows[0].label(), Label::Spam);
        assert_eq!(rows[1].comment(), "great video thanks");
        assert_eq!(rows[2].comment(), "love this song br so good");
        assert_eq!(rows[2].label(), Label::Ham);
    }

    #[test]
    fn short_row_is_malformed_with_row_index() {
        let data = "id,author,date,content,class\n\
                    a,b,c,fine comment,0\n\
                    a,b,c,missing label\n";
        let err = read_csv(data.as_bytes(), DatasetOptions::default()).unwrap_err();
        match err {
            DatasetError::MalformedRow {
                row,
                expected,
                found,
            } => {
                assert_eq!(row, 2);
                assert_eq!(expected, 5);
                assert_eq!(found, 4);
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn bad_label_is_rejected() {
        let data = "h1,h2\nsome text,maybe\n";
        let opts = DatasetOptions {
            skip_columns: 0,
            has_header: true,
        };
        let err = read_csv(data.as_bytes(), opts).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidLabel { row: 1, .. }));
    }

    #[test]
    fn headerless_input_keeps_first_row() {
        let data = "first,1\nsecond,0\n";
        let opts = DatasetOptions {
            skip_columns: 0,
            has_header: false,
        };
        let rows = read_csv(data.as_bytes(), opts).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].comment(), "first");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_csv(Path::new("/nonexistent/spam.csv"), DatasetOptions::default())
            .unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    // ── Partition ──────────────────────────────────────────────────────

    #[test]
    fn partition_separates_classes_in_order() {
        let rows = read_csv(SAMPLE.as_bytes(), DatasetOptions::default()).unwrap();
        let (spam, ham) = partition_by_label(&rows);
        assert_eq!(spam, vec!["check out my channel link"]);
        assert_eq!(ham, vec!["great video thanks", "love this song br so good"]);
    }

    // ── Split ──────────────────────────────────────────────────────────

    #[test]
    fn split_uses_eighty_twenty_cut() {
        let mut rng = StdRng::seed_from_u64(7);
        let split = split(examples(10), DEFAULT_TRAIN_RATIO, &mut rng).unwrap();
        // floor(11 * 0.8) = 8
        assert_eq!(split.train.len(), 8);
        assert_eq!(split.test.len(), 2);
    }

    #[test]
    fn split_is_disjoint_and_complete() {
        let mut rng = StdRng::seed_from_u64(99);
        let all = examples(25);
        let split = split(all.clone(), 0.8, &mut rng).unwrap();

        let mut seen: Vec<&str> = split
            .train
            .iter()
            .chain(split.test.iter())
            .map(LabeledExample::comment)
            .collect();
        seen.sort_unstable();
        let mut expected: Vec<&str> = all.iter().map(LabeledExample::comment).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn seeded_split_is_reproducible() {
        let a = split(examples(30), 0.8, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = split(examples(30), 0.8, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn split_point_never_exceeds_len() {
        assert_eq!(split_point(4, 1.0), 4);
        assert_eq!(split_point(0, 0.8), 0);
        assert_eq!(split_point(1, 0.8), 1);
    }

    #[test]
    fn invalid_ratio_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        for ratio in [0.0, -0.5, 1.5, f64::NAN] {
            let err = split(examples(3), ratio, &mut rng).unwrap_err();
            assert!(matches!(err, DatasetError::InvalidRatio { .. }));
        }
    }

    // ── Stats ──────────────────────────────────────────────────────────

    #[test]
    fn stats_count_classes() {
        let stats = DatasetStats::of(&examples(5));
        assert_eq!(stats, DatasetStats { rows: 5, spam: 3, ham: 2 });
    }
}
