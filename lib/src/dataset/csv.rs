//! Delimited-text ingestion of review files.
//!
//! Column layout is never inferred from the data: callers hand the reader an explicit
//! [`ColumnMapping`] that says which column holds which [`ReviewField`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use ::csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};

use crate::config::CsvOptions;
use crate::dataset::{LabeledReview, ReviewSource, UnlabeledReview};
use crate::error::{Result, SentimentError};

/// A field of a review record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewField {
    Label,
    Title,
    Body,
}

/// Ordered table of `(column index, field)` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    entries: Vec<(usize, ReviewField)>,
}

impl ColumnMapping {
    pub fn new(entries: Vec<(usize, ReviewField)>) -> Self {
        Self { entries }
    }

    /// Column index holding `field`, if mapped. The first entry wins on duplicates.
    pub fn column_of(&self, field: ReviewField) -> Option<usize> {
        self.entries
            .iter()
            .find(|(_, f)| *f == field)
            .map(|(col, _)| *col)
    }

    pub fn entries(&self) -> &[(usize, ReviewField)] {
        &self.entries
    }
}

/// Parse a sentiment label.
///
/// Accepts `true/false`, `1/0`, `yes/no` and `positive/negative`, case-insensitive.
pub fn parse_label(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "positive" => Some(true),
        "false" | "0" | "no" | "negative" => Some(false),
        _ => None,
    }
}

/// Reads [`LabeledReview`] / [`UnlabeledReview`] rows from delimited text.
#[derive(Debug, Clone)]
pub struct CsvReviewReader {
    options: CsvOptions,
}

impl CsvReviewReader {
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    pub fn read_labeled<P: AsRef<Path>>(&self, path: P) -> Result<Vec<LabeledReview>> {
        self.read_labeled_from(open(path.as_ref())?)
    }

    pub fn read_unlabeled<P: AsRef<Path>>(&self, path: P) -> Result<Vec<UnlabeledReview>> {
        self.read_unlabeled_from(open(path.as_ref())?)
    }

    /// Read labeled rows from any byte stream.
    pub fn read_labeled_from<R: Read>(&self, reader: R) -> Result<Vec<LabeledReview>> {
        let label_col = self.required_column(ReviewField::Label)?;
        let body_col = self.required_column(ReviewField::Body)?;
        let title_col = self.options.columns.column_of(ReviewField::Title);

        let mut reviews = Vec::new();
        for result in self.builder().from_reader(reader).records() {
            let record = result?;
            let line = line_of(&record);
            let raw_label = field(&record, label_col, ReviewField::Label, line)?;
            let label = parse_label(raw_label).ok_or_else(|| {
                SentimentError::Ingestion(format!(
                    "line {}: cannot parse label '{}'",
                    line, raw_label
                ))
            })?;
            let title = match title_col {
                Some(col) => field(&record, col, ReviewField::Title, line)?.to_string(),
                None => String::new(),
            };
            let body = field(&record, body_col, ReviewField::Body, line)?.to_string();
            reviews.push(LabeledReview { label, title, body });
        }
        log::debug!("read {} labeled reviews", reviews.len());
        Ok(reviews)
    }

    /// Read rows without labels; a mapped label column is ignored.
    pub fn read_unlabeled_from<R: Read>(&self, reader: R) -> Result<Vec<UnlabeledReview>> {
        let body_col = self.required_column(ReviewField::Body)?;
        let title_col = self.options.columns.column_of(ReviewField::Title);

        let mut reviews = Vec::new();
        for result in self.builder().from_reader(reader).records() {
            let record = result?;
            let line = line_of(&record);
            let title = match title_col {
                Some(col) => field(&record, col, ReviewField::Title, line)?.to_string(),
                None => String::new(),
            };
            let body = field(&record, body_col, ReviewField::Body, line)?.to_string();
            reviews.push(UnlabeledReview { title, body });
        }
        log::debug!("read {} unlabeled reviews", reviews.len());
        Ok(reviews)
    }

    fn builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(self.options.delimiter)
            .has_headers(self.options.has_header)
            .flexible(true);
        builder
    }

    fn required_column(&self, field: ReviewField) -> Result<usize> {
        self.options.columns.column_of(field).ok_or_else(|| {
            SentimentError::InvalidInput(format!("column mapping has no {:?} column", field))
        })
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| {
        SentimentError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    Ok(BufReader::new(file))
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn field(record: &StringRecord, col: usize, name: ReviewField, line: u64) -> Result<&str> {
    record.get(col).ok_or_else(|| {
        SentimentError::Ingestion(format!(
            "line {}: missing column {} ({:?})",
            line, col, name
        ))
    })
}

/// A CSV file bound to a reader, usable wherever a [`ReviewSource`] is expected.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    reader: CsvReviewReader,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>, reader: CsvReviewReader) -> Self {
        Self {
            path: path.into(),
            reader,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReviewSource for CsvSource {
    fn labeled(&self) -> Result<Vec<LabeledReview>> {
        self.reader.read_labeled(&self.path)
    }

    fn unlabeled(&self) -> Result<Vec<UnlabeledReview>> {
        self.reader.read_unlabeled(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Sent,Title,Review\n\
                          true,Nice,Great product\n\
                          false,Bad,\"Terrible, slow service\"\n\
                          1,Wow,Loved it\n\
                          0,Ugh,Awful experience\n";

    fn reader() -> CsvReviewReader {
        CsvReviewReader::new(CsvOptions::default())
    }

    #[test]
    fn test_parse_label_variants() {
        assert_eq!(parse_label("true"), Some(true));
        assert_eq!(parse_label(" TRUE "), Some(true));
        assert_eq!(parse_label("1"), Some(true));
        assert_eq!(parse_label("Positive"), Some(true));
        assert_eq!(parse_label("false"), Some(false));
        assert_eq!(parse_label("0"), Some(false));
        assert_eq!(parse_label("no"), Some(false));
        assert_eq!(parse_label("maybe"), None);
        assert_eq!(parse_label(""), None);
    }

    #[test]
    fn test_column_mapping_lookup() {
        let mapping = ColumnMapping::new(vec![(2, ReviewField::Body), (0, ReviewField::Label)]);
        assert_eq!(mapping.column_of(ReviewField::Body), Some(2));
        assert_eq!(mapping.column_of(ReviewField::Label), Some(0));
        assert_eq!(mapping.column_of(ReviewField::Title), None);
    }

    #[test]
    fn test_read_labeled_in_file_order() {
        let reviews = reader().read_labeled_from(SAMPLE.as_bytes()).unwrap();

        assert_eq!(reviews.len(), 4);
        assert_eq!(reviews[0], LabeledReview::new(true, "Nice", "Great product"));
        assert_eq!(reviews[1].body, "Terrible, slow service");
        assert!(!reviews[1].label);
        assert!(reviews[2].label);
        assert!(!reviews[3].label);
    }

    #[test]
    fn test_read_unlabeled_ignores_label_column() {
        let reviews = reader().read_unlabeled_from(SAMPLE.as_bytes()).unwrap();
        assert_eq!(reviews.len(), 4);
        assert_eq!(reviews[3], UnlabeledReview::new("Ugh", "Awful experience"));
    }

    #[test]
    fn test_bad_label_names_line() {
        let data = "Sent,Title,Review\ntrue,a,fine\nperhaps,b,unclear\n";
        let err = reader().read_labeled_from(data.as_bytes()).unwrap_err();
        match err {
            SentimentError::Ingestion(msg) => {
                assert!(msg.contains("line 3"), "unexpected message: {}", msg);
                assert!(msg.contains("perhaps"));
            }
            other => panic!("expected ingestion error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_is_ingestion_error() {
        let data = "Sent,Title,Review\ntrue,only title\n";
        let err = reader().read_labeled_from(data.as_bytes()).unwrap_err();
        assert!(matches!(err, SentimentError::Ingestion(_)));
    }

    #[test]
    fn test_custom_mapping_and_delimiter() {
        let options = CsvOptions {
            delimiter: b';',
            has_header: false,
            columns: ColumnMapping::new(vec![(0, ReviewField::Body), (1, ReviewField::Label)]),
        };
        let data = "Loved it;yes\nAwful;no\n";
        let reviews = CsvReviewReader::new(options)
            .read_labeled_from(data.as_bytes())
            .unwrap();

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0], LabeledReview::new(true, "", "Loved it"));
        assert_eq!(reviews[1], LabeledReview::new(false, "", "Awful"));
    }

    #[test]
    fn test_mapping_without_label_rejected_for_labeled_read() {
        let options = CsvOptions {
            columns: ColumnMapping::new(vec![(0, ReviewField::Body)]),
            ..CsvOptions::default()
        };
        let err = CsvReviewReader::new(options)
            .read_labeled_from("Review\nhello\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, SentimentError::InvalidInput(_)));
    }

    #[test]
    fn test_csv_source_reads_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("reviews.csv");
        std::fs::write(&path, SAMPLE)?;

        let source = CsvSource::new(&path, reader());
        assert_eq!(source.labeled()?.len(), 4);
        assert_eq!(source.unlabeled()?.len(), 4);
        assert_eq!(source.path(), path.as_path());
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = reader().read_labeled("/no/such/reviews.csv").unwrap_err();
        assert!(matches!(err, SentimentError::Io(_)));
    }
}
