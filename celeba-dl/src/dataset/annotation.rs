//! The attribute annotation file parser.
//!
//! The file carries the number of records on the first line, the attribute
//! names on the second line, and one `<filename> <v_1> ... <v_A>` row per
//! image after that. Fields may be separated by whitespace runs of any length.

use super::*;
use crate::common::*;

/// The file name of the attribute annotation file under the dataset root.
pub const ANNOTATION_FILE_NAME: &str = "list_attr_celeba.txt";

/// The marker of a present attribute. Any other marker, including `-1`, is absent.
const PRESENT_MARKER: &str = "1";

/// The ordered list of attribute names from the annotation header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSchema {
    names: Vec<String>,
}

impl AttributeSchema {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    fn from_header(line: &str) -> Self {
        if line.is_empty() {
            return Self::default();
        }
        Self::new(line.split(' '))
    }

    /// The number of attributes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Get the position of an attribute by name.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|other| other == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }
}

/// The filename to attribute vector mapping parsed from an annotation file.
///
/// The index is immutable once built. A file name that appears on several
/// rows takes the values of the last row.
#[derive(Debug, Clone)]
pub struct AnnotationIndex {
    schema: AttributeSchema,
    records: IndexMap<String, Array1<i64>>,
    declared_count: Option<usize>,
    parsed_records: usize,
}

impl AnnotationIndex {
    /// Load and parse the annotation file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_text_file(path)?;
        let index = Self::parse(&text);
        debug!(
            "loaded {} annotations with {} attributes from '{}'",
            index.len(),
            index.attribute_count(),
            path.display()
        );
        Ok(index)
    }

    /// Parse the content of an annotation file.
    pub fn parse(text: &str) -> Self {
        let mut lines = split_lines(text).map(normalize_line);

        // the count line is kept for reporting only
        let declared_count = lines.next().and_then(|line| line.parse().ok());
        let schema = lines
            .next()
            .map(|line| AttributeSchema::from_header(&line))
            .unwrap_or_default();
        let num_attributes = schema.len();

        let mut records = IndexMap::new();
        let mut parsed_records = 0;
        let mut duplicated_records = 0;
        let mut malformed_records = 0;

        for line in lines.filter(|line| !line.is_empty()) {
            let mut fields = line.split(' ');
            let filename = fields.next().unwrap_or_default().to_owned();
            let markers: Vec<_> = fields.collect();

            if markers.len() != num_attributes {
                malformed_records += 1;
                debug!(
                    "record '{}' has {} values, but {} attributes are declared",
                    filename,
                    markers.len(),
                    num_attributes
                );
            }

            let values: Array1<i64> = (0..num_attributes)
                .map(|index| markers.get(index).map_or(0, |marker| presence_flag(marker)))
                .collect();

            parsed_records += 1;
            if records.insert(filename, values).is_some() {
                duplicated_records += 1;
            }
        }

        if malformed_records > 0 {
            warn!(
                "{} annotation records do not have exactly {} values, missing values are treated as absent",
                malformed_records, num_attributes
            );
        }
        if duplicated_records > 0 {
            warn!(
                "{} annotation records repeat an earlier file name, the later records take effect",
                duplicated_records
            );
        }

        let index = Self {
            schema,
            records,
            declared_count,
            parsed_records,
        };

        if let Some((declared, parsed)) = index.record_count_mismatch() {
            warn!(
                "the annotation file declares {} records, but {} records are found",
                declared, parsed
            );
        }

        index
    }

    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    /// The length of every attribute vector.
    pub fn attribute_count(&self) -> usize {
        self.schema.len()
    }

    /// Get the attribute vector of a file, or `None` if the file is not annotated.
    pub fn lookup(&self, filename: &str) -> Option<ArrayView1<'_, i64>> {
        self.records.get(filename).map(|values| values.view())
    }

    /// Get the attribute vector of a file, falling back to all zeros for
    /// files without annotation.
    pub fn lookup_or_zeros(&self, filename: &str) -> Array1<i64> {
        match self.records.get(filename) {
            Some(values) => values.clone(),
            None => Array1::zeros(self.attribute_count()),
        }
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.records.contains_key(filename)
    }

    /// The number of distinct annotated file names.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record count on the first line, if it is an integer.
    pub fn declared_count(&self) -> Option<usize> {
        self.declared_count
    }

    /// The number of record rows, counting repeated file names.
    pub fn parsed_records(&self) -> usize {
        self.parsed_records
    }

    /// Get `(declared, parsed)` if the first line disagrees with the record rows.
    pub fn record_count_mismatch(&self) -> Option<(usize, usize)> {
        let declared = self.declared_count?;
        (declared != self.parsed_records).then(|| (declared, self.parsed_records))
    }

    /// Fail if the declared record count disagrees with the record rows.
    pub fn check_record_count(&self) -> Result<()> {
        match self.record_count_mismatch() {
            Some((declared, parsed)) => Err(Error::InvalidArgument(format!(
                "the annotation file declares {} records, but {} records are found",
                declared, parsed
            ))),
            None => Ok(()),
        }
    }

    /// Iterate over annotated file names and attribute vectors in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ArrayView1<'_, i64>)> + '_ {
        self.records
            .iter()
            .map(|(filename, values)| (filename.as_str(), values.view()))
    }
}

fn presence_flag(marker: &str) -> i64 {
    (marker == PRESENT_MARKER) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const EXAMPLE: &str = "3\nsmiling glasses\na.jpg 1 -1\nb.jpg -1 1\n";

    #[test]
    fn parse_example_test() {
        let index = AnnotationIndex::parse(EXAMPLE);

        assert_eq!(index.schema().names(), &["smiling", "glasses"]);
        assert_eq!(index.attribute_count(), 2);
        assert_eq!(index.lookup("a.jpg").unwrap().to_vec(), vec![1, 0]);
        assert_eq!(index.lookup("b.jpg").unwrap().to_vec(), vec![0, 1]);
        assert!(index.lookup("c.jpg").is_none());
        assert_eq!(index.lookup_or_zeros("c.jpg").to_vec(), vec![0, 0]);
        assert_eq!(index.declared_count(), Some(3));
        assert_eq!(index.parsed_records(), 2);
        assert_eq!(index.record_count_mismatch(), Some((3, 2)));
        assert!(matches!(
            index.check_record_count(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn irregular_whitespace_test() {
        let text = "  1 \r\n a  b\t\tc \r\n000001.jpg   1  -1\t 1  \r\n";
        let index = AnnotationIndex::parse(text);

        assert_eq!(index.schema().names(), &["a", "b", "c"]);
        assert_eq!(index.lookup("000001.jpg").unwrap().to_vec(), vec![1, 0, 1]);
        assert_eq!(index.record_count_mismatch(), None);
        assert!(index.check_record_count().is_ok());
    }

    #[test]
    fn carriage_return_line_endings_test() {
        let index = AnnotationIndex::parse("2\rsmiling glasses\ra.jpg 1 -1\rb.jpg -1 1\r");

        assert_eq!(index.attribute_count(), 2);
        assert_eq!(index.lookup("a.jpg").unwrap().to_vec(), vec![1, 0]);
        assert_eq!(index.lookup("b.jpg").unwrap().to_vec(), vec![0, 1]);
        assert_eq!(index.declared_count(), Some(2));
        assert_eq!(index.record_count_mismatch(), None);
    }

    #[test]
    fn only_literal_one_is_present_test() {
        let text = "1\na b c d e\nx.jpg 1 -1 0 01 +1\n";
        let index = AnnotationIndex::parse(text);
        assert_eq!(index.lookup("x.jpg").unwrap().to_vec(), vec![1, 0, 0, 0, 0]);
    }

    #[test]
    fn last_record_wins_test() {
        let text = "2\na b\nx.jpg 1 1\nx.jpg -1 1\n";
        let index = AnnotationIndex::parse(text);

        assert_eq!(index.len(), 1);
        assert_eq!(index.parsed_records(), 2);
        assert_eq!(index.lookup("x.jpg").unwrap().to_vec(), vec![0, 1]);
        assert_eq!(index.record_count_mismatch(), None);
    }

    #[test]
    fn malformed_records_keep_schema_length_test() {
        let text = "3\na b c\nshort.jpg 1\nlong.jpg 1 1 1 1\n\nbare.jpg\n";
        let index = AnnotationIndex::parse(text);

        assert_eq!(index.len(), 3);
        assert_eq!(index.lookup("short.jpg").unwrap().to_vec(), vec![1, 0, 0]);
        assert_eq!(index.lookup("long.jpg").unwrap().to_vec(), vec![1, 1, 1]);
        assert_eq!(index.lookup("bare.jpg").unwrap().to_vec(), vec![0, 0, 0]);
        assert_eq!(index.record_count_mismatch(), None);
    }

    #[test]
    fn unparsable_count_line_test() {
        let index = AnnotationIndex::parse("many\na\nx.jpg 1\n");
        assert_eq!(index.declared_count(), None);
        assert_eq!(index.record_count_mismatch(), None);
        assert_eq!(index.lookup("x.jpg").unwrap().to_vec(), vec![1]);
    }

    #[test]
    fn empty_file_test() {
        let index = AnnotationIndex::parse("");
        assert!(index.is_empty());
        assert!(index.schema().is_empty());
        assert_eq!(index.lookup_or_zeros("x.jpg").len(), 0);
    }

    #[test]
    fn iter_in_file_order_test() {
        let text = "3\na\nz.jpg 1\nm.jpg -1\na.jpg 1\n";
        let index = AnnotationIndex::parse(text);
        let filenames: Vec<_> = index.iter().map(|(filename, _)| filename).collect();
        assert_eq!(filenames, vec!["z.jpg", "m.jpg", "a.jpg"]);
    }

    #[test]
    fn schema_position_test() {
        let schema = AttributeSchema::new(["Smiling", "Eyeglasses", "Male"]);
        assert_eq!(schema.position_of("Male"), Some(2));
        assert_eq!(schema.position_of("Bald"), None);
        assert_eq!(schema.iter().collect::<Vec<_>>(), ["Smiling", "Eyeglasses", "Male"]);
    }

    #[test]
    fn open_test() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(ANNOTATION_FILE_NAME);
        fs::File::create(&path)?.write_all(EXAMPLE.as_bytes())?;

        let index = AnnotationIndex::open(&path)?;
        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup("b.jpg").unwrap().to_vec(), vec![0, 1]);

        let err = AnnotationIndex::open(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));

        // a directory is not an annotation file
        let err = AnnotationIndex::open(dir.path()).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        Ok(())
    }
}
