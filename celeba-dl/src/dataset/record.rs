use crate::common::*;

/// The record with file name and attributes, but without image pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub filename: String,
    pub path: PathBuf,
    /// Binary presence flags, one per schema attribute.
    pub attributes: Array1<i64>,
}

/// The record with image pixels and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRecord<T = RgbImage> {
    pub image: T,
    pub attributes: Array1<i64>,
}

impl<T> DataRecord<T> {
    /// Split the record into the `(image, attributes)` pair.
    pub fn into_pair(self) -> (T, Array1<i64>) {
        let Self { image, attributes } = self;
        (image, attributes)
    }
}
