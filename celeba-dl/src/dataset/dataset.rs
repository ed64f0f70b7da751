use super::*;
use crate::common::*;

/// The generic dataset trait.
pub trait GenericDataset
where
    Self: Send + Sync,
{
    /// The number of color channels of decoded images.
    fn input_channels(&self) -> usize;

    /// The ordered attribute names of the dataset.
    fn schema(&self) -> &AttributeSchema;
}

/// The dataset that can be random accessed.
pub trait RandomAccessDataset
where
    Self: GenericDataset,
{
    /// The image representation produced for each record.
    type Image;

    /// Get number of records in the dataset.
    fn num_records(&self) -> usize;

    /// Get the nth record in the dataset.
    fn nth(&self, index: usize) -> Result<DataRecord<Self::Image>>;

    /// Enumerate records in index order.
    fn records(&self) -> RecordIter<'_, Self>
    where
        Self: Sized,
    {
        RecordIter::new(self)
    }
}
