use super::*;
use crate::common::*;

/// Sequential iterator over the records of a random access dataset.
#[derive(Debug)]
pub struct RecordIter<'a, D>
where
    D: RandomAccessDataset,
{
    dataset: &'a D,
    range: std::ops::Range<usize>,
}

impl<'a, D> RecordIter<'a, D>
where
    D: RandomAccessDataset,
{
    pub fn new(dataset: &'a D) -> Self {
        Self {
            dataset,
            range: 0..dataset.num_records(),
        }
    }
}

impl<'a, D> Iterator for RecordIter<'a, D>
where
    D: RandomAccessDataset,
{
    type Item = Result<DataRecord<D::Image>>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.range.next()?;
        Some(self.dataset.nth(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl<'a, D> DoubleEndedIterator for RecordIter<'a, D>
where
    D: RandomAccessDataset,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.range.next_back()?;
        Some(self.dataset.nth(index))
    }
}

impl<'a, D> ExactSizeIterator for RecordIter<'a, D> where D: RandomAccessDataset {}

impl<'a, D> FusedIterator for RecordIter<'a, D> where D: RandomAccessDataset {}
