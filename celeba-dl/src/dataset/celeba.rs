//! The CelebA face attribute dataset.
//!
//! The dataset root is expected to contain
//!
//! ```text
//! <root>/images/<filename>
//! <root>/list_attr_celeba.txt
//! ```
//!
//! The files under `images` define the dataset length and the order of
//! records. Images are decoded on each access, attributes are looked up in an
//! index built once at construction.

use super::*;
use crate::{
    common::*,
    processor::{Identity, ImageDecoder, RgbDecoder, Transform},
};

/// The name of the image directory under the dataset root.
pub const IMAGE_DIR_NAME: &str = "images";

/// The default dataset root.
pub const DEFAULT_ROOT_DIR: &str = "data/celeba";

/// Builder for [`FaceDataset`].
pub struct FaceDatasetBuilder<T = Identity, D = RgbDecoder> {
    root_dir: PathBuf,
    transform: T,
    decoder: D,
    subset_size: Option<usize>,
    seed: Option<u64>,
    index: Option<Arc<AnnotationIndex>>,
    strict_record_count: bool,
}

impl FaceDatasetBuilder {
    pub fn new(root_dir: impl AsRef<Path>) -> Self {
        Self {
            root_dir: root_dir.as_ref().to_owned(),
            transform: Identity,
            decoder: RgbDecoder,
            subset_size: None,
            seed: None,
            index: None,
            strict_record_count: false,
        }
    }
}

impl<T, D> FaceDatasetBuilder<T, D>
where
    T: Transform<RgbImage>,
    D: ImageDecoder,
{
    /// Apply `transform` on every decoded image.
    pub fn transform<U>(self, transform: U) -> FaceDatasetBuilder<U, D>
    where
        U: Transform<RgbImage>,
    {
        let Self {
            root_dir,
            decoder,
            subset_size,
            seed,
            index,
            strict_record_count,
            ..
        } = self;

        FaceDatasetBuilder {
            root_dir,
            transform,
            decoder,
            subset_size,
            seed,
            index,
            strict_record_count,
        }
    }

    /// Decode images with `decoder` instead of the default [`RgbDecoder`].
    pub fn decoder<E>(self, decoder: E) -> FaceDatasetBuilder<T, E>
    where
        E: ImageDecoder,
    {
        let Self {
            root_dir,
            transform,
            subset_size,
            seed,
            index,
            strict_record_count,
            ..
        } = self;

        FaceDatasetBuilder {
            root_dir,
            transform,
            decoder,
            subset_size,
            seed,
            index,
            strict_record_count,
        }
    }

    /// Keep a uniform random sample of `subset_size` files.
    pub fn subset_size(mut self, subset_size: usize) -> Self {
        self.subset_size = Some(subset_size);
        self
    }

    /// Seed the subset sampling. The sampling is seeded from entropy if unset.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reuse an already loaded annotation index instead of loading the
    /// annotation file under the root directory.
    pub fn index(mut self, index: Arc<AnnotationIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Fail if the record count on the first line of the annotation file
    /// disagrees with the records found.
    pub fn strict_record_count(mut self, yes: bool) -> Self {
        self.strict_record_count = yes;
        self
    }

    pub fn build(self) -> Result<FaceDataset<T, D>> {
        let Self {
            root_dir,
            transform,
            decoder,
            subset_size,
            seed,
            index,
            strict_record_count,
        } = self;

        let image_dir = root_dir.join(IMAGE_DIR_NAME);

        // build manifest
        let manifest = {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            FileManifest::scan(&image_dir, subset_size, &mut rng)?
        };

        // load annotations
        let index = match index {
            Some(index) => index,
            None => Arc::new(AnnotationIndex::open(
                root_dir.join(ANNOTATION_FILE_NAME),
            )?),
        };
        if strict_record_count {
            index.check_record_count()?;
        }

        let num_unannotated = manifest
            .iter()
            .filter(|filename| !index.contains(filename))
            .count();
        if num_unannotated > 0 {
            warn!(
                "{} image files in '{}' have no annotation, their attributes are all zeros",
                num_unannotated,
                image_dir.display()
            );
        }

        info!(
            "loaded CelebA dataset at '{}' with {} images and {} attributes",
            root_dir.display(),
            manifest.len(),
            index.attribute_count()
        );

        Ok(FaceDataset {
            image_dir,
            manifest,
            index,
            transform,
            decoder,
        })
    }
}

/// The dataset of face images paired with binary attribute vectors.
///
/// The dataset is immutable after construction and can be shared across
/// threads calling [`get`](FaceDataset::get) concurrently.
pub struct FaceDataset<T = Identity, D = RgbDecoder> {
    image_dir: PathBuf,
    manifest: FileManifest,
    index: Arc<AnnotationIndex>,
    transform: T,
    decoder: D,
}

impl FaceDataset {
    /// Convenience entry-point: `FaceDataset::builder(root)` returns a builder.
    pub fn builder(root_dir: impl AsRef<Path>) -> FaceDatasetBuilder {
        FaceDatasetBuilder::new(root_dir)
    }

    /// Open the dataset at `root_dir` without transform or subsampling.
    pub fn open(root_dir: impl AsRef<Path>) -> Result<Self> {
        FaceDatasetBuilder::new(root_dir).build()
    }
}

impl<T, D> FaceDataset<T, D>
where
    T: Transform<RgbImage>,
    D: ImageDecoder,
{
    /// The number of images in the dataset.
    pub fn len(&self) -> usize {
        self.manifest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifest.is_empty()
    }

    /// Decode the image at `index` and pair it with its attributes.
    pub fn get(&self, index: usize) -> Result<DataRecord<T::Output>> {
        let filename = self.filename(index)?;
        let path = self.image_dir.join(filename);

        let image = self
            .decoder
            .decode(&path)
            .map_err(|source| Error::Decode { path, source })?;
        let image = self.transform.apply(image);
        let attributes = self.index.lookup_or_zeros(filename);

        Ok(DataRecord { image, attributes })
    }

    /// Get the file name at `index`.
    pub fn filename(&self, index: usize) -> Result<&str> {
        self.manifest.get(index).ok_or(Error::Index {
            index,
            len: self.len(),
        })
    }

    /// Get the image path at `index`.
    pub fn path_of(&self, index: usize) -> Result<PathBuf> {
        Ok(self.image_dir.join(self.filename(index)?))
    }

    /// Get the attributes at `index` without decoding the image.
    pub fn attributes_of(&self, index: usize) -> Result<Array1<i64>> {
        Ok(self.index.lookup_or_zeros(self.filename(index)?))
    }

    /// Get the record at `index` without decoding the image.
    pub fn file_record(&self, index: usize) -> Result<FileRecord> {
        let filename = self.filename(index)?;
        Ok(FileRecord {
            filename: filename.to_owned(),
            path: self.image_dir.join(filename),
            attributes: self.index.lookup_or_zeros(filename),
        })
    }

    /// Count the images having each attribute, in schema order.
    pub fn attribute_frequencies(&self) -> Array1<usize> {
        let init = Array1::zeros(self.attribute_count());
        self.manifest
            .iter()
            .filter_map(|filename| self.index.lookup(filename))
            .fold(init, |mut counts, values| {
                counts.zip_mut_with(&values, |count, &value| *count += value as usize);
                counts
            })
    }

    pub fn attribute_count(&self) -> usize {
        self.index.attribute_count()
    }

    pub fn schema(&self) -> &AttributeSchema {
        self.index.schema()
    }

    pub fn index(&self) -> &Arc<AnnotationIndex> {
        &self.index
    }

    pub fn manifest(&self) -> &FileManifest {
        &self.manifest
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Enumerate all records in index order.
    pub fn iter(&self) -> RecordIter<'_, Self> {
        RecordIter::new(self)
    }
}

impl<T, D> GenericDataset for FaceDataset<T, D>
where
    T: Transform<RgbImage>,
    D: ImageDecoder,
{
    fn input_channels(&self) -> usize {
        3
    }

    fn schema(&self) -> &AttributeSchema {
        self.index.schema()
    }
}

impl<T, D> RandomAccessDataset for FaceDataset<T, D>
where
    T: Transform<RgbImage>,
    D: ImageDecoder,
{
    type Image = T::Output;

    fn num_records(&self) -> usize {
        self.len()
    }

    fn nth(&self, index: usize) -> Result<DataRecord<T::Output>> {
        self.get(index)
    }
}

impl<T, D> Debug for FaceDataset<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaceDataset")
            .field("image_dir", &self.image_dir)
            .field("len", &self.manifest.len())
            .field("attribute_count", &self.index.attribute_count())
            .finish()
    }
}

impl<T, D> Debug for FaceDatasetBuilder<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaceDatasetBuilder")
            .field("root_dir", &self.root_dir)
            .field("subset_size", &self.subset_size)
            .field("seed", &self.seed)
            .field("strict_record_count", &self.strict_record_count)
            .finish()
    }
}
