//! Dataset configuration format.

use crate::{
    common::*,
    dataset::{read_text_file, FaceDataset, FaceDatasetBuilder, DEFAULT_ROOT_DIR},
    processor::{Resize, RgbDecoder, Transform},
};

/// The dataset configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// The directory containing `images/` and `list_attr_celeba.txt`.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
    /// If set, keep a uniform random sample of this many images.
    #[serde(default)]
    pub subset_size: Option<usize>,
    /// The seed for subset sampling.
    #[serde(default)]
    pub seed: Option<u64>,
    /// If set, resize images to this size.
    #[serde(default)]
    pub image_size: Option<ImageSize>,
    /// Reject annotation files whose declared record count is wrong.
    #[serde(default)]
    pub strict_record_count: bool,
}

/// Image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub height: u32,
    pub width: u32,
}

impl DatasetConfig {
    pub fn new(root_dir: impl AsRef<Path>) -> Self {
        Self {
            root_dir: root_dir.as_ref().to_owned(),
            ..Default::default()
        }
    }

    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = read_text_file(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }

    /// The resize transform, if an image size is configured.
    pub fn resize(&self) -> Option<Resize> {
        self.image_size
            .map(|ImageSize { height, width }| Resize::new(height, width))
    }

    /// A dataset builder with the configured options.
    pub fn builder(&self) -> FaceDatasetBuilder {
        let mut builder =
            FaceDataset::builder(&self.root_dir).strict_record_count(self.strict_record_count);
        if let Some(subset_size) = self.subset_size {
            builder = builder.subset_size(subset_size);
        }
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        builder
    }

    /// Build the dataset with `transform` applied after the configured resize.
    pub fn build_with<T>(&self, transform: T) -> Result<FaceDataset<ResizeThen<T>, RgbDecoder>>
    where
        T: Transform<RgbImage>,
    {
        self.builder()
            .transform(ResizeThen {
                resize: self.resize(),
                transform,
            })
            .build()
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            subset_size: None,
            seed: None,
            image_size: None,
            strict_record_count: false,
        }
    }
}

/// The optional configured resize followed by a user transform.
#[derive(Debug, Clone, Copy)]
pub struct ResizeThen<T> {
    pub resize: Option<Resize>,
    pub transform: T,
}

impl<T> Transform<RgbImage> for ResizeThen<T>
where
    T: Transform<RgbImage>,
{
    type Output = T::Output;

    fn apply(&self, image: RgbImage) -> T::Output {
        let image = match &self.resize {
            Some(resize) => resize.apply(image),
            None => image,
        };
        self.transform.apply(image)
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ROOT_DIR)
}
