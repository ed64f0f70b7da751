//! The image decoding boundary.

use crate::common::*;

/// Decode an image file into 3-channel RGB pixels.
///
/// Implementations must be reentrant for the dataset to be read from
/// multiple threads.
pub trait ImageDecoder
where
    Self: Send + Sync,
{
    fn decode(&self, path: &Path) -> Result<RgbImage, ImageError>;
}

/// The decoder backed by the `image` crate. The format is guessed from file content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RgbDecoder;

impl ImageDecoder for RgbDecoder {
    fn decode(&self, path: &Path) -> Result<RgbImage, ImageError> {
        let image = image::io::Reader::open(path)?
            .with_guessed_format()?
            .decode()?;
        Ok(image.to_rgb8())
    }
}

impl<F> ImageDecoder for F
where
    F: Fn(&Path) -> Result<RgbImage, ImageError> + Send + Sync,
{
    fn decode(&self, path: &Path) -> Result<RgbImage, ImageError> {
        self(path)
    }
}
