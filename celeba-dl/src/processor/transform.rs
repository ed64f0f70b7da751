//! Image transforms applied at item access time.

use crate::common::*;

/// A pure function applied to each decoded image.
pub trait Transform<Input>
where
    Self: Send + Sync,
{
    type Output;

    fn apply(&self, input: Input) -> Self::Output;
}

impl<Input, Output, F> Transform<Input> for F
where
    F: Fn(Input) -> Output + Send + Sync,
{
    type Output = Output;

    fn apply(&self, input: Input) -> Output {
        self(input)
    }
}

/// The pass-through transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl<Input> Transform<Input> for Identity {
    type Output = Input;

    fn apply(&self, input: Input) -> Input {
        input
    }
}

/// Resize images to exact dimensions.
#[derive(Debug, Clone, Copy)]
pub struct Resize {
    pub height: u32,
    pub width: u32,
    pub filter: FilterType,
}

impl Resize {
    pub fn new(height: u32, width: u32) -> Self {
        Self {
            height,
            width,
            filter: FilterType::Triangle,
        }
    }

    pub fn filter(self, filter: FilterType) -> Self {
        Self { filter, ..self }
    }
}

impl Transform<RgbImage> for Resize {
    type Output = RgbImage;

    fn apply(&self, image: RgbImage) -> RgbImage {
        if image.dimensions() == (self.width, self.height) {
            return image;
        }
        image::imageops::resize(&image, self.width, self.height, self.filter)
    }
}

/// Convert an image to a `[channel, height, width]` array with values in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToArray;

impl Transform<RgbImage> for ToArray {
    type Output = Array3<f32>;

    fn apply(&self, image: RgbImage) -> Array3<f32> {
        let (width, height) = image.dimensions();
        Array3::from_shape_fn(
            (3, height as usize, width as usize),
            |(channel, row, col)| {
                image.get_pixel(col as u32, row as u32).0[channel] as f32 / 255.0
            },
        )
    }
}

/// Standardize each channel of a `[channel, height, width]` array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Normalize {
    pub fn new(mean: [f32; 3], std: [f32; 3]) -> Self {
        Self { mean, std }
    }
}

impl Transform<Array3<f32>> for Normalize {
    type Output = Array3<f32>;

    fn apply(&self, mut array: Array3<f32>) -> Array3<f32> {
        array
            .axis_iter_mut(Axis(0))
            .zip(self.mean.iter().zip(self.std.iter()))
            .for_each(|(mut channel, (&mean, &std_dev))| {
                channel.mapv_inplace(|value| (value - mean) / std_dev);
            });
        array
    }
}

/// Apply `first` and then `second`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compose<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Compose<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<Input, A, B> Transform<Input> for Compose<A, B>
where
    A: Transform<Input>,
    B: Transform<A::Output>,
{
    type Output = B::Output;

    fn apply(&self, input: Input) -> B::Output {
        self.second.apply(self.first.apply(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use image::Rgb;

    fn checker(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([255, 0, 51])
            } else {
                Rgb([0, 255, 102])
            }
        })
    }

    #[test]
    fn identity_test() {
        let image = checker(3, 2);
        assert_eq!(Identity.apply(image.clone()), image);
    }

    #[test]
    fn resize_test() {
        let resized = Resize::new(4, 6).filter(FilterType::Nearest).apply(checker(3, 2));
        assert_eq!(resized.dimensions(), (6, 4));
    }

    #[test]
    fn to_array_test() {
        let array = ToArray.apply(checker(3, 2));
        assert_eq!(array.shape(), &[3, 2, 3]);
        assert_abs_diff_eq!(array[[0, 0, 0]], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(array[[1, 0, 0]], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(array[[2, 0, 0]], 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(array[[0, 0, 1]], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(array[[2, 1, 0]], 0.4, epsilon = 1e-6);
    }

    #[test]
    fn normalize_test() {
        let array = Array3::from_elem((3, 2, 2), 0.5f32);
        let output = Normalize::new([0.5, 0.0, 0.25], [1.0, 0.5, 0.5]).apply(array);
        assert!(output.index_axis(Axis(0), 0).iter().all(|&v| v.abs() < 1e-6));
        assert!(output
            .index_axis(Axis(0), 1)
            .iter()
            .all(|&v| (v - 1.0).abs() < 1e-6));
        assert!(output
            .index_axis(Axis(0), 2)
            .iter()
            .all(|&v| (v - 0.5).abs() < 1e-6));
    }

    #[test]
    fn compose_test() {
        let transform = Compose::new(
            Compose::new(Resize::new(8, 8), ToArray),
            Normalize::new([0.5; 3], [0.5; 3]),
        );
        let array = transform.apply(checker(3, 2));
        assert_eq!(array.shape(), &[3, 8, 8]);
        assert!(array.iter().all(|&v| (-1.0..=1.0).contains(&v)));
    }

    #[test]
    fn closure_test() {
        let transform = |image: RgbImage| image.dimensions();
        assert_eq!(transform.apply(checker(5, 7)), (5, 7));
    }
}
