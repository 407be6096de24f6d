use crate::codec::Mask;
use image::{imageops, RgbImage};
use ndarray::{Array2, Array4};

/// Per-channel statistics of the ImageNet training set
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Preprocessor for converting RGB frames to model input tensors
#[derive(Clone, Debug)]
pub struct Preprocessor {
    target_width: u32,
    target_height: u32,
    mean: [f32; 3],
    std: [f32; 3],
}

impl Preprocessor {
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
            mean: IMAGENET_MEAN,
            std: IMAGENET_STD,
        }
    }

    /// Replace the per-channel normalization statistics
    pub fn with_normalization(mut self, mean: [f32; 3], std: [f32; 3]) -> Self {
        self.mean = mean;
        self.std = std;
        self
    }

    /// Preprocess an RGB frame into a normalized NCHW tensor
    ///
    /// Steps:
    /// 1. Resize to target dimensions
    /// 2. Scale to [0, 1], then subtract the mean and divide by the std per channel
    /// 3. Transpose from HWC to NCHW format
    ///
    /// Returns: Array4<f32> with shape [1, 3, height, width]
    pub fn preprocess(&self, image: &RgbImage) -> Array4<f32> {
        let _span = tracing::debug_span!("preprocess").entered();

        let resized = if image.dimensions() != (self.target_width, self.target_height) {
            imageops::resize(
                image,
                self.target_width,
                self.target_height,
                imageops::FilterType::Lanczos3,
            )
        } else {
            image.clone()
        };

        let (width, height) = resized.dimensions();
        let mut tensor = Array4::<f32>::zeros((1, 3, height as usize, width as usize));

        for (x, y, pixel) in resized.enumerate_pixels() {
            for channel in 0..3 {
                let value = pixel[channel] as f32 / 255.0;
                tensor[[0, channel, y as usize, x as usize]] =
                    (value - self.mean[channel]) / self.std[channel];
            }
        }

        tensor
    }

    /// Mask as a float target in [0, 1]
    pub fn mask_to_unit(mask: &Mask) -> Array2<f32> {
        mask.mapv(|v| v as f32 / 255.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_preprocess_resizes_and_normalizes() {
        let image = RgbImage::from_pixel(4, 2, image::Rgb([255, 0, 128]));
        let tensor = Preprocessor::new(2, 2)
            .with_normalization([0.0; 3], [1.0; 3])
            .preprocess(&image);

        assert_eq!(tensor.shape(), &[1, 3, 2, 2]);
        assert!((tensor[[0, 0, 1, 1]] - 1.0).abs() < 1e-2);
        assert!(tensor[[0, 1, 0, 0]].abs() < 1e-2);
    }

    #[test]
    fn test_imagenet_normalization_applied_per_channel() {
        let image = RgbImage::from_pixel(1, 1, image::Rgb([0, 0, 0]));
        let tensor = Preprocessor::new(1, 1).preprocess(&image);
        assert!((tensor[[0, 2, 0, 0]] + 0.406 / 0.225).abs() < 1e-5);
    }

    #[test]
    fn test_mask_to_unit() {
        let mask = array![[0u8, 255]];
        assert_eq!(Preprocessor::mask_to_unit(&mask), array![[0.0f32, 1.0]]);
    }
}
