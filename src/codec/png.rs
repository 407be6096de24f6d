use super::{frame_file_name, Mask, MaskCodec};
use crate::error::{ContestError, Result};
use image::{GrayImage, RgbImage};
use std::path::{Path, PathBuf};

/// PNG-backed masks on the local filesystem
#[derive(Clone, Copy, Debug, Default)]
pub struct PngCodec;

impl MaskCodec for PngCodec {
    fn load(&self, path: &Path) -> Result<Mask> {
        let _span = tracing::debug_span!("load_mask").entered();

        // Colour or 16-bit masks are reduced to 8-bit luma
        let gray = image::open(path)?.to_luma8();
        let (width, height) = gray.dimensions();
        let mask = Mask::from_shape_vec((height as usize, width as usize), gray.into_raw())?;
        Ok(mask)
    }

    fn save(&self, mask: &Mask, folder: &Path, index: usize) -> Result<PathBuf> {
        let (width, height) = image_dimensions(mask.dim())?;
        let path = folder.join(frame_file_name(index));

        // Iterating the array yields logical row-major order regardless of layout
        let pixels: Vec<u8> = mask.iter().copied().collect();
        let gray = GrayImage::from_raw(width, height, pixels).ok_or_else(|| {
            ContestError::InvalidOutput(format!(
                "mask of {width}x{height} does not fit an image buffer"
            ))
        })?;
        gray.save(&path)?;

        tracing::debug!("Saved mask {} to {}", index, path.display());
        Ok(path)
    }
}

/// (width, height) of an image holding a (height, width) mask
fn image_dimensions((height, width): (usize, usize)) -> Result<(u32, u32)> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(ContestError::InvalidOutput(format!(
            "mask of {width}x{height} exceeds the image size limit"
        ))),
    }
}

/// Read a raw RGB frame
pub fn load_frame(path: &Path) -> Result<RgbImage> {
    Ok(image::open(path)?.to_rgb8())
}
