mod png;

pub use png::{load_frame, PngCodec};

use crate::error::Result;
use ndarray::Array2;
use std::path::{Path, PathBuf};

/// Single-channel mask, indexed `[row, column]`; 0 is background, 255 foreground
pub type Mask = Array2<u8>;

/// Trait for mask storage backends
/// Allows evaluating against files on disk or masks held in memory
pub trait MaskCodec {
    /// Decode the mask stored at `path`
    fn load(&self, path: &Path) -> Result<Mask>;

    /// Encode `mask` into `folder` under the name for frame `index`
    ///
    /// Returns the path written
    fn save(&self, mask: &Mask, folder: &Path, index: usize) -> Result<PathBuf>;
}

/// File name for frame `index`, zero-padded to five digits
pub fn frame_file_name(index: usize) -> String {
    format!("{index:05}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_file_name_pads_to_five_digits() {
        assert_eq!(frame_file_name(7), "00007.png");
        assert_eq!(frame_file_name(123456), "123456.png");
    }
}
