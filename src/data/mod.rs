mod dataset;
mod inference;
mod preprocess;

pub use dataset::{DataSplit, VidSegDataset};
pub use inference::{run_inference, to_mask_array, SegmentationModel};
pub use preprocess::Preprocessor;

use crate::codec::Mask;
use crate::error::Result;
use image::RgbImage;

/// One frame and, for labeled data, its ground-truth mask
#[derive(Clone, Debug)]
pub struct Sample {
    pub image: RgbImage,
    pub mask: Option<Mask>,
}

/// Trait for indexable frame collections
/// Anything with a length and random access can feed training or inference
pub trait FrameSource {
    /// Number of frames
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load the frame at `index`
    fn get(&self, index: usize) -> Result<Sample>;

    /// Iterate in consecutive batches of `batch_size` frames (the last may be
    /// shorter); a zero batch size is treated as one
    fn batches(&self, batch_size: usize) -> Batches<'_, Self>
    where
        Self: Sized,
    {
        Batches {
            source: self,
            batch_size: batch_size.max(1),
            next: 0,
        }
    }
}

/// Iterator over consecutive batches of a [`FrameSource`]
pub struct Batches<'a, S> {
    source: &'a S,
    batch_size: usize,
    next: usize,
}

impl<S: FrameSource> Batches<'_, S> {
    /// Total number of batches, `ceil(len / batch_size)`
    pub fn batch_count(&self) -> usize {
        self.source.len().div_ceil(self.batch_size)
    }
}

impl<S: FrameSource> Iterator for Batches<'_, S> {
    type Item = Result<Vec<Sample>>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.source.len();
        if self.next >= len {
            return None;
        }
        let end = (self.next + self.batch_size).min(len);
        let batch = (self.next..end).map(|index| self.source.get(index)).collect();
        self.next = end;
        Some(batch)
    }
}
