use super::{FrameSource, Sample};
use crate::clips::{split, SplitOptions};
use crate::codec::{load_frame, MaskCodec, PngCodec};
use crate::error::{ContestError, Result};
use crate::manifest::{Manifest, ANNOTATION, RAW};
use std::path::PathBuf;

/// Frames listed in a manifest's `raw` column, optionally paired with the
/// masks in its `annotation` column
#[derive(Clone, Debug)]
pub struct VidSegDataset<C = PngCodec> {
    images: Vec<PathBuf>,
    annotations: Option<Vec<PathBuf>>,
    codec: C,
}

impl VidSegDataset<PngCodec> {
    pub fn from_manifest(manifest: &Manifest, has_annotations: bool) -> Result<Self> {
        Self::with_codec(manifest, has_annotations, PngCodec)
    }
}

impl<C: MaskCodec> VidSegDataset<C> {
    pub fn with_codec(manifest: &Manifest, has_annotations: bool, codec: C) -> Result<Self> {
        let images = required_paths(manifest, RAW)?;
        let annotations = if has_annotations {
            Some(required_paths(manifest, ANNOTATION)?)
        } else {
            None
        };
        tracing::debug!(
            "Dataset of {} frames (annotated: {})",
            images.len(),
            has_annotations
        );
        Ok(Self {
            images,
            annotations,
            codec,
        })
    }

    pub fn has_annotations(&self) -> bool {
        self.annotations.is_some()
    }
}

impl<C: MaskCodec> FrameSource for VidSegDataset<C> {
    fn len(&self) -> usize {
        self.images.len()
    }

    fn get(&self, index: usize) -> Result<Sample> {
        let out_of_range = || ContestError::IndexOutOfRange {
            index,
            len: self.images.len(),
        };
        let image = load_frame(self.images.get(index).ok_or_else(out_of_range)?)?;
        let mask = match &self.annotations {
            Some(annotations) => {
                let path = annotations.get(index).ok_or_else(out_of_range)?;
                Some(self.codec.load(path)?)
            }
            None => None,
        };
        Ok(Sample { image, mask })
    }
}

fn required_paths(manifest: &Manifest, column: &str) -> Result<Vec<PathBuf>> {
    manifest
        .require_column(column)?
        .iter()
        .enumerate()
        .map(|(row, value)| {
            value.as_deref().map(PathBuf::from).ok_or_else(|| ContestError::NullPath {
                column: column.to_string(),
                row,
            })
        })
        .collect()
}

/// Training and holdout manifests for one run
#[derive(Clone, Debug, PartialEq)]
pub struct DataSplit {
    pub train: Manifest,
    pub holdout: Manifest,
}

impl DataSplit {
    /// Use `holdout` when given, otherwise split it off `training` by clip
    pub fn prepare(
        training: Manifest,
        holdout: Option<Manifest>,
        options: &SplitOptions,
    ) -> Result<Self> {
        match holdout {
            Some(holdout) => Ok(Self {
                train: training,
                holdout,
            }),
            None => {
                tracing::info!("No holdout manifest given, splitting at ratio {}", options.ratio);
                let (train, holdout) = split(&training, options)?;
                Ok(Self { train, holdout })
            }
        }
    }
}
