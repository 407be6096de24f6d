//! Tools for the DAVIS video segmentation contest: clip-aware train/holdout
//! splits, IoU scoring of predicted masks, and portable path manifests.

pub mod artifact;
pub mod clips;
pub mod codec;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod manifest;
pub mod paths;

pub use clips::{clip_identities, clip_identity, split, SplitOptions};
pub use error::{ContestError, Result};
pub use evaluation::{evaluate_dataset, iou, EvaluationRecord, Metrics};
pub use manifest::Manifest;
pub use paths::{normalize, resolve_manifest, Rebase};
