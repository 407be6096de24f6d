use super::iou::UNDEFINED_IOU;
use crate::codec::Mask;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const PREDICTION_CAPTION: &str = "model output";
pub const ANNOTATION_CAPTION: &str = "target";

/// A decoded mask together with where it came from
#[derive(Clone, Debug, Serialize)]
pub struct MaskRender {
    pub caption: String,
    pub path: PathBuf,
    #[serde(skip)]
    pub mask: Mask,
}

impl MaskRender {
    pub fn new(caption: &str, path: PathBuf, mask: Mask) -> Self {
        Self {
            caption: caption.to_string(),
            path,
            mask,
        }
    }
}

/// One scored prediction/annotation pair
#[derive(Clone, Debug, Serialize)]
pub struct EvaluationRecord {
    /// Manifest row the pair was read from
    pub index: usize,
    pub prediction: MaskRender,
    pub annotation: MaskRender,
    pub score: f64,
}

impl EvaluationRecord {
    /// False for doubly-empty pairs
    pub fn is_defined(&self) -> bool {
        self.score > UNDEFINED_IOU
    }
}

/// Aggregate metrics for a result.
///
/// `segmentation_metric` is the leaderboard name for the same value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub mean_iou: f64,
    pub segmentation_metric: f64,
}

impl Metrics {
    pub fn from_mean_iou(mean_iou: f64) -> Self {
        Self {
            mean_iou,
            segmentation_metric: mean_iou,
        }
    }
}

/// Tabular view of an evaluation: `out`, `target`, `iou_score` per record
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvaluationTable {
    pub columns: [&'static str; 3],
    pub data: Vec<(PathBuf, PathBuf, f64)>,
}

impl EvaluationTable {
    pub fn from_records(records: &[EvaluationRecord]) -> Self {
        let data = records
            .iter()
            .map(|record| {
                (
                    record.prediction.path.clone(),
                    record.annotation.path.clone(),
                    record.score,
                )
            })
            .collect();
        Self {
            columns: ["out", "target", "iou_score"],
            data,
        }
    }
}
