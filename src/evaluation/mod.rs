mod dataset;
mod iou;
mod submission;
pub mod types;

pub use dataset::{evaluate_dataset, extract_metrics, mean_defined, score_dataset};
pub use iou::{binarize, binary_iou, iou, UNDEFINED_IOU};
pub use submission::{
    check_result_metadata, make_result_artifact, name_submission, REQUIRED_METADATA_KEYS,
};
pub use types::{EvaluationRecord, EvaluationTable, MaskRender, Metrics};
