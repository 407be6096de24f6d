use thiserror::Error;

/// Errors raised while partitioning manifests or scoring masks
#[derive(Debug, Error)]
pub enum ContestError {
    /// Path mixes `\` and `/` and cannot be moved between separator conventions
    #[error("path {path:?} mixes `\\` and `/` separators")]
    Format { path: String },

    /// Path columns of one row infer different clips
    #[error("row {row} has inconsistent clip identities across columns: {identities:?}")]
    InconsistentClip {
        row: usize,
        identities: Vec<Option<String>>,
    },

    /// Prediction and annotation masks differ in (height, width)
    #[error("prediction shape {prediction:?} does not match annotation shape {annotation:?}")]
    ShapeMismatch {
        prediction: (usize, usize),
        annotation: (usize, usize),
    },

    /// No record produced a real score, so there is nothing to average
    #[error("mean IoU is undefined: none of {records} records had a defined score")]
    UndefinedMetric { records: usize },

    #[error("manifest has no column {column:?}")]
    MissingColumn { column: String },

    #[error("split ratio must lie in [0, 1], got {0}")]
    InvalidRatio(f64),

    #[error("manifest row key {key:?} is not an integer index")]
    InvalidRowKey { key: String },

    #[error("column {column:?} has {found} rows, manifest has {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("column {column:?} is null at row {row}")]
    NullPath { column: String, row: usize },

    #[error("frame index {index} is out of range for {len} frames")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("prediction at index {index} has no annotation to compare against")]
    MissingAnnotation { index: usize },

    #[error("artifact {name:?} does not contain a top-level paths.json")]
    MissingManifest { name: String },

    #[error("invalid model output: {0}")]
    InvalidOutput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, ContestError>;
