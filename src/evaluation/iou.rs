use crate::error::{ContestError, Result};
use ndarray::{Array2, ArrayBase, Data, Ix2};

/// Score reported when both masks are entirely background.
///
/// It is an expected outcome rather than an error, and is excluded from the
/// dataset mean.
pub const UNDEFINED_IOU: f64 = -1.0;

/// Map 0-255 intensities to 0/1 by rounding `v / 255` (128 and above is foreground)
pub fn binarize<S>(mask: &ArrayBase<S, Ix2>) -> Array2<u8>
where
    S: Data<Elem = u8>,
{
    mask.mapv(|v| u8::from(v >= 128))
}

/// Intersection over union of two 0-255 masks.
///
/// Both masks are binarized first. Returns [`UNDEFINED_IOU`] when the union
/// is empty, otherwise a value in `[0, 1]`.
pub fn iou<S1, S2>(prediction: &ArrayBase<S1, Ix2>, annotation: &ArrayBase<S2, Ix2>) -> Result<f64>
where
    S1: Data<Elem = u8>,
    S2: Data<Elem = u8>,
{
    if prediction.dim() != annotation.dim() {
        return Err(ContestError::ShapeMismatch {
            prediction: prediction.dim(),
            annotation: annotation.dim(),
        });
    }
    Ok(binary_iou(&binarize(prediction), &binarize(annotation)))
}

/// IoU of two same-shape masks already holding only 0s and 1s
pub fn binary_iou(prediction: &Array2<u8>, annotation: &Array2<u8>) -> f64 {
    let intersection = prediction * annotation;
    let union = &(prediction + annotation) - &intersection;

    let intersection_size = pixel_count(&intersection);
    let union_size = pixel_count(&union);

    if union_size == 0 {
        return UNDEFINED_IOU;
    }
    intersection_size as f64 / union_size as f64
}

fn pixel_count(mask: &Array2<u8>) -> u64 {
    mask.iter().map(|&v| u64::from(v)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_binarize_rounds_at_half_intensity() {
        let mask = array![[0u8, 127, 128, 255]];
        assert_eq!(binarize(&mask), array![[0u8, 0, 1, 1]]);
    }

    #[test]
    fn test_partial_overlap() {
        let prediction = array![[255u8, 255, 0, 0]];
        let annotation = array![[255u8, 0, 255, 0]];
        let score = iou(&prediction, &annotation).unwrap();
        assert!((score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_both_empty_is_sentinel() {
        let empty = Array2::<u8>::zeros((4, 5));
        assert_eq!(iou(&empty, &empty).unwrap(), UNDEFINED_IOU);
    }

    #[test]
    fn test_disjoint_is_real_zero() {
        let prediction = array![[255u8, 0]];
        let annotation = array![[0u8, 255]];
        assert_eq!(iou(&prediction, &annotation).unwrap(), 0.0);
    }

    #[test]
    fn test_lossy_intensities_binarized_before_scoring() {
        let prediction = array![[250u8, 140], [3, 90]];
        let annotation = array![[255u8, 255], [0, 0]];
        assert_eq!(iou(&prediction, &annotation).unwrap(), 1.0);
    }

    #[test]
    fn test_shape_mismatch_is_an_error_not_a_sentinel() {
        let prediction = Array2::<u8>::zeros((2, 3));
        let annotation = Array2::<u8>::zeros((3, 2));
        let err = iou(&prediction, &annotation).unwrap_err();
        assert!(matches!(
            err,
            ContestError::ShapeMismatch {
                prediction: (2, 3),
                annotation: (3, 2)
            }
        ));
    }

    #[test]
    fn test_accepts_views() {
        let mask = array![[255u8, 0], [0, 255]];
        assert_eq!(iou(&mask.view(), &mask).unwrap(), 1.0);
    }
}
