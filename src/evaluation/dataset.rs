use super::iou::{iou, UNDEFINED_IOU};
use super::types::{
    EvaluationRecord, MaskRender, Metrics, ANNOTATION_CAPTION, PREDICTION_CAPTION,
};
use crate::codec::MaskCodec;
use crate::error::{ContestError, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Pairs between progress summaries
const PROGRESS_INTERVAL: usize = 100;

/// Score every prediction against its annotation.
///
/// Walks indices `0..=max_index` (default: the last annotation index),
/// stopping at the end of the longer of the two lists. An
/// index whose prediction is missing or null is skipped, which lets partial
/// submissions be scored. A prediction without an annotation, a decode
/// failure or a shape mismatch aborts the evaluation.
pub fn score_dataset<C>(
    predictions: &[Option<String>],
    annotations: &[Option<String>],
    max_index: Option<usize>,
    codec: &C,
) -> Result<Vec<EvaluationRecord>>
where
    C: MaskCodec + ?Sized,
{
    let end = max_index.map_or(annotations.len(), |max| {
        max.saturating_add(1)
            .min(predictions.len().max(annotations.len()))
    });
    let _span = tracing::info_span!("score_dataset", indices = end).entered();

    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut total_load_time = Duration::ZERO;

    for index in 0..end {
        let Some(prediction_path) = predictions.get(index).and_then(Option::as_deref) else {
            tracing::debug!("No prediction at index {}, skipping", index);
            skipped += 1;
            continue;
        };
        let annotation_path = annotations
            .get(index)
            .and_then(Option::as_deref)
            .ok_or(ContestError::MissingAnnotation { index })?;

        let load_start = Instant::now();
        let prediction = codec.load(Path::new(prediction_path))?;
        let annotation = codec.load(Path::new(annotation_path))?;
        total_load_time += load_start.elapsed();

        let score = iou(&prediction, &annotation)?;
        tracing::debug!("Index {}: iou={:.4}", index, score);

        records.push(EvaluationRecord {
            index,
            prediction: MaskRender::new(PREDICTION_CAPTION, PathBuf::from(prediction_path), prediction),
            annotation: MaskRender::new(ANNOTATION_CAPTION, PathBuf::from(annotation_path), annotation),
            score,
        });

        if records.len() % PROGRESS_INTERVAL == 0 {
            let avg_load_ms = total_load_time.as_secs_f64() * 1000.0 / records.len() as f64;
            tracing::info!(
                "Scored {} pairs ({} skipped), load={:.1}ms/pair",
                records.len(),
                skipped,
                avg_load_ms
            );
        }
    }

    tracing::info!("Scored {} pairs, skipped {} indices", records.len(), skipped);
    Ok(records)
}

/// Mean of the scores above [`UNDEFINED_IOU`], if there are any
pub fn mean_defined(scores: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = scores
        .into_iter()
        .filter(|&score| score > UNDEFINED_IOU)
        .fold((0.0, 0usize), |(sum, count), score| (sum + score, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Aggregate records into [`Metrics`].
///
/// Doubly-empty pairs are left out of the mean rather than counted as zero.
/// Fails with `UndefinedMetric` when no record has a defined score.
pub fn extract_metrics(records: &[EvaluationRecord]) -> Result<Metrics> {
    let mean_iou = mean_defined(records.iter().map(|record| record.score)).ok_or(
        ContestError::UndefinedMetric {
            records: records.len(),
        },
    )?;
    Ok(Metrics::from_mean_iou(mean_iou))
}

/// [`score_dataset`] followed by [`extract_metrics`]
pub fn evaluate_dataset<C>(
    predictions: &[Option<String>],
    annotations: &[Option<String>],
    max_index: Option<usize>,
    codec: &C,
) -> Result<(Vec<EvaluationRecord>, Metrics)>
where
    C: MaskCodec + ?Sized,
{
    let records = score_dataset(predictions, annotations, max_index, codec)?;
    let metrics = extract_metrics(&records)?;
    tracing::info!("mean_iou={:.4} over {} records", metrics.mean_iou, records.len());
    Ok((records, metrics))
}
