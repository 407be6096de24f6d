use super::{FrameSource, Sample};
use crate::codec::{Mask, MaskCodec};
use crate::error::{ContestError, Result};
use crate::manifest::{Manifest, OUTPUT};
use ndarray::Array2;
use std::path::Path;
use std::time::Instant;

/// Trait for segmentation models
/// Allows any framework to produce masks for the contest
pub trait SegmentationModel {
    /// Predict one mask per sample of the batch
    ///
    /// # Returns
    /// * Foreground probabilities in 0.0-1.0, shape (height, width)
    fn predict(&mut self, batch: &[Sample]) -> Result<Vec<Array2<f32>>>;

    /// Reset internal state (for models with temporal/recurrent components)
    ///
    /// `run_inference` calls this before its first batch
    fn reset_state(&mut self) {
        // Default implementation: no-op for stateless models
    }
}

/// Scale a 0.0-1.0 prediction to 0-`scale` integer intensities.
///
/// Values are truncated; anything outside the `u8` range saturates.
pub fn to_mask_array(output: &Array2<f32>, scale: f32) -> Mask {
    output.mapv(|v| (v * scale) as u8)
}

/// Run `model` over `source` and save its masks for packaging.
///
/// Masks are written to `output_dir` as `00000.png`, `00001.png`, ... and the
/// returned manifest's `output` column holds their paths relative to the
/// parent of `output_dir`, which is how they appear inside a result artifact.
pub fn run_inference<M, S, C>(
    model: &mut M,
    source: &S,
    batch_size: usize,
    output_dir: &Path,
    codec: &C,
) -> Result<Manifest>
where
    M: SegmentationModel + ?Sized,
    S: FrameSource,
    C: MaskCodec + ?Sized,
{
    let _span = tracing::info_span!("run_inference", frames = source.len()).entered();
    std::fs::create_dir_all(output_dir)?;
    let artifact_root = output_dir.parent().unwrap_or_else(|| Path::new(""));

    model.reset_state();
    let mut outputs: Vec<Option<String>> = vec![None; source.len()];
    let mut index = 0usize;
    let start = Instant::now();

    for batch in source.batches(batch_size) {
        let batch = batch?;
        let predictions = model.predict(&batch)?;
        if predictions.len() != batch.len() {
            return Err(ContestError::InvalidOutput(format!(
                "model returned {} masks for a batch of {}",
                predictions.len(),
                batch.len()
            )));
        }

        for prediction in &predictions {
            let path = codec.save(&to_mask_array(prediction, 255.0), output_dir, index)?;
            let in_artifact = path.strip_prefix(artifact_root).unwrap_or(&path);
            outputs[index] = Some(in_artifact.to_string_lossy().into_owned());
            index += 1;
        }
        tracing::debug!("Saved {} of {} masks", index, source.len());
    }

    tracing::info!(
        "Inference over {} frames took {:.1}s",
        index,
        start.elapsed().as_secs_f64()
    );

    let mut manifest = Manifest::with_rows(source.len());
    manifest.insert_column(OUTPUT, outputs)?;
    Ok(manifest)
}
