use super::clip_identities;
use crate::error::{ContestError, Result};
use crate::manifest::Manifest;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Options controlling a train/holdout split
#[derive(Clone, Debug, PartialEq)]
pub struct SplitOptions {
    /// Columns whose clip identities must agree; `None` checks the default
    /// `raw`/`annotation` columns that are present
    pub columns: Option<Vec<String>>,
    /// Fraction of clips (not rows) placed in the training split
    pub ratio: f64,
    /// Fixes the clip draw; unseeded splits differ from call to call
    pub seed: Option<u64>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            columns: None,
            ratio: 0.8,
            seed: None,
        }
    }
}

impl SplitOptions {
    pub fn with_ratio(ratio: f64) -> Self {
        Self {
            ratio,
            ..Self::default()
        }
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Split a manifest into `(train, holdout)` without dividing any clip.
///
/// `floor(ratio * clips)` distinct clips are drawn uniformly without
/// replacement for training; every row of those clips goes to the training
/// manifest and all remaining rows to holdout. Both outputs keep the input's
/// relative row order and are renumbered from zero. One side may be empty.
pub fn split(manifest: &Manifest, options: &SplitOptions) -> Result<(Manifest, Manifest)> {
    if !(0.0..=1.0).contains(&options.ratio) {
        return Err(ContestError::InvalidRatio(options.ratio));
    }

    let columns: Option<Vec<&str>> = options
        .columns
        .as_ref()
        .map(|columns| columns.iter().map(String::as_str).collect());
    let clips = clip_identities(manifest, columns.as_deref())?;

    let mut seen = HashSet::new();
    let names: Vec<&str> = clips
        .iter()
        .map(String::as_str)
        .filter(|name| seen.insert(*name))
        .collect();

    let train_count = ((options.ratio * names.len() as f64).floor() as usize).min(names.len());
    let train_clips = match options.seed {
        Some(seed) => sample_clips(&names, train_count, &mut StdRng::seed_from_u64(seed)),
        None => sample_clips(&names, train_count, &mut rand::rng()),
    };

    let (train_rows, holdout_rows): (Vec<usize>, Vec<usize>) =
        (0..clips.len()).partition(|&row| train_clips.contains(clips[row].as_str()));

    tracing::info!(
        "Split {} rows from {} clips: {} clips / {} rows train, {} clips / {} rows holdout",
        manifest.len(),
        names.len(),
        train_count,
        train_rows.len(),
        names.len() - train_count,
        holdout_rows.len()
    );

    let train = manifest.select(train_rows).reset_index();
    let holdout = manifest.select(holdout_rows).reset_index();
    Ok((train, holdout))
}

fn sample_clips<'a, R>(names: &[&'a str], count: usize, rng: &mut R) -> HashSet<&'a str>
where
    R: Rng + ?Sized,
{
    index::sample(rng, names.len(), count)
        .into_iter()
        .map(|i| names[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clips::clip_identity;
    use crate::manifest::{ANNOTATION, RAW};

    fn frames(clips: &[(&str, usize)]) -> Manifest {
        let mut raw = Vec::new();
        let mut annotation = Vec::new();
        for (clip, count) in clips {
            for frame in 0..*count {
                raw.push(Some(format!("JPEGImages/{clip}/{frame:05}.jpg")));
                annotation.push(Some(format!("Annotations/{clip}/{frame:05}.png")));
            }
        }
        Manifest::from_columns(vec![(RAW, raw), (ANNOTATION, annotation)]).unwrap()
    }

    fn clip_set(manifest: &Manifest) -> HashSet<String> {
        manifest
            .column(RAW)
            .unwrap()
            .iter()
            .map(|path| clip_identity(path.as_deref().unwrap()))
            .collect()
    }

    #[test]
    fn test_split_keeps_clips_together() {
        let manifest = frames(&[("bear", 3), ("dog", 2), ("cat", 4), ("fish", 1), ("owl", 5)]);
        let (train, holdout) = split(&manifest, &SplitOptions::default().seeded(7)).unwrap();

        let train_clips = clip_set(&train);
        let holdout_clips = clip_set(&holdout);
        assert_eq!(train_clips.len(), 4);
        assert_eq!(holdout_clips.len(), 1);
        assert!(train_clips.is_disjoint(&holdout_clips));
        assert_eq!(train.len() + holdout.len(), manifest.len());
        assert_eq!(train.index(), (0..train.len()).collect::<Vec<_>>().as_slice());
        assert_eq!(holdout.index(), (0..holdout.len()).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn test_seeded_split_is_reproducible() {
        let manifest = frames(&[("a", 2), ("b", 2), ("c", 2), ("d", 2), ("e", 2), ("f", 2)]);
        let options = SplitOptions::with_ratio(0.5).seeded(42);
        let first = split(&manifest, &options).unwrap();
        let second = split(&manifest, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extreme_ratios_leave_one_side_empty() {
        let manifest = frames(&[("a", 2), ("b", 1)]);

        let (train, holdout) = split(&manifest, &SplitOptions::with_ratio(0.0)).unwrap();
        assert!(train.is_empty());
        assert_eq!(holdout.len(), 3);

        // floor(0.4 * 2) == 0
        let (train, _) = split(&manifest, &SplitOptions::with_ratio(0.4)).unwrap();
        assert!(train.is_empty());

        let (train, holdout) = split(&manifest, &SplitOptions::with_ratio(1.0)).unwrap();
        assert_eq!(train, manifest);
        assert!(holdout.is_empty());
    }

    #[test]
    fn test_empty_manifest_splits_into_two_empty() {
        let manifest = frames(&[]);
        let (train, holdout) = split(&manifest, &SplitOptions::default()).unwrap();
        assert!(train.is_empty());
        assert!(holdout.is_empty());
    }

    #[test]
    fn test_manifest_without_columns_splits_into_two_empty() {
        let (train, holdout) = split(&Manifest::new(), &SplitOptions::default()).unwrap();
        assert!(train.is_empty());
        assert!(holdout.is_empty());
    }

    #[test]
    fn test_backslash_manifest_splits_on_clips() {
        let manifest = Manifest::from_paths(vec![(
            RAW,
            vec!["bear\\0.jpg", "dog\\0.jpg", "cat\\0.jpg", "owl\\0.jpg"],
        )])
        .unwrap();
        let (train, holdout) = split(&manifest, &SplitOptions::with_ratio(0.5).seeded(11)).unwrap();

        let train_clips: HashSet<String> = clip_identities(&train, None).unwrap().into_iter().collect();
        let holdout_clips: HashSet<String> =
            clip_identities(&holdout, None).unwrap().into_iter().collect();
        assert_eq!(train_clips.len(), 2);
        assert_eq!(holdout_clips.len(), 2);
        assert!(train_clips.is_disjoint(&holdout_clips));
    }

    #[test]
    fn test_rows_keep_relative_order() {
        let manifest = frames(&[("a", 3), ("b", 3)]);
        let (train, _) = split(&manifest, &SplitOptions::with_ratio(0.5).seeded(1)).unwrap();
        let paths: Vec<&str> = (0..train.len()).filter_map(|row| train.get(RAW, row)).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn test_inconsistent_row_aborts_split() {
        let manifest = Manifest::from_paths(vec![
            (RAW, vec!["clipA/0.png"]),
            (ANNOTATION, vec!["clipB/0.png"]),
        ])
        .unwrap();
        let err = split(&manifest, &SplitOptions::default()).unwrap_err();
        assert!(matches!(err, ContestError::InconsistentClip { row: 0, .. }));
    }

    #[test]
    fn test_ratio_outside_unit_interval_rejected() {
        let manifest = frames(&[("a", 1)]);
        for ratio in [-0.1, 1.5, f64::NAN] {
            let err = split(&manifest, &SplitOptions::with_ratio(ratio)).unwrap_err();
            assert!(matches!(err, ContestError::InvalidRatio(_)));
        }
    }

    #[test]
    fn test_explicit_columns_limit_the_check() {
        let manifest = Manifest::from_paths(vec![
            (RAW, vec!["clipA/0.jpg", "clipB/0.jpg"]),
            (ANNOTATION, vec!["other/0.png", "other/1.png"]),
        ])
        .unwrap();
        let options = SplitOptions {
            columns: Some(vec![RAW.to_string()]),
            ratio: 0.5,
            seed: Some(3),
        };
        let (train, holdout) = split(&manifest, &options).unwrap();
        assert_eq!(train.len(), 1);
        assert_eq!(holdout.len(), 1);
    }
}
