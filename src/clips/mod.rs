//! Clip-aware partitioning of frame manifests.
//!
//! Frames of one clip live in a directory named after the clip, so the clip
//! identity of a frame is its parent directory name. Splits operate on the set
//! of distinct clips rather than on rows, which keeps every frame of a clip on
//! the same side of the train/holdout boundary.

mod split;

pub use split::{split, SplitOptions};

use crate::error::{ContestError, Result};
use crate::manifest::{Manifest, ANNOTATION, RAW};
use crate::paths::normalize;
use std::path::Path;

/// Columns checked for clip identity when the caller names none
pub const DEFAULT_CLIP_COLUMNS: [&str; 2] = [RAW, ANNOTATION];

/// Name of the directory immediately containing `path`, or an empty string
/// when the path has no parent directory
pub fn clip_identity(path: &str) -> String {
    Path::new(path)
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Clip identity of a path written with either separator convention
fn normalized_clip_identity(path: &str) -> Result<String> {
    Ok(clip_identity(&normalize(path)?))
}

/// Per-row clip identity, `None` where the checked columns disagree or a
/// checked path is null. Paths mixing separators are a `Format` error.
pub fn confirm_clips(manifest: &Manifest, columns: Option<&[&str]>) -> Result<Vec<Option<String>>> {
    let columns = checked_columns(manifest, columns)?;
    let values = columns
        .iter()
        .map(|column| manifest.require_column(column))
        .collect::<Result<Vec<_>>>()?;

    (0..manifest.len())
        .map(|row| -> Result<Option<String>> {
            let mut identities = values
                .iter()
                .map(|column| column[row].as_deref().map(normalized_clip_identity).transpose())
                .collect::<Result<Vec<_>>>()?
                .into_iter();
            let first = identities.next().flatten();
            Ok(first.filter(|first| identities.all(|other| other.as_deref() == Some(first.as_str()))))
        })
        .collect()
}

/// Per-row clip identity, failing on the first row whose columns disagree
pub fn clip_identities(manifest: &Manifest, columns: Option<&[&str]>) -> Result<Vec<String>> {
    let clips = confirm_clips(manifest, columns)?;

    if let Some(row) = clips.iter().position(Option::is_none) {
        let columns = checked_columns(manifest, columns)?;
        let identities = columns
            .iter()
            .map(|column| {
                manifest
                    .get(column, row)
                    .and_then(|path| normalized_clip_identity(path).ok())
            })
            .collect();
        return Err(ContestError::InconsistentClip { row, identities });
    }

    Ok(clips.into_iter().flatten().collect())
}

fn checked_columns<'a>(manifest: &Manifest, columns: Option<&[&'a str]>) -> Result<Vec<&'a str>> {
    match columns {
        Some(columns) => Ok(columns.to_vec()),
        None => {
            let present: Vec<&'a str> = DEFAULT_CLIP_COLUMNS
                .into_iter()
                .filter(|column| manifest.has_column(column))
                .collect();
            // A manifest without rows has no clips to check
            if present.is_empty() && !manifest.is_empty() {
                return Err(ContestError::MissingColumn {
                    column: RAW.to_string(),
                });
            }
            Ok(present)
        }
    }
}
