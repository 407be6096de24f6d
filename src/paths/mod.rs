//! Path normalization and rebasing for manifests that move between
//! storage backends and operating systems.

mod rebase;

pub use rebase::Rebase;

use crate::error::{ContestError, Result};
use crate::manifest::Manifest;
use std::path::{Path, MAIN_SEPARATOR_STR};

/// Render `path` with the native separator.
///
/// A path written with only `\` or only `/` is unambiguous and is rewritten;
/// one mixing both is rejected since its components cannot be recovered.
pub fn normalize(path: &str) -> Result<String> {
    if path.contains('\\') && path.contains('/') {
        return Err(ContestError::Format {
            path: path.to_string(),
        });
    }
    Ok(path.replace('\\', "/").replace('/', MAIN_SEPARATOR_STR))
}

/// Normalize then rebase every present path column onto `base_dir`.
///
/// Columns listed in `path_columns` but missing from the manifest are
/// skipped, so unlabeled manifests resolve without an `annotation` column.
pub fn resolve_manifest<P: AsRef<Path>>(
    raw: &Manifest,
    base_dir: P,
    path_columns: &[&str],
) -> Result<Manifest> {
    let base_dir = base_dir.as_ref();
    let mut resolved = raw.clone();
    for column in path_columns {
        let mapped = resolved.try_map_column(column, |value| {
            let normalized = normalize(value)?;
            Ok(normalized.as_str().rebase(base_dir).to_string_lossy().into_owned())
        })?;
        match mapped {
            Some(manifest) => resolved = manifest,
            None => tracing::debug!("Column {} not in manifest, skipping", column),
        }
    }
    Ok(resolved)
}
