use crate::artifact::{ArtifactStore, Metadata};
use crate::error::Result;
use crate::manifest::Manifest;
use std::path::{Path, PathBuf};

/// Metadata keys describing model cost; results lacking them may be rejected
pub const REQUIRED_METADATA_KEYS: [&str; 2] = ["nflops", "nparams"];

/// Name of the submission derived from a versioned result name.
///
/// `"my-result:v3"` becomes `"my-result-submission"`, and with suffix `"final"`
/// `"my-result-submission-final"`.
pub fn name_submission(result_name: &str, suffix: &str) -> String {
    let base = match result_name.rsplit_once(':') {
        Some((name, _version)) => name.replace(':', ""),
        None => String::new(),
    };
    let mut name = format!("{base}-submission");
    if !suffix.is_empty() {
        name.push('-');
        name.push_str(suffix);
    }
    name
}

/// Warn about missing cost metadata and return the keys that are absent
pub fn check_result_metadata(metadata: &Metadata) -> Vec<&'static str> {
    let missing: Vec<&'static str> = REQUIRED_METADATA_KEYS
        .into_iter()
        .filter(|key| !metadata.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        tracing::warn!(
            "Result metadata does not contain all required keys {:?} (missing {:?}); \
             submissions without this metadata may be rejected",
            REQUIRED_METADATA_KEYS,
            missing
        );
    }
    missing
}

/// Package predicted masks and their manifest as a result artifact
pub fn make_result_artifact<S>(
    store: &S,
    name: &str,
    output_dir: &Path,
    output_paths: &Manifest,
    metadata: &Metadata,
) -> Result<PathBuf>
where
    S: ArtifactStore + ?Sized,
{
    check_result_metadata(metadata);
    store.store(name, output_dir, output_paths, metadata)
}
