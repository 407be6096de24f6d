mod local;

pub use local::LocalArtifactStore;

use crate::error::Result;
use crate::manifest::Manifest;
use crate::paths::Rebase;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Free-form artifact metadata, e.g. compute cost of the model behind a result
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Trait for artifact storage backends
/// Every dataset or result artifact carries a top-level `paths.json`
pub trait ArtifactStore {
    /// Raw bytes of the artifact's manifest
    fn fetch_manifest(&self, name: &str) -> Result<Vec<u8>>;

    /// Local directory holding the artifact's files; manifest paths are
    /// relative to it
    fn artifact_dir(&self, name: &str) -> Result<PathBuf>;

    /// Store the files under `blob_dir` together with a manifest and metadata
    ///
    /// Returns the artifact directory
    fn store(
        &self,
        name: &str,
        blob_dir: &Path,
        manifest: &Manifest,
        metadata: &Metadata,
    ) -> Result<PathBuf>;
}

/// Manifest of an artifact with every path rebased onto its directory
pub fn artifact_paths<S>(store: &S, name: &str) -> Result<Manifest>
where
    S: ArtifactStore + ?Sized,
{
    let manifest = Manifest::from_json_slice(&store.fetch_manifest(name)?)?;
    let dir = store.artifact_dir(name)?;
    tracing::debug!("Artifact {} has {} rows at {}", name, manifest.len(), dir.display());
    Ok(manifest.rebase(&dir))
}

/// One column of [`artifact_paths`]
pub fn artifact_column<S>(store: &S, name: &str, column: &str) -> Result<Vec<Option<String>>>
where
    S: ArtifactStore + ?Sized,
{
    Ok(artifact_paths(store, name)?.require_column(column)?.to_vec())
}
