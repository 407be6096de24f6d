use super::{ArtifactStore, Metadata};
use crate::error::{ContestError, Result};
use crate::manifest::{Manifest, MANIFEST_FILE};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory that stored blobs are copied into, inside an artifact
pub const BLOB_DIR: &str = "outputs";
pub const METADATA_FILE: &str = "metadata.json";

/// Artifacts kept as directories under a root: `<root>/<name>/paths.json`
#[derive(Clone, Debug)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Metadata stored alongside an artifact, empty if none was written
    pub fn metadata(&self, name: &str) -> Result<Metadata> {
        match fs::read(self.dir_for(name).join(METADATA_FILE)) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Metadata::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn dir_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl ArtifactStore for LocalArtifactStore {
    fn fetch_manifest(&self, name: &str) -> Result<Vec<u8>> {
        match fs::read(self.dir_for(name).join(MANIFEST_FILE)) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(ContestError::MissingManifest {
                name: name.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn artifact_dir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.dir_for(name);
        if !dir.is_dir() {
            return Err(std::io::Error::new(
                ErrorKind::NotFound,
                format!("artifact {name:?} not found under {}", self.root.display()),
            )
            .into());
        }
        Ok(dir)
    }

    fn store(
        &self,
        name: &str,
        blob_dir: &Path,
        manifest: &Manifest,
        metadata: &Metadata,
    ) -> Result<PathBuf> {
        let dir = self.dir_for(name);
        tracing::info!("Storing artifact {} at {}", name, dir.display());

        fs::create_dir_all(&dir)?;
        let copied = copy_tree(blob_dir, &dir.join(BLOB_DIR))?;
        manifest.write(dir.join(MANIFEST_FILE))?;
        fs::write(dir.join(METADATA_FILE), serde_json::to_vec_pretty(metadata)?)?;

        tracing::info!("Artifact {} stored: {} files, {} manifest rows", name, copied, manifest.len());
        Ok(dir)
    }
}

fn copy_tree(from: &Path, to: &Path) -> Result<usize> {
    fs::create_dir_all(to)?;
    let mut copied = 0;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
