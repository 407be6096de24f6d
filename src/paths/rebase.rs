use crate::manifest::Manifest;
use std::path::{Path, PathBuf};

/// Prefix paths with a base directory without touching the original.
///
/// Single paths rebase to a `PathBuf`; manifests rebase element-wise across
/// every column, leaving null entries null.
pub trait Rebase {
    type Output;

    fn rebase(&self, base_dir: &Path) -> Self::Output;
}

impl Rebase for Path {
    type Output = PathBuf;

    fn rebase(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(self)
    }
}

impl Rebase for str {
    type Output = PathBuf;

    fn rebase(&self, base_dir: &Path) -> PathBuf {
        Path::new(self).rebase(base_dir)
    }
}

impl Rebase for Manifest {
    type Output = Manifest;

    fn rebase(&self, base_dir: &Path) -> Manifest {
        self.map_paths(|path| path.rebase(base_dir).to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ANNOTATION, OUTPUT, RAW};

    #[test]
    fn test_rebase_single_path() {
        let base = Path::new("artifacts").join("davis:v1");
        assert_eq!("bear/00000.jpg".rebase(&base), base.join("bear/00000.jpg"));
    }

    #[test]
    fn test_rebase_manifest_elementwise() {
        let mut manifest =
            Manifest::from_paths(vec![(RAW, vec!["a/0.jpg"]), (ANNOTATION, vec!["a/0.png"])]).unwrap();
        manifest.insert_column(OUTPUT, vec![None]).unwrap();

        let rebased = manifest.rebase(Path::new("root"));
        let expected = Path::new("root").join("a/0.png");
        assert_eq!(
            rebased.get(ANNOTATION, 0).map(str::to_string),
            Some(expected.to_string_lossy().into_owned())
        );
        assert_eq!(rebased.get(OUTPUT, 0), None);
        assert_eq!(manifest.get(RAW, 0), Some("a/0.jpg"));
    }
}
