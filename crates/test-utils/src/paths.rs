//! Filesystem locations used by tests.

use std::path::{Path, PathBuf};

/// The repository root (two levels above this crate).
pub fn workspace_root() -> PathBuf {
    let here = Path::new(env!("CARGO_MANIFEST_DIR"));
    here.ancestors().nth(2).unwrap_or(here).to_path_buf()
}

/// The Nicaragua region YAML that ships embedded in `sst-common`.
pub fn default_region_file() -> PathBuf {
    workspace_root().join("crates/sst-common/config/nicaragua.yaml")
}

/// Scratch directory removed on drop.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("sst-atlas-")
        .tempdir()
        .expect("create scratch directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_region_file_exists() {
        assert!(workspace_root().join("Cargo.toml").is_file());
        assert!(default_region_file().is_file());
    }

    #[test]
    fn test_scratch_dir_is_removed_on_drop() {
        let dir = temp_test_dir();
        let path = dir.path().to_path_buf();
        assert!(path.is_dir());
        drop(dir);
        assert!(!path.exists());
    }
}
