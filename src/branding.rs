//! Branding asset staging
//!
//! The control panel lets the presenter point at logo image files anywhere
//! on disk. Instead of referencing those files in place, `AssetStore` copies
//! each selection into a managed assets directory and hands back a
//! `BrandingAsset` whose `file://` URI targets the staged copy. Replacing or
//! removing a slot revokes the staged copy, and a startup sweep clears
//! leftovers from earlier runs, so staged files never accumulate.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use crate::config::assets_dir;
use crate::timer::BrandingAsset;

/// Stages branding files and revokes staged copies
#[derive(Debug)]
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    /// Create a store over the configured assets directory
    pub fn new() -> Self {
        Self { dir: assets_dir() }
    }

    /// Copy a selected file into the managed directory
    ///
    /// The staged name is a fresh UUID with the source's extension so
    /// repeated selections of the same file never collide.
    pub fn stage(&self, source: &Path) -> Result<BrandingAsset> {
        if !source.is_file() {
            bail!("{} is not a file", source.display());
        }

        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "logo".to_string());

        let mut staged_name = Uuid::new_v4().to_string();
        if let Some(ext) = source.extension() {
            staged_name.push('.');
            staged_name.push_str(&ext.to_string_lossy());
        }

        let staged_path = self.dir.join(&staged_name);
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        std::fs::copy(source, &staged_path)
            .with_context(|| format!("Failed to stage {}", source.display()))?;

        tracing::info!("Staged {} as {}", source.display(), staged_path.display());
        Ok(BrandingAsset {
            uri: path_to_file_uri(&staged_path),
            name,
        })
    }

    /// Delete the staged copy behind an asset
    ///
    /// Only files inside the managed directory are touched; an asset whose
    /// URI points elsewhere is left alone. Failures are logged, not raised,
    /// because revocation runs on non-fatal paths (slot replacement).
    pub fn revoke(&self, asset: &BrandingAsset) {
        let Some(path) = file_uri_to_path(&asset.uri) else {
            tracing::warn!("Cannot revoke malformed asset URI: {}", asset.uri);
            return;
        };
        if !path.starts_with(&self.dir) {
            tracing::warn!("Refusing to revoke file outside assets dir: {}", path.display());
            return;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!("Revoked staged asset {}", path.display()),
            Err(e) => tracing::warn!("Failed to revoke {}: {}", path.display(), e),
        }
    }

    /// Remove every staged file, returning how many were deleted
    ///
    /// Run at startup: timer state is not persisted, so staged copies from
    /// previous runs are unreachable.
    pub fn sweep(&self) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read {}", self.dir.display()))?;

        let mut removed = 0;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_file() {
                match std::fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    Err(e) => tracing::warn!("Failed to sweep {}: {}", path.display(), e),
                }
            }
        }
        Ok(removed)
    }
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a `file://` URI for an absolute path
pub fn path_to_file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Resolve a `file://` URI back to a path
///
/// Returns `None` for anything that is not a well-formed absolute file URI.
pub fn file_uri_to_path(uri: &str) -> Option<PathBuf> {
    let rest = uri.strip_prefix("file://")?;
    if !rest.starts_with('/') {
        return None;
    }
    Some(PathBuf::from(rest))
}

/// Whether an asset URI can actually be rendered
///
/// True only for a well-formed `file://` URI whose target exists. The
/// display renders nothing for a slot that fails this check.
pub fn is_dereferenceable(uri: &str) -> bool {
    match file_uri_to_path(uri) {
        Some(path) => path.is_file(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(temp_dir: &TempDir) -> AssetStore {
        AssetStore {
            dir: temp_dir.path().join("assets"),
        }
    }

    fn source_file(temp_dir: &TempDir, name: &str) -> PathBuf {
        let path = temp_dir.path().join(name);
        std::fs::write(&path, b"png bytes").unwrap();
        path
    }

    #[test]
    fn test_stage_copies_and_keeps_extension() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let source = source_file(&temp, "logo.png");

        let asset = store.stage(&source).unwrap();
        assert_eq!(asset.name, "logo.png");

        let staged = file_uri_to_path(&asset.uri).unwrap();
        assert!(staged.starts_with(temp.path().join("assets")));
        assert_eq!(staged.extension().unwrap(), "png");
        assert!(staged.is_file());
        // Source untouched
        assert!(source.is_file());
    }

    #[test]
    fn test_stage_rejects_missing_file() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        assert!(store.stage(&temp.path().join("nope.png")).is_err());
    }

    #[test]
    fn test_stage_rejects_directory() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        assert!(store.stage(temp.path()).is_err());
    }

    #[test]
    fn test_revoke_deletes_staged_copy() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let asset = store.stage(&source_file(&temp, "logo.png")).unwrap();

        let staged = file_uri_to_path(&asset.uri).unwrap();
        store.revoke(&asset);
        assert!(!staged.exists());

        // Revoking again is harmless
        store.revoke(&asset);
    }

    #[test]
    fn test_revoke_ignores_files_outside_the_store() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let outside = source_file(&temp, "precious.png");

        let asset = BrandingAsset {
            uri: path_to_file_uri(&outside),
            name: "precious.png".to_string(),
        };
        store.revoke(&asset);
        assert!(outside.is_file());
    }

    #[test]
    fn test_sweep_clears_all_staged_files() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        store.stage(&source_file(&temp, "a.png")).unwrap();
        store.stage(&source_file(&temp, "b.jpg")).unwrap();

        assert_eq!(store.sweep().unwrap(), 2);
        assert_eq!(store.sweep().unwrap(), 0);
    }

    #[test]
    fn test_sweep_on_missing_dir() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        assert_eq!(store.sweep().unwrap(), 0);
    }

    #[test]
    fn test_file_uri_round_trip() {
        let path = PathBuf::from("/tmp/some dir/logo.png");
        let uri = path_to_file_uri(&path);
        assert_eq!(file_uri_to_path(&uri), Some(path));
    }

    #[test]
    fn test_file_uri_rejects_malformed() {
        assert_eq!(file_uri_to_path("http://host/x.png"), None);
        assert_eq!(file_uri_to_path("file://relative/x.png"), None);
        assert_eq!(file_uri_to_path("not a uri"), None);
        assert_eq!(file_uri_to_path(""), None);
    }

    #[test]
    fn test_is_dereferenceable() {
        let temp = TempDir::new().unwrap();
        let real = source_file(&temp, "logo.png");

        assert!(is_dereferenceable(&path_to_file_uri(&real)));
        assert!(!is_dereferenceable("file:///definitely/not/here.png"));
        assert!(!is_dereferenceable("http://host/logo.png"));
    }
}
