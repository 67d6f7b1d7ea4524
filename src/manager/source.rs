use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AttributeConfig;
use crate::models::SourceAsset;

use super::{asset_context, resolve_with};

/// Resolves the location of original uploads and removes them on delete.
#[derive(Debug, Clone)]
pub struct SourceAssetManager {
    config: Arc<AttributeConfig>,
}

impl SourceAssetManager {
    /// Manager for the given attribute configuration.
    pub fn new(config: Arc<AttributeConfig>) -> Self {
        Self { config }
    }

    /// File-system path of the original upload.
    pub fn path(&self, asset: &SourceAsset, extension: Option<&str>) -> PathBuf {
        let context = asset_context(asset, extension);
        PathBuf::from(resolve_with(&self.config, &self.config.source_path, &context))
    }

    /// Public URL of the original upload.
    pub fn url(&self, asset: &SourceAsset, extension: Option<&str>) -> String {
        let context = asset_context(asset, extension);
        resolve_with(&self.config, &self.config.source_url, &context)
    }

    /// Whether the original upload is present on disk.
    pub fn exists(&self, asset: &SourceAsset) -> bool {
        self.path(asset, None).is_file()
    }

    /// Remove the original upload, best-effort. A missing file is the
    /// expected steady state after cleanup and is not reported.
    pub fn remove(&self, asset: &SourceAsset) {
        let path = self.path(asset, None);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed source asset");
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to remove source asset");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(root: &std::path::Path) -> Arc<AttributeConfig> {
        let mut config = AttributeConfig::default();
        config
            .aliases
            .insert("@webroot".into(), root.to_string_lossy().into_owned());
        Arc::new(config)
    }

    #[test]
    fn resolves_path_from_template_and_alias() {
        let temp = tempdir().unwrap();
        let manager = SourceAssetManager::new(config(temp.path()));
        let asset = SourceAsset::new("42", "jpg");

        let path = manager.path(&asset, None);
        assert_eq!(path, temp.path().join("images/42.jpg"));
        assert_eq!(manager.url(&asset, None), "/images/42.jpg");
    }

    #[test]
    fn extension_override_applies_to_path_and_url() {
        let temp = tempdir().unwrap();
        let manager = SourceAssetManager::new(config(temp.path()));
        let asset = SourceAsset::new("42", "jpg");

        assert_eq!(manager.url(&asset, Some("webp")), "/images/42.webp");
        assert!(manager.path(&asset, Some("webp")).to_string_lossy().ends_with("42.webp"));
    }

    #[test]
    fn remove_is_silent_when_file_is_absent() {
        let temp = tempdir().unwrap();
        let manager = SourceAssetManager::new(config(temp.path()));
        let asset = SourceAsset::new("42", "jpg");

        assert!(!manager.exists(&asset));
        manager.remove(&asset);
    }

    #[test]
    fn remove_deletes_an_existing_source() {
        let temp = tempdir().unwrap();
        let manager = SourceAssetManager::new(config(temp.path()));
        let asset = SourceAsset::new("42", "jpg");

        let path = manager.path(&asset, None);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"data").unwrap();
        assert!(manager.exists(&asset));

        manager.remove(&asset);
        assert!(!path.exists());
    }
}
