use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::AttributeConfig;
use crate::error::{AssetError, AssetResult};
use crate::models::{ProfileParams, SourceAsset};
use crate::transform::AssetTransform;

use super::{asset_context, resolve_with};

/// Materializes and removes per-profile derived variants of a source asset.
///
/// Generation is idempotent per `(asset, profile, extension)` key: an
/// existing derived file short-circuits the transform until it is removed.
/// Concurrent first requests for the same absent key are serialized through
/// a per-path lock, and output is staged through a temporary file and
/// renamed into place, so a partially written file is never visible at the
/// derived path.
pub struct DerivedAssetManager {
    config: Arc<AttributeConfig>,
    transform: Option<Arc<dyn AssetTransform>>,
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl DerivedAssetManager {
    /// Manager for the given configuration and optional transform capability.
    ///
    /// Passing `None` for the transform is valid as long as no generation is
    /// ever triggered; the first attempt then fails with
    /// [`AssetError::TransformUnavailable`].
    pub fn new(config: Arc<AttributeConfig>, transform: Option<Arc<dyn AssetTransform>>) -> Self {
        Self {
            config,
            transform,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// File-system path of the derived variant. Pure resolution, accepts any
    /// profile string and triggers no generation.
    pub fn path(&self, asset: &SourceAsset, profile: &str, extension: Option<&str>) -> PathBuf {
        let context = asset_context(asset, extension).with_profile(profile);
        PathBuf::from(resolve_with(&self.config, &self.config.derived_path, &context))
    }

    /// Public URL of the derived variant. Pure resolution.
    pub fn url(&self, asset: &SourceAsset, profile: &str, extension: Option<&str>) -> String {
        let context = asset_context(asset, extension).with_profile(profile);
        resolve_with(&self.config, &self.config.derived_url, &context)
    }

    /// Ensure the derived variant for `profile` exists on disk.
    ///
    /// Returns the derived path, or `Ok(None)` when the source file is
    /// absent (nothing to derive, not an error). An existing derived file is
    /// returned as-is without invoking the transform.
    pub fn ensure_derived(
        &self,
        asset: &SourceAsset,
        profile: &str,
        extension: Option<&str>,
    ) -> AssetResult<Option<PathBuf>> {
        let params = self
            .config
            .profile(profile)
            .ok_or_else(|| AssetError::UnknownProfile {
                name: profile.to_string(),
            })?;

        let source_context = asset_context(asset, None);
        let source_path = PathBuf::from(resolve_with(
            &self.config,
            &self.config.source_path,
            &source_context,
        ));
        if !source_path.is_file() {
            return Ok(None);
        }

        let dest = self.path(asset, profile, extension);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| AssetError::DirectoryCreation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        if dest.is_file() {
            tracing::debug!(path = %dest.display(), profile, "derived asset already present");
            return Ok(Some(dest));
        }

        let lock = self.lock_for(&dest);
        let generated = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.generate(&source_path, params, &dest)
        };
        drop(lock);
        self.release_lock(&dest);
        generated?;

        Ok(Some(dest))
    }

    /// Ensure every configured profile's variant exists, in profile-name
    /// order. The first failure halts the remaining profiles.
    pub fn ensure_all_derived(
        &self,
        asset: &SourceAsset,
        extension: Option<&str>,
    ) -> AssetResult<()> {
        for profile in self.config.profiles.keys() {
            self.ensure_derived(asset, profile, extension)?;
        }
        Ok(())
    }

    /// Remove every configured profile's variant, best-effort. Missing files
    /// and removal failures are absorbed so that deleting a record can never
    /// fail on stale derived-file bookkeeping.
    pub fn cleanup_derived(&self, asset: &SourceAsset) {
        self.cleanup_with_extension(asset, None);
    }

    /// Remove every configured profile's variant materialized under an
    /// overridden extension. Best-effort like [`cleanup_derived`](Self::cleanup_derived).
    pub fn cleanup_derived_with_extension(&self, asset: &SourceAsset, extension: &str) {
        self.cleanup_with_extension(asset, Some(extension));
    }

    fn cleanup_with_extension(&self, asset: &SourceAsset, extension: Option<&str>) {
        for profile in self.config.profiles.keys() {
            let path = self.path(asset, profile, extension);
            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), profile, "removed derived asset");
                }
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), profile, error = %err, "failed to remove derived asset");
                }
            }
        }
    }

    /// Run the transform and publish the result at `dest`. Callers must hold
    /// the per-path lock for `dest`.
    fn generate(
        &self,
        source_path: &Path,
        params: &ProfileParams,
        dest: &Path,
    ) -> AssetResult<()> {
        // Another caller may have finished while we waited for the lock.
        if dest.is_file() {
            return Ok(());
        }

        let transform = self
            .transform
            .as_deref()
            .ok_or(AssetError::TransformUnavailable)?;

        let bytes = transform
            .transform(source_path, params)
            .map_err(|source| AssetError::Transform {
                path: source_path.to_path_buf(),
                source,
            })?;

        // The staging file carries the destination's extension so that
        // extension-driven encoding decisions in `save` see the real target
        // format, not the staging name.
        let staging_dir = dest.parent().map(Path::to_path_buf).unwrap_or_default();
        let suffix = dest
            .extension()
            .and_then(OsStr::to_str)
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let staged = tempfile::Builder::new()
            .suffix(&suffix)
            .tempfile_in(&staging_dir)?;
        transform
            .save(&bytes, staged.path(), self.config.quality)
            .map_err(|source| AssetError::Transform {
                path: source_path.to_path_buf(),
                source,
            })?;
        staged.persist(dest).map_err(|err| AssetError::Io(err.error))?;

        tracing::debug!(path = %dest.display(), "generated derived asset");
        Ok(())
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(path.to_path_buf()).or_default().clone()
    }

    /// Drop the lock map entry for `path` once no other caller holds it,
    /// keeping the map from accumulating one entry per derived key the
    /// process has ever generated.
    fn release_lock(&self, path: &Path) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(path)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(path);
        }
    }

    #[cfg(test)]
    fn lock_count(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
