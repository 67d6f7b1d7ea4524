use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AttributeConfig;
use crate::error::AssetResult;
use crate::models::SourceAsset;
use crate::transform::AssetTransform;

use super::{DerivedAssetManager, SourceAssetManager};

/// Per-attribute facade over the source and derived asset managers.
///
/// Both managers share one configuration. The application is expected to
/// call [`on_source_saved`](Self::on_source_saved) and
/// [`on_source_deleted`](Self::on_source_deleted) at the matching record
/// lifecycle points; there is no event wiring inside the crate.
///
/// URL accessors take the asset as an `Option`: `None` means the record has
/// no value for the attribute, in which case the `empty_default` is returned
/// instead of a resolved URL.
pub struct AttributeAssets {
    config: Arc<AttributeConfig>,
    source: SourceAssetManager,
    derived: DerivedAssetManager,
}

impl AttributeAssets {
    /// Build the facade for a configuration and an optional transform
    /// capability.
    pub fn new(config: AttributeConfig, transform: Option<Arc<dyn AssetTransform>>) -> Self {
        let config = Arc::new(config);
        Self {
            source: SourceAssetManager::new(Arc::clone(&config)),
            derived: DerivedAssetManager::new(Arc::clone(&config), transform),
            config,
        }
    }

    /// The shared attribute configuration.
    pub fn config(&self) -> &AttributeConfig {
        &self.config
    }

    /// The composed source asset manager.
    pub fn source(&self) -> &SourceAssetManager {
        &self.source
    }

    /// The composed derived asset manager.
    pub fn derived(&self) -> &DerivedAssetManager {
        &self.derived
    }

    /// File-system path of the original upload.
    pub fn source_path(&self, asset: &SourceAsset, extension: Option<&str>) -> PathBuf {
        self.source.path(asset, extension)
    }

    /// URL of the original upload, or `empty_default` when no source is set.
    pub fn source_url(
        &self,
        asset: Option<&SourceAsset>,
        extension: Option<&str>,
        empty_default: Option<&str>,
    ) -> Option<String> {
        match asset {
            Some(asset) => Some(self.source.url(asset, extension)),
            None => empty_default.map(str::to_string),
        }
    }

    /// URL of a derived variant, or `empty_default` when no source is set.
    ///
    /// When the configuration enables `generate_on_request`, the variant is
    /// materialized before the URL is returned, so the URL never points at a
    /// missing file that a configured transform could have produced.
    pub fn derived_url(
        &self,
        asset: Option<&SourceAsset>,
        profile: &str,
        extension: Option<&str>,
        empty_default: Option<&str>,
    ) -> AssetResult<Option<String>> {
        let Some(asset) = asset else {
            return Ok(empty_default.map(str::to_string));
        };

        if self.config.generate_on_request {
            self.derived.ensure_derived(asset, profile, extension)?;
        }
        Ok(Some(self.derived.url(asset, profile, extension)))
    }

    /// File-system path of a derived variant. No generation is triggered.
    pub fn derived_path(
        &self,
        asset: &SourceAsset,
        profile: &str,
        extension: Option<&str>,
    ) -> PathBuf {
        self.derived.path(asset, profile, extension)
    }

    /// Lifecycle call: the source file for `asset` has just been persisted.
    ///
    /// Generates every configured variant when `generate_on_save` is
    /// enabled; a later lazy request then hits the already-exists fast path.
    pub fn on_source_saved(&self, asset: &SourceAsset) -> AssetResult<()> {
        if self.config.generate_on_save {
            self.derived.ensure_all_derived(asset, None)?;
        }
        Ok(())
    }

    /// Lifecycle call: the record (or the attribute value) was deleted.
    ///
    /// Cascades removal of every derived variant and the source file itself.
    /// Entirely best-effort; deleting a record never fails because of stale
    /// asset bookkeeping.
    pub fn on_source_deleted(&self, asset: &SourceAsset) {
        self.derived.cleanup_derived(asset);
        self.source.remove(asset);
    }
}
