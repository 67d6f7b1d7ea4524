//! Per-attribute configuration for source and derived asset handling.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::models::ProfileParams;

/// Configuration for one managed upload attribute.
///
/// Templates use `[[token]]` placeholders; recognized tokens are `pk`,
/// `extension`, `profile` (derived templates only) and anything the caller
/// adds to [`SourceAsset::tokens`](crate::SourceAsset). Path templates may
/// start with an alias from [`aliases`](Self::aliases), expanded before
/// placeholder substitution.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AttributeConfig {
    /// Name of the managed attribute.
    pub attribute: String,
    /// File-system path template for the original upload.
    pub source_path: String,
    /// Public URL template for the original upload.
    pub source_url: String,
    /// File-system path template for derived variants.
    pub derived_path: String,
    /// Public URL template for derived variants.
    pub derived_url: String,
    /// Profile name to transform parameters, iterated in name order.
    pub profiles: BTreeMap<String, ProfileParams>,
    /// Encoding quality for derived variants, 0-100.
    pub quality: u8,
    /// Generate every derived variant immediately after the source is saved.
    pub generate_on_save: bool,
    /// Generate a derived variant the first time its URL is requested.
    pub generate_on_request: bool,
    /// Prefix aliases expanded at the start of templates (e.g. `@webroot`).
    pub aliases: BTreeMap<String, String>,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            attribute: "image".into(),
            source_path: "@webroot/images/[[pk]].[[extension]]".into(),
            source_url: "/images/[[pk]].[[extension]]".into(),
            derived_path: "@webroot/images/[[profile]]_[[pk]].[[extension]]".into(),
            derived_url: "/images/[[profile]]_[[pk]].[[extension]]".into(),
            profiles: BTreeMap::new(),
            quality: 60,
            generate_on_save: true,
            generate_on_request: false,
            aliases: BTreeMap::new(),
        }
    }
}

impl AttributeConfig {
    /// Read configuration from a JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Option<&ProfileParams> {
        self.profiles.get(name)
    }
}
