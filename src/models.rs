//! Data structures describing source assets and derived-variant profiles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named configuration for one derived-asset variant.
///
/// `width` and `height` drive the built-in thumbnail transform; any further
/// keys are carried through to the transform capability untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileParams {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Transform-specific pass-through options.
    #[serde(flatten)]
    pub options: BTreeMap<String, serde_json::Value>,
}

impl ProfileParams {
    /// Profile with the given bounding box and no extra options.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            options: BTreeMap::new(),
        }
    }
}

/// Identity of an uploaded original tied to an owning record.
///
/// Everything the path templates can reference lives here: the owning
/// record's primary key, the stored file extension, and any extra tokens the
/// caller wants available during resolution.
#[derive(Debug, Clone)]
pub struct SourceAsset {
    /// Owning record's primary key, stringified.
    pub pk: String,
    /// Stored file extension, without a leading dot.
    pub extension: String,
    /// Additional template tokens supplied by the caller.
    pub tokens: BTreeMap<String, String>,
}

impl SourceAsset {
    /// Source asset for the given primary key and extension.
    pub fn new(pk: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            extension: extension.into(),
            tokens: BTreeMap::new(),
        }
    }

    /// Attach an extra template token to the asset.
    pub fn with_token(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tokens.insert(name.into(), value.into());
        self
    }
}
