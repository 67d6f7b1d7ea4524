//! Source and derived asset managers and the per-attribute facade.
//!
//! The split keeps the responsibilities narrow: [`SourceAssetManager`] only
//! knows where the original upload lives, [`DerivedAssetManager`] owns the
//! materialization and cleanup of per-profile variants, and
//! [`AttributeAssets`] composes the two around one shared configuration and
//! exposes the URL accessors plus the record lifecycle calls.

mod attribute;
mod derived;
mod source;

pub use attribute::AttributeAssets;
pub use derived::DerivedAssetManager;
pub use source::SourceAssetManager;

use crate::config::AttributeConfig;
use crate::models::SourceAsset;
use crate::template::{expand_aliases, resolve_template, TemplateContext};

/// Expand aliases and substitute placeholders in one pass over a template.
pub(crate) fn resolve_with(
    config: &AttributeConfig,
    template: &str,
    context: &TemplateContext,
) -> String {
    let expanded = expand_aliases(template, &config.aliases);
    resolve_template(&expanded, context)
}

/// Template context for an asset: `pk`, `extension` (honoring an override)
/// and every caller-supplied token.
pub(crate) fn asset_context(
    asset: &SourceAsset,
    extension_override: Option<&str>,
) -> TemplateContext {
    let extension = extension_override.unwrap_or(&asset.extension);
    let mut context = TemplateContext::new()
        .with_pk(asset.pk.as_str())
        .with_extension(extension);
    for (name, value) in &asset.tokens {
        context = context.with_token(name.as_str(), value.as_str());
    }
    context
}
