#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod template;
pub mod transform;

pub use config::AttributeConfig;
pub use error::{AssetError, AssetResult};
pub use manager::{AttributeAssets, DerivedAssetManager, SourceAssetManager};
pub use models::{ProfileParams, SourceAsset};
pub use template::{expand_aliases, resolve_template, TemplateContext};
pub use transform::{AssetTransform, ImageThumbnailer, TransformError};
