//! End-to-end lifecycle coverage: real image transforms, eager and lazy
//! generation, idempotence, and cascading cleanup.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tempfile::tempdir;

use derived_assets::{
    AssetTransform, AttributeAssets, AttributeConfig, ImageThumbnailer, ProfileParams, SourceAsset,
    TransformError,
};

fn config(root: &Path) -> AttributeConfig {
    let mut config = AttributeConfig::default();
    config
        .aliases
        .insert("@webroot".into(), root.to_string_lossy().into_owned());
    config
        .profiles
        .insert("thumb".into(), ProfileParams::new(16, 16));
    config
        .profiles
        .insert("preview".into(), ProfileParams::new(64, 64));
    config
}

fn write_source_image(root: &Path, asset: &SourceAsset, width: u32, height: u32) -> Result<()> {
    let path = root.join(format!("images/{}.{}", asset.pk, asset.extension));
    fs::create_dir_all(path.parent().expect("source path has a parent"))?;
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 100, 50, 255]));
    image.save(&path)?;
    Ok(())
}

#[test]
fn eager_save_generates_scaled_variants_for_every_profile() -> Result<()> {
    let temp = tempdir()?;
    let assets = AttributeAssets::new(config(temp.path()), Some(Arc::new(ImageThumbnailer::new())));
    let photo = SourceAsset::new("42", "png");
    write_source_image(temp.path(), &photo, 128, 64)?;

    assets.on_source_saved(&photo)?;

    let thumb = image::open(temp.path().join("images/thumb_42.png"))?;
    assert_eq!((thumb.width(), thumb.height()), (16, 8));

    let preview = image::open(temp.path().join("images/preview_42.png"))?;
    assert_eq!((preview.width(), preview.height()), (64, 32));
    Ok(())
}

#[test]
fn lazy_request_materializes_then_hits_the_fast_path() -> Result<()> {
    struct Counting {
        inner: ImageThumbnailer,
        calls: AtomicUsize,
    }
    impl AssetTransform for Counting {
        fn transform(
            &self,
            source: &Path,
            params: &ProfileParams,
        ) -> std::result::Result<Vec<u8>, TransformError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.transform(source, params)
        }
        fn save(
            &self,
            bytes: &[u8],
            dest: &Path,
            quality: u8,
        ) -> std::result::Result<(), TransformError> {
            self.inner.save(bytes, dest, quality)
        }
    }

    let temp = tempdir()?;
    let mut config = config(temp.path());
    config.generate_on_save = false;
    config.generate_on_request = true;

    let transform = Arc::new(Counting {
        inner: ImageThumbnailer::new(),
        calls: AtomicUsize::new(0),
    });
    let assets = AttributeAssets::new(config, Some(transform.clone()));
    let photo = SourceAsset::new("7", "png");
    write_source_image(temp.path(), &photo, 64, 64)?;

    // Save does nothing; the first URL request generates, the second reuses.
    assets.on_source_saved(&photo)?;
    assert!(!temp.path().join("images/thumb_7.png").exists());

    let url = assets.derived_url(Some(&photo), "thumb", None, None)?;
    assert_eq!(url.as_deref(), Some("/images/thumb_7.png"));
    assert!(temp.path().join("images/thumb_7.png").is_file());
    assert_eq!(transform.calls.load(Ordering::SeqCst), 1);

    assets.derived_url(Some(&photo), "thumb", None, None)?;
    assert_eq!(transform.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn eager_generation_makes_the_lazy_check_a_no_op() -> Result<()> {
    let temp = tempdir()?;
    let mut config = config(temp.path());
    config.generate_on_request = true;

    let assets = AttributeAssets::new(config, Some(Arc::new(ImageThumbnailer::new())));
    let photo = SourceAsset::new("9", "png");
    write_source_image(temp.path(), &photo, 32, 32)?;

    assets.on_source_saved(&photo)?;
    let before = fs::metadata(temp.path().join("images/thumb_9.png"))?.modified()?;

    assets.derived_url(Some(&photo), "thumb", None, None)?;
    let after = fs::metadata(temp.path().join("images/thumb_9.png"))?.modified()?;
    assert_eq!(before, after);
    Ok(())
}

#[test]
fn extension_override_reencodes_to_the_requested_format() -> Result<()> {
    let temp = tempdir()?;
    let mut config = config(temp.path());
    config.generate_on_request = true;

    let assets = AttributeAssets::new(config, Some(Arc::new(ImageThumbnailer::new())));
    let photo = SourceAsset::new("11", "png");
    write_source_image(temp.path(), &photo, 48, 48)?;

    let url = assets.derived_url(Some(&photo), "thumb", Some("jpg"), None)?;
    assert_eq!(url.as_deref(), Some("/images/thumb_11.jpg"));

    let derived = temp.path().join("images/thumb_11.jpg");
    assert!(derived.is_file());

    // The file must actually contain JPEG data, not just carry the
    // extension: the encoder has to see the final format while staging.
    let bytes = fs::read(&derived)?;
    assert!(
        bytes.starts_with(&[0xFF, 0xD8]),
        "derived .jpg must start with the JPEG magic, got {:02X?}",
        &bytes[..bytes.len().min(4)]
    );
    image::open(&derived)?;
    Ok(())
}

#[test]
fn deleting_the_record_removes_source_and_every_variant() -> Result<()> {
    let temp = tempdir()?;
    let assets = AttributeAssets::new(config(temp.path()), Some(Arc::new(ImageThumbnailer::new())));
    let photo = SourceAsset::new("5", "png");
    write_source_image(temp.path(), &photo, 32, 32)?;
    assets.on_source_saved(&photo)?;

    // Remove one variant out-of-band first; cleanup must still finish.
    fs::remove_file(temp.path().join("images/thumb_5.png"))?;

    assets.on_source_deleted(&photo);
    assert!(!temp.path().join("images/5.png").exists());
    assert!(!temp.path().join("images/preview_5.png").exists());
    assert!(!temp.path().join("images/thumb_5.png").exists());
    Ok(())
}

#[test]
fn extra_tokens_flow_through_both_template_families() -> Result<()> {
    let temp = tempdir()?;
    let mut config = AttributeConfig {
        source_path: "@webroot/[[owner]]/[[pk]].[[extension]]".into(),
        source_url: "/media/[[owner]]/[[pk]].[[extension]]".into(),
        derived_path: "@webroot/[[owner]]/[[profile]]/[[pk]].[[extension]]".into(),
        derived_url: "/media/[[owner]]/[[profile]]/[[pk]].[[extension]]".into(),
        generate_on_request: true,
        profiles: BTreeMap::new(),
        ..AttributeConfig::default()
    };
    config
        .aliases
        .insert("@webroot".into(), temp.path().to_string_lossy().into_owned());
    config
        .profiles
        .insert("thumb".into(), ProfileParams::new(8, 8));

    let assets = AttributeAssets::new(config, Some(Arc::new(ImageThumbnailer::new())));
    let photo = SourceAsset::new("3", "png").with_token("owner", "gallery");

    let source = temp.path().join("gallery/3.png");
    fs::create_dir_all(source.parent().expect("parent"))?;
    image::RgbaImage::from_pixel(24, 24, image::Rgba([0, 0, 0, 255])).save(&source)?;

    assert_eq!(
        assets.source_url(Some(&photo), None, None).as_deref(),
        Some("/media/gallery/3.png")
    );

    let url = assets.derived_url(Some(&photo), "thumb", None, None)?;
    assert_eq!(url.as_deref(), Some("/media/gallery/thumb/3.png"));
    assert!(temp.path().join("gallery/thumb/3.png").is_file());
    Ok(())
}
