use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use super::{AssetTransform, TransformError};
use crate::models::ProfileParams;

/// Built-in transform that downscales images with the `image` crate.
///
/// The derived variant preserves the source aspect ratio and fits inside the
/// profile's `width`/`height` bounding box. The intermediate produced by
/// [`AssetTransform::transform`] is lossless PNG; quality is applied at save
/// time, once the destination format is known.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageThumbnailer;

impl ImageThumbnailer {
    /// Create a thumbnailer.
    pub fn new() -> Self {
        Self
    }
}

impl AssetTransform for ImageThumbnailer {
    fn transform(&self, source: &Path, params: &ProfileParams) -> Result<Vec<u8>, TransformError> {
        let image = image::open(source).map_err(|source_err| TransformError::Open {
            path: source.to_path_buf(),
            source: source_err,
        })?;

        let scaled = image.thumbnail(params.width, params.height);

        let mut buffer = Cursor::new(Vec::new());
        scaled
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|source_err| TransformError::Encode {
                path: source.to_path_buf(),
                source: source_err,
            })?;
        Ok(buffer.into_inner())
    }

    fn save(&self, bytes: &[u8], dest: &Path, quality: u8) -> Result<(), TransformError> {
        let image = image::load_from_memory(bytes).map_err(|source_err| TransformError::Open {
            path: dest.to_path_buf(),
            source: source_err,
        })?;

        let format = ImageFormat::from_path(dest).unwrap_or(ImageFormat::Png);
        match format {
            ImageFormat::Jpeg => write_jpeg(&image, dest, quality),
            _ => image
                .save_with_format(dest, format)
                .map_err(|source_err| TransformError::Encode {
                    path: dest.to_path_buf(),
                    source: source_err,
                }),
        }
    }
}

/// JPEG is the one destination format where quality applies. The encoder
/// rejects alpha channels, so the image is flattened to RGB first.
fn write_jpeg(image: &DynamicImage, dest: &Path, quality: u8) -> Result<(), TransformError> {
    let file = File::create(dest).map_err(|source_err| TransformError::Io {
        path: dest.to_path_buf(),
        source: source_err,
    })?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100));

    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    rgb.write_with_encoder(encoder)
        .map_err(|source_err| TransformError::Encode {
            path: dest.to_path_buf(),
            source: source_err,
        })?;

    writer.flush().map_err(|source_err| TransformError::Io {
        path: dest.to_path_buf(),
        source: source_err,
    })
}
