use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::image_buf::{ImageBuf, PixelFormat};

/// Decode any supported byte stream into the canonical raster buffer.
/// Corrupt or unrecognized data is a hard error; the pipeline never runs
/// on an image that failed to decode.
pub fn decode(bytes: &[u8]) -> Result<ImageBuf> {
    let img = image::load_from_memory(bytes).context("failed to decode image data")?;
    debug!(width = img.width(), height = img.height(), "decoded image");
    Ok(ImageBuf::from_dynamic(img))
}

pub fn encode(buf: &ImageBuf, format: ImageFormat) -> Result<Vec<u8>> {
    let mut dynamic = buf.to_dynamic()?;
    // JPEG has no alpha channel.
    if format == ImageFormat::Jpeg && buf.format == PixelFormat::Rgba {
        dynamic = DynamicImage::ImageRgb8(dynamic.to_rgb8());
    }

    let mut bytes = Vec::new();
    let mut cursor = Cursor::new(&mut bytes);
    dynamic
        .write_to(&mut cursor, format)
        .context("failed to encode image")?;
    Ok(bytes)
}

pub fn load(path: &Path) -> Result<ImageBuf> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    decode(&bytes)
}

pub fn save(buf: &ImageBuf, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("unrecognized output extension: {}", path.display()))?;
    let bytes = encode(buf, format)?;
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}
