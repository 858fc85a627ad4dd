//! Client-side re-encoding of images before upload.

use bytes::Bytes;
use image::imageops::FilterType;
use tracing::debug;

use crate::dropzone::SelectedFile;
use crate::error::ClientError;

/// Widest image uploaded after optimization, in pixels.
pub const MAX_WIDTH: u32 = 1920;

/// Lossy WebP quality, 0-100.
pub const WEBP_QUALITY: f32 = 80.0;

/// Formats that re-encoding would break (vector or animated).
const PASSTHROUGH_TYPES: &[&str] = &["image/svg+xml", "image/gif"];

pub fn should_optimize(content_type: &str) -> bool {
    !PASSTHROUGH_TYPES.contains(&content_type)
}

/// Replace the last extension with `.webp`.
pub fn webp_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => format!("{stem}.webp"),
        _ => format!("{name}.webp"),
    }
}

/// Target dimensions for an image bounded to `max_width`, keeping aspect ratio.
pub fn fit_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let (w, h, max) = (u64::from(width), u64::from(height), u64::from(max_width));
    let scaled = (h * max + w / 2) / w;
    (max_width, scaled.max(1) as u32)
}

/// Re-encode `file` as lossy WebP no wider than `max_width`.
///
/// SVG and GIF files are returned unchanged, as is any file the re-encode
/// would not make smaller.
pub fn optimize(file: SelectedFile, max_width: u32) -> Result<SelectedFile, ClientError> {
    if !should_optimize(&file.content_type) {
        debug!(name = %file.name, "Skipping optimization");
        return Ok(file);
    }

    let decoded = image::load_from_memory(&file.data)?;
    let (width, height) = fit_width(decoded.width(), decoded.height(), max_width);
    let resized = if width == decoded.width() {
        decoded
    } else {
        decoded.resize_exact(width, height, FilterType::Lanczos3)
    };

    let rgba = resized.to_rgba8();
    let encoded = webp::Encoder::from_rgba(rgba.as_raw(), width, height)
        .encode_simple(false, WEBP_QUALITY)
        .map_err(|e| ClientError::Encode(format!("{e:?}")))?;

    debug!(
        name = %file.name,
        before = file.data.len(),
        after = encoded.len(),
        width,
        height,
        "Re-encoded image"
    );
    Ok(smaller_of(file, &encoded))
}

/// The WebP rendition of `original`, unless it is no smaller.
fn smaller_of(original: SelectedFile, webp: &[u8]) -> SelectedFile {
    if webp.len() >= original.data.len() {
        debug!(name = %original.name, "Re-encode not smaller, keeping original");
        return original;
    }
    SelectedFile {
        name: webp_name(&original.name),
        content_type: "image/webp".to_string(),
        data: Bytes::copy_from_slice(webp),
    }
}

/// Run [`optimize`] on the blocking pool.
pub async fn optimize_in_background(
    file: SelectedFile,
    max_width: u32,
) -> Result<SelectedFile, ClientError> {
    tokio::task::spawn_blocking(move || optimize(file, max_width))
        .await
        .map_err(|e| ClientError::Task(e.to_string()))?
}
