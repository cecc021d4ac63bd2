//! PNG materialization.
//!
//! Encoding is deterministic: the same image and metadata always give the same
//! bytes. Files are written next to their destination under a temporary name
//! and renamed into place, so a failed run never leaves a truncated PNG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::RgbImage;

use rsurf_common::error::{RsurfError, RsurfResult};

use crate::metadata::ImageMetadata;

/// Canonical extension of the output format.
pub const PNG_EXTENSION: &str = "png";

/// Encode `image` as RGB8 PNG with one `tEXt` chunk per metadata entry.
pub fn encode_to<W: Write>(
    writer: W,
    image: &RgbImage,
    metadata: &ImageMetadata,
) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    for (keyword, value) in metadata.entries() {
        encoder.add_text_chunk(keyword.to_string(), value.to_string())?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(image.as_raw())?;
    png_writer.finish()
}

/// Encode into memory.
pub fn encode(image: &RgbImage, metadata: &ImageMetadata) -> Result<Vec<u8>, png::EncodingError> {
    let mut bytes = Vec::new();
    encode_to(&mut bytes, image, metadata)?;
    Ok(bytes)
}

/// Encode to an already-open stream (e.g. stdout). `label` names it in errors.
pub fn write_stream(
    writer: &mut dyn Write,
    label: &Path,
    image: &RgbImage,
    metadata: &ImageMetadata,
) -> RsurfResult<()> {
    encode_to(&mut *writer, image, metadata)
        .map_err(|e| RsurfError::output(label, e.to_string()))?;
    writer
        .flush()
        .map_err(|e| RsurfError::output(label, e.to_string()))
}

/// Encode to `path`, replacing it atomically.
pub fn write_file(path: &Path, image: &RgbImage, metadata: &ImageMetadata) -> RsurfResult<()> {
    let tmp = temp_path_for(path);
    tracing::debug!(path = %path.display(), tmp = %tmp.display(), "Writing PNG");

    let result = write_then_rename(&tmp, path, image, metadata);
    if result.is_err() {
        std::fs::remove_file(&tmp).ok();
    }
    result
}

fn write_then_rename(
    tmp: &Path,
    path: &Path,
    image: &RgbImage,
    metadata: &ImageMetadata,
) -> RsurfResult<()> {
    let file = File::create(tmp).map_err(|e| RsurfError::output(path, e.to_string()))?;
    let mut out = BufWriter::new(file);
    write_stream(&mut out, path, image, metadata)?;
    let file = out
        .into_inner()
        .map_err(|e| RsurfError::output(path, e.error().to_string()))?;
    file.sync_all()
        .map_err(|e| RsurfError::output(path, e.to_string()))?;
    drop(file);

    std::fs::rename(tmp, path).map_err(|e| RsurfError::output(path, e.to_string()))
}

/// Hidden sibling of `path` used while writing.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let tmp_name = format!(".{name}.{}.tmp", std::process::id());
    match path.parent() {
        Some(parent) => parent.join(tmp_name),
        None => PathBuf::from(tmp_name),
    }
}
