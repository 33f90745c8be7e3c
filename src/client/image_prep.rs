use std::{fmt, io::Cursor, path::Path};

use image::{codecs::jpeg::JpegEncoder, DynamicImage};

use crate::client::ClientError;

/// Quality factor applied to every re-encoded upload, on a 0.0..=1.0 scale.
pub const WEB_QUALITY: f32 = 0.8;

/// Longest edge of the preview thumbnail.
pub const PREVIEW_EDGE: u32 = 160;

const PREVIEW_QUALITY: u8 = 70;
pub const UPLOAD_CONTENT_TYPE: &str = "image/jpeg";

/// The blob that actually gets uploaded. The original file is never sent.
#[derive(Clone, PartialEq, Eq)]
pub struct ConvertedImage {
    pub file_name: String,
    pub content_type: &'static str,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl fmt::Debug for ConvertedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertedImage")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.data.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Small rendition shown to the admin, decoded from the converted blob.
#[derive(Clone, PartialEq, Eq)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
}

impl fmt::Debug for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preview")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.jpeg.len())
            .finish()
    }
}

/// Maps a 0.0..=1.0 quality factor onto the JPEG 1..=100 scale.
pub fn jpeg_quality(factor: f32) -> u8 {
    (factor.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8
}

/// `photo.large.png` becomes `photo.large.jpg`.
pub fn upload_file_name(original: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    format!("{}.jpg", stem)
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, ClientError> {
    let rgb = image.to_rgb8();
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode_image(&rgb)
        .map_err(|e| ClientError::ImageEncode(e.to_string()))?;
    Ok(out.into_inner())
}

/// Decodes any supported raster format and re-encodes it for the web.
pub fn convert_for_upload(file_name: &str, bytes: &[u8], quality: f32) -> Result<ConvertedImage, ClientError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ClientError::ImageDecode(format!("{}: {}", file_name, e)))?;

    let data = encode_jpeg(&decoded, jpeg_quality(quality))?;

    Ok(ConvertedImage {
        file_name: upload_file_name(file_name),
        content_type: UPLOAD_CONTENT_TYPE,
        data,
        width: decoded.width(),
        height: decoded.height(),
    })
}

pub fn make_preview(converted: &ConvertedImage) -> Result<Preview, ClientError> {
    let decoded = image::load_from_memory(&converted.data)
        .map_err(|e| ClientError::ImageDecode(e.to_string()))?;

    let thumb = decoded.thumbnail(PREVIEW_EDGE, PREVIEW_EDGE);

    Ok(Preview {
        width: thumb.width(),
        height: thumb.height(),
        jpeg: encode_jpeg(&thumb, PREVIEW_QUALITY)?,
    })
}
