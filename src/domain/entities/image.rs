use actix_web::web::Bytes;
use serde::{Deserialize, Serialize};

/// An image received from a client, held in memory until it reaches the media store.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String, // sniffed, not client-declared
    pub data: Bytes,
}

impl ImageUpload {
    /// Sniffs the payload and refuses anything that is not a raster image.
    pub fn from_bytes(file_name: Option<String>, data: Bytes) -> Result<Self, String> {
        let file_name = file_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "upload".to_string());

        if data.is_empty() {
            return Err(format!("{} is empty", file_name));
        }

        match infer::get(&data) {
            Some(kind) if kind.matcher_type() == infer::MatcherType::Image => Ok(ImageUpload {
                file_name,
                content_type: kind.mime_type().to_string(),
                data,
            }),
            _ => Err(format!("{} is not a supported image", file_name)),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// What the media store hands back for one stored asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub url: String,
    pub public_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn png_payload_is_accepted() {
        let upload = ImageUpload::from_bytes(Some("a.png".into()), Bytes::from_static(PNG_HEADER)).unwrap();
        assert_eq!(upload.content_type, "image/png");
        assert_eq!(upload.file_name, "a.png");
    }

    #[test]
    fn text_payload_is_rejected() {
        let err = ImageUpload::from_bytes(Some("notes.txt".into()), Bytes::from_static(b"hello world"))
            .unwrap_err();
        assert!(err.contains("notes.txt"));
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(ImageUpload::from_bytes(None, Bytes::new()).is_err());
    }
}
