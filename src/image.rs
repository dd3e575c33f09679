//! Generated image handles and MIME sniffing for inline image payloads.

use base64::Engine as _;

/// Image produced by an [`ImageGenerationService`](crate::ai::ImageGenerationService).
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedImage {
    /// Hosted by the provider; typically expires after a while.
    Url(String),
    /// Raw image bytes decoded from a base64 response.
    Bytes(Vec<u8>),
}

impl GeneratedImage {
    /// Source string suitable for an `<img src>` or a terminal link.
    pub fn display_source(&self) -> String {
        match self {
            GeneratedImage::Url(url) => url.clone(),
            GeneratedImage::Bytes(bytes) => format!(
                "data:{};base64,{}",
                detect_image_mime(bytes),
                base64::engine::general_purpose::STANDARD.encode(bytes)
            ),
        }
    }
}

pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        _ => {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?}), falling back to image/png",
                &bytes[..bytes.len().min(4)]
            );
            "image/png"
        }
    }
}
