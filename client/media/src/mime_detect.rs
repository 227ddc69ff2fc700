//! Image type detection for attachments.
//!
//! Leading bytes are trusted over the file name; the extension only decides
//! when the content has no recognised signature.

use std::path::Path;

const OCTET_STREAM: &str = "application/octet-stream";

/// Image MIME type implied by the file extension, if any.
pub fn image_type_for_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" | "heif" => "image/heic",
        _ => return None,
    };
    Some(mime)
}

/// Image MIME type from magic bytes.
pub fn sniff_image_type(data: &[u8]) -> Option<&'static str> {
    match data {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', ..] => Some("image/bmp"),
        [_, _, _, _, b'f', b't', b'y', b'p', b'h', b'e', b'i', b'c' | b'x', ..] => {
            Some("image/heic")
        }
        _ => None,
    }
}

/// MIME type for a file's content, `application/octet-stream` when it is not
/// a recognised image.
pub fn detect_mime_type(path: &Path, data: &[u8]) -> &'static str {
    sniff_image_type(data)
        .or_else(|| image_type_for_extension(path))
        .unwrap_or(OCTET_STREAM)
}

pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}
