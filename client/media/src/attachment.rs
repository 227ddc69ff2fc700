//! The one-slot staging area for the next outgoing image.

use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use tracing::{debug, info};
use triage_core::TriageError;

use crate::mime_detect::{detect_mime_type, is_image};

/// Raw file handed over by the picker or a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub name: Option<String>,
    pub mime_type: String,
    pub data: Bytes,
}

impl ImageSource {
    pub fn new(name: Option<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name,
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// Read a dropped file as-is. Only I/O failures are errors; whether the file
/// is an image is left to staging, which ignores anything else.
pub async fn load_dropped_file(path: &Path) -> Result<ImageSource, TriageError> {
    let data = tokio::fs::read(path).await.map_err(|e| {
        TriageError::Storage(format!("failed to read {}: {}", path.display(), e))
    })?;
    let mime = detect_mime_type(path, &data);

    Ok(ImageSource::new(
        path.file_name().map(|n| n.to_string_lossy().into_owned()),
        mime,
        data,
    ))
}

/// Read a picked file. Files that are not recognisable images are refused.
pub async fn load_image_file(path: &Path) -> Result<ImageSource, TriageError> {
    let source = load_dropped_file(path).await?;
    if !is_image(&source.mime_type) {
        return Err(TriageError::UnsupportedMedia(format!(
            "{} is not an image",
            path.display()
        )));
    }
    Ok(source)
}

/// An image ready to ride along with the next turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedAttachment {
    pub name: Option<String>,
    pub mime_type: String,
    /// Transport encoding, no `data:` prefix.
    pub base64: String,
    /// `data:` URL usable directly as an image source.
    pub preview_url: String,
    pub size_bytes: usize,
}

impl StagedAttachment {
    fn encode(source: &ImageSource) -> Self {
        let base64 = STANDARD.encode(&source.data);
        let preview_url = format!("data:{};base64,{}", source.mime_type, base64);
        Self {
            name: source.name.clone(),
            mime_type: source.mime_type.clone(),
            base64,
            preview_url,
            size_bytes: source.data.len(),
        }
    }
}

/// Holds at most one pending image. Staging replaces, it never merges.
#[derive(Debug, Default)]
pub struct AttachmentStaging {
    slot: Option<StagedAttachment>,
    preview_visible: bool,
}

impl AttachmentStaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `source`, replacing whatever was staged before.
    ///
    /// Non-image or empty sources are ignored without error; returns whether
    /// the slot changed.
    pub fn stage(&mut self, source: ImageSource) -> bool {
        if !is_image(&source.mime_type) || source.data.is_empty() {
            debug!(mime = %source.mime_type, "Ignoring non-image attachment");
            return false;
        }

        let staged = StagedAttachment::encode(&source);
        if self.slot.is_some() {
            debug!("Replacing previously staged attachment");
        }
        info!(mime = %staged.mime_type, size = staged.size_bytes, "Attachment staged");
        self.slot = Some(staged);
        self.preview_visible = true;
        true
    }

    /// Drop the staged image, if any. Idempotent.
    pub fn clear(&mut self) {
        self.slot = None;
        self.preview_visible = false;
    }

    /// Base64 payload of the staged image, without clearing it.
    pub fn peek(&self) -> Option<&str> {
        self.slot.as_ref().map(|s| s.base64.as_str())
    }

    pub fn staged(&self) -> Option<&StagedAttachment> {
        self.slot.as_ref()
    }

    /// Move the staged image out and free the slot.
    pub fn take(&mut self) -> Option<StagedAttachment> {
        self.preview_visible = false;
        self.slot.take()
    }

    pub fn preview_visible(&self) -> bool {
        self.preview_visible
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.slot.as_ref().map(|s| s.preview_url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(byte: u8) -> ImageSource {
        ImageSource::new(Some("x.png".into()), "image/png", vec![0x89, b'P', b'N', b'G', byte])
    }

    #[test]
    fn stage_encodes_and_shows_preview() {
        let mut staging = AttachmentStaging::new();
        assert!(staging.stage(ImageSource::new(None, "image/jpeg", b"abc".to_vec())));
        assert_eq!(staging.peek(), Some("YWJj"));
        assert_eq!(staging.preview_url(), Some("data:image/jpeg;base64,YWJj"));
        assert!(staging.preview_visible());
    }

    #[test]
    fn last_stage_wins() {
        let mut staging = AttachmentStaging::new();
        let sources: Vec<_> = (0..5u8).map(png).collect();
        for source in sources {
            let expected = STANDARD.encode(&source.data);
            staging.stage(source);
            assert_eq!(staging.peek(), Some(expected.as_str()));
        }
    }

    #[test]
    fn non_images_are_ignored() {
        let mut staging = AttachmentStaging::new();
        staging.stage(png(1));
        let before = staging.peek().map(str::to_owned);

        assert!(!staging.stage(ImageSource::new(None, "application/pdf", b"%PDF".to_vec())));
        assert_eq!(staging.peek().map(str::to_owned), before);
        assert!(staging.preview_visible());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut staging = AttachmentStaging::new();
        staging.stage(png(2));
        staging.clear();
        staging.clear();
        assert_eq!(staging.peek(), None);
        assert!(!staging.preview_visible());
    }

    #[test]
    fn take_frees_the_slot() {
        let mut staging = AttachmentStaging::new();
        staging.stage(png(3));
        let taken = staging.take().unwrap();
        assert_eq!(taken.mime_type, "image/png");
        assert!(staging.peek().is_none());
        assert!(!staging.preview_visible());
    }

    #[tokio::test]
    async fn loads_file_and_sniffs_unlabelled_png() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("photo.upload");
        std::fs::write(&path, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2]).unwrap();

        let source = load_image_file(&path).await.unwrap();
        assert_eq!(source.mime_type, "image/png");
        assert_eq!(source.name.as_deref(), Some("photo.upload"));
    }

    #[tokio::test]
    async fn refuses_non_image_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("referto.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let err = load_image_file(&path).await.unwrap_err();
        assert!(matches!(err, TriageError::UnsupportedMedia(_)));
    }

    #[tokio::test]
    async fn dropped_non_image_loads_without_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"appunti").unwrap();

        let source = load_dropped_file(&path).await.unwrap();
        assert_eq!(source.mime_type, "application/octet-stream");

        let mut staging = AttachmentStaging::new();
        assert!(!staging.stage(source));
        assert!(staging.peek().is_none());
    }

    #[tokio::test]
    async fn missing_dropped_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_dropped_file(&dir.path().join("gone.png")).await.unwrap_err();
        assert!(matches!(err, TriageError::Storage(_)));
    }
}
