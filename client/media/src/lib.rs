//! Image attachments for outgoing turns.
//!
//! Covers the single staging slot, the file-picker loader, the drag-and-drop
//! adapter and the MIME checks both sources go through.

pub mod attachment;
pub mod drop_zone;
pub mod mime_detect;

pub use attachment::{
    AttachmentStaging, ImageSource, StagedAttachment, load_dropped_file, load_image_file,
};
pub use drop_zone::{DragEvent, DropZone};
pub use mime_detect::{detect_mime_type, image_type_for_extension, is_image, sniff_image_type};
