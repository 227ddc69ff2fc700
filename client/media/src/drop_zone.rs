//! Drag-and-drop adapter for the chat column.

use tracing::debug;

use crate::attachment::{AttachmentStaging, ImageSource};

#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    /// Files in the order the platform listed them.
    Drop(Vec<ImageSource>),
}

/// Tracks the drop highlight and forwards the first dropped image to staging.
#[derive(Debug, Default)]
pub struct DropZone {
    highlighted: bool,
}

impl DropZone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Apply one drag event. Returns whether an image was staged.
    pub fn handle(&mut self, event: DragEvent, staging: &mut AttachmentStaging) -> bool {
        match event {
            DragEvent::Enter | DragEvent::Over => {
                self.highlighted = true;
                false
            }
            DragEvent::Leave => {
                self.highlighted = false;
                false
            }
            DragEvent::Drop(files) => {
                self.highlighted = false;
                match files.into_iter().next() {
                    Some(first) => staging.stage(first),
                    None => {
                        debug!("Drop carried no files");
                        false
                    }
                }
            }
        }
    }
}
