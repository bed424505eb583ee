/// Why an upload could not start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadBlocked {
    #[error("an upload is already in progress")]
    InFlight,

    #[error("enter the path of an image file first")]
    NoFile,
}

/// Upload progress and the current image preview for one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    uploading: bool,
    preview: Option<String>,
}

impl UploadState {
    /// Starts with a preview of an already stored image.
    pub fn with_preview(preview: Option<String>) -> Self {
        Self {
            uploading: false,
            preview,
        }
    }

    pub fn uploading(&self) -> bool {
        self.uploading
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Marks an upload in flight. Only one may run at a time.
    pub(crate) fn begin(&mut self) -> Result<(), UploadBlocked> {
        if self.uploading {
            return Err(UploadBlocked::InFlight);
        }
        self.uploading = true;
        Ok(())
    }

    /// Ends the in-flight upload, replacing the preview on success.
    pub(crate) fn finish(&mut self, preview: Option<String>) {
        self.uploading = false;
        if preview.is_some() {
            self.preview = preview;
        }
    }

    pub(crate) fn clear_preview(&mut self) {
        self.preview = None;
    }
}
