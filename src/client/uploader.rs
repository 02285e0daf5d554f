use crate::client::preview::{PreviewRef, PreviewRegistry};
use crate::client::staging::{LocalFile, StagedFile};
use crate::client::transport::UploadTransport;
use crate::models::UploadedFile;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// User-facing outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    fn new(title: &str, description: impl Into<String>, variant: NoticeVariant) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == NoticeVariant::Destructive
    }
}

/// Holds the uploading flag up for as long as a request is pending, including
/// when the submitting future is dropped before it completes.
struct InFlight<'a> {
    flag: &'a mut bool,
}

impl<'a> InFlight<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

/// Client-side state: staged files with previews, and the last uploaded batch.
pub struct PhotoUploader<T> {
    transport: T,
    previews: PreviewRegistry,
    staged: Vec<StagedFile>,
    uploaded: Vec<UploadedFile>,
    uploading: bool,
}

impl<T: UploadTransport> PhotoUploader<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            previews: PreviewRegistry::new(),
            staged: Vec::new(),
            uploaded: Vec::new(),
            uploading: false,
        }
    }

    pub fn staged(&self) -> &[StagedFile] {
        &self.staged
    }

    pub fn uploaded(&self) -> &[UploadedFile] {
        &self.uploaded
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn can_submit(&self) -> bool {
        !self.staged.is_empty() && !self.uploading
    }

    /// Nothing staged, nothing uploaded and no request in flight.
    pub fn is_idle_empty(&self) -> bool {
        self.staged.is_empty() && self.uploaded.is_empty() && !self.uploading
    }

    /// Stage files behind any already staged ones, each with a fresh preview.
    pub fn select_files<I>(&mut self, files: I) -> Vec<PreviewRef>
    where
        I: IntoIterator<Item = LocalFile>,
    {
        files
            .into_iter()
            .map(|file| {
                let preview = self.previews.create(file.data.clone());
                self.staged.push(StagedFile { file, preview });
                preview
            })
            .collect()
    }

    /// Drop one staged file and release its preview. Out of range is a no-op.
    pub fn remove_staged(&mut self, index: usize) -> Option<StagedFile> {
        if index >= self.staged.len() {
            return None;
        }
        let removed = self.staged.remove(index);
        self.previews.revoke(&removed.preview);
        Some(removed)
    }

    /// Submit every staged file as one batch.
    ///
    /// On success the uploaded list is replaced by the server's records and the
    /// staging area is cleared. On failure the staging area is left untouched.
    pub async fn upload_batch(&mut self) -> Notice {
        if self.staged.is_empty() {
            return Notice::new(
                "No photos selected",
                "Please select at least one photo to upload",
                NoticeVariant::Destructive,
            );
        }

        let files: Vec<LocalFile> = self.staged.iter().map(|s| s.file.clone()).collect();
        let in_flight = InFlight::start(&mut self.uploading);
        let result = self.transport.send_batch(&files).await;
        drop(in_flight);

        match result {
            Ok(response) => {
                let count = response.files.len();
                info!("Uploaded {} photo(s): {}", count, response.message);

                self.uploaded = response.files;
                for staged in self.staged.drain(..) {
                    self.previews.revoke(&staged.preview);
                }

                Notice::new(
                    "Upload successful",
                    format!("Successfully uploaded {} photos", count),
                    NoticeVariant::Default,
                )
            }
            Err(e) => {
                error!("Error uploading photos: {}", e);
                Notice::new(
                    "Upload failed",
                    "There was an error uploading your photos",
                    NoticeVariant::Destructive,
                )
            }
        }
    }
}
