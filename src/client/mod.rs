//! Client-side half of the upload flow: pick files, preview them locally,
//! submit them as one batch and show what the server stored.

pub mod preview;
pub mod staging;
pub mod transport;
pub mod uploader;

pub use preview::{PreviewRef, PreviewRegistry};
pub use staging::{AcceptHint, LocalFile, StagedFile, short_name};
pub use transport::{ClientError, HttpTransport, UploadTransport};
pub use uploader::{Notice, NoticeVariant, PhotoUploader};
