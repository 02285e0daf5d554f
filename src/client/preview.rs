use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Handle to a locally held preview of a file that has not been uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewRef(Uuid);

impl fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preview:{}", self.0)
    }
}

/// Owns the bytes behind every live `PreviewRef` until it is revoked.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    entries: HashMap<PreviewRef, Bytes>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, data: Bytes) -> PreviewRef {
        let preview = PreviewRef(Uuid::new_v4());
        self.entries.insert(preview, data);
        preview
    }

    pub fn resolve(&self, preview: &PreviewRef) -> Option<&Bytes> {
        self.entries.get(preview)
    }

    /// Returns false when the reference was already released.
    pub fn revoke(&mut self, preview: &PreviewRef) -> bool {
        self.entries.remove(preview).is_some()
    }

    pub fn live(&self) -> usize {
        self.entries.len()
    }
}
