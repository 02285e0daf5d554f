use crate::client::preview::PreviewRef;
use bytes::Bytes;
use std::path::Path;

/// A file picked on the client side, held in memory.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl LocalFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, detecting its content type from the leading bytes.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string();
        let content_type = infer::get(&data)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

        Ok(Self::new(name, content_type, data))
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[derive(Debug, Clone)]
pub struct StagedFile {
    pub file: LocalFile,
    pub preview: PreviewRef,
}

/// The picker's `accept` filter, e.g. `image/*` or `image/png,image/jpeg`.
#[derive(Debug, Clone)]
pub struct AcceptHint {
    patterns: Vec<String>,
}

impl Default for AcceptHint {
    fn default() -> Self {
        Self::new("image/*")
    }
}

impl AcceptHint {
    pub fn new(accept: &str) -> Self {
        Self {
            patterns: accept
                .split(',')
                .map(|p| p.trim().to_ascii_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn accepts(&self, content_type: &str) -> bool {
        let content_type = content_type.to_ascii_lowercase();
        self.patterns.iter().any(|pattern| {
            if pattern == "*" || pattern == "*/*" {
                return true;
            }
            match pattern.strip_suffix("/*") {
                Some(top) => content_type
                    .split_once('/')
                    .is_some_and(|(kind, _)| kind == top),
                None => *pattern == content_type,
            }
        })
    }
}

/// Truncate long names for gallery captions.
pub fn short_name(name: &str) -> String {
    if name.chars().count() > 15 {
        let head: String = name.chars().take(12).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_hint_wildcard() {
        let accept = AcceptHint::default();
        assert!(accept.accepts("image/png"));
        assert!(accept.accepts("IMAGE/JPEG"));
        assert!(!accept.accepts("application/pdf"));
        assert!(!accept.accepts("imagepng"));
    }

    #[test]
    fn test_accept_hint_list() {
        let accept = AcceptHint::new("image/png, image/gif");
        assert!(accept.accepts("image/gif"));
        assert!(!accept.accepts("image/jpeg"));
    }

    #[test]
    fn test_accept_hint_any() {
        assert!(AcceptHint::new("*/*").accepts("text/plain"));
        assert!(AcceptHint::new("*").accepts("application/pdf"));
        assert!(AcceptHint::new("image/png, */*").accepts("video/mp4"));
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("cat.png"), "cat.png");
        assert_eq!(short_name("exactly15chars!"), "exactly15chars!");
        assert_eq!(short_name("holiday-at-the-beach.jpg"), "holiday-at-t...");
    }

    #[tokio::test]
    async fn test_from_path_detects_png() {
        let dir = std::env::temp_dir().join(format!("photo-upload-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("pixel.png");
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
        tokio::fs::write(&path, png).await.unwrap();

        let file = LocalFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "pixel.png");
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.size(), 12);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
