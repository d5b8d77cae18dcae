use bytes::Bytes;

/// File content record
///
/// Blobs are opaque byte payloads; the diff layer views them as lines.
#[derive(Debug, Clone, Eq, PartialEq, derive_new::new)]
pub struct BlobRecord {
    content: Bytes,
}

impl BlobRecord {
    pub fn from_text(text: &str) -> Self {
        BlobRecord {
            content: Bytes::copy_from_slice(text.as_bytes()),
        }
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// View the payload as lines for diffing
    ///
    /// Invalid UTF-8 byte runs are replaced, not rejected; stats over binary
    /// blobs still count line boundaries.
    pub fn lines(&self) -> Vec<String> {
        let text = String::from_utf8_lossy(&self.content);
        text.lines().map(|line| line.to_string()).collect()
    }

    pub fn line_count(&self) -> usize {
        self.lines().len()
    }
}
