//! Attachments borrowed from the blob store
//!
//! An attachment is not owned by the extraction pipeline; it is read once
//! per extraction call. Documents arrive either as raw bytes (PDFs,
//! images) or as text already indexed by the storage layer.

use serde::{Deserialize, Serialize};

/// A document attached to a business record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Blob-store identifier
    pub id: u64,
    /// Original filename
    pub filename: String,
    /// Declared MIME type, if the store knows one
    pub mimetype: Option<String>,
    /// Document content
    pub data: AttachmentData,
}

/// Content of an attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AttachmentData {
    /// Raw bytes, as stored
    Bytes(Vec<u8>),
    /// Text content pre-extracted by the storage layer's indexer
    IndexedText(String),
}

impl Attachment {
    /// Create a binary attachment.
    pub fn binary(
        id: u64,
        filename: impl Into<String>,
        mimetype: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            id,
            filename: filename.into(),
            mimetype,
            data: AttachmentData::Bytes(bytes),
        }
    }

    /// Create an attachment from pre-indexed text.
    pub fn indexed_text(id: u64, filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
            mimetype: Some("text/plain".to_string()),
            data: AttachmentData::IndexedText(text.into()),
        }
    }

    /// Size of the stored content in bytes.
    pub fn byte_size(&self) -> usize {
        match &self.data {
            AttachmentData::Bytes(b) => b.len(),
            AttachmentData::IndexedText(t) => t.len(),
        }
    }

    /// Human-readable document kind derived from the MIME type, used in
    /// prompt context ("PDF Document", "Image Document", ...).
    pub fn kind_label(&self) -> &'static str {
        match self.mimetype.as_deref() {
            Some("application/pdf") => "PDF Document",
            Some(m) if m.starts_with("image/") => "Image Document",
            Some("application/msword")
            | Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document") => {
                "Word Document"
            }
            Some(m) if m.starts_with("text/") => "Text Document",
            _ => "Document",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_attachment() {
        let att = Attachment::binary(1, "scan.pdf", Some("application/pdf".into()), vec![1, 2, 3]);
        assert_eq!(att.byte_size(), 3);
        assert_eq!(att.kind_label(), "PDF Document");
    }

    #[test]
    fn test_indexed_text_attachment() {
        let att = Attachment::indexed_text(2, "notes.txt", "hello");
        assert_eq!(att.byte_size(), 5);
        assert_eq!(att.kind_label(), "Text Document");
    }

    #[test]
    fn test_kind_labels() {
        let img = Attachment::binary(3, "photo.png", Some("image/png".into()), vec![]);
        assert_eq!(img.kind_label(), "Image Document");

        let unknown = Attachment::binary(4, "blob.bin", None, vec![]);
        assert_eq!(unknown.kind_label(), "Document");
    }
}
