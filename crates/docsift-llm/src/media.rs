//! Supported media types for inline document payloads
//!
//! The vendor document APIs accept a fixed set of MIME types. `MediaType`
//! is a closed enum over that set, so a resolved payload can never carry an
//! unsupported type to the wire.

use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A document MIME type accepted by the provider APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// application/pdf
    Pdf,
    /// image/jpeg
    Jpeg,
    /// image/png
    Png,
    /// image/webp
    Webp,
    /// image/tiff
    Tiff,
    /// image/gif
    Gif,
}

impl MediaType {
    /// The MIME string sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Webp => "image/webp",
            MediaType::Tiff => "image/tiff",
            MediaType::Gif => "image/gif",
        }
    }

    /// Parse a declared MIME type, `None` when unsupported.
    pub fn from_mime(mime: &str) -> Option<MediaType> {
        match mime {
            "application/pdf" => Some(MediaType::Pdf),
            "image/jpeg" => Some(MediaType::Jpeg),
            "image/png" => Some(MediaType::Png),
            "image/webp" => Some(MediaType::Webp),
            "image/tiff" => Some(MediaType::Tiff),
            "image/gif" => Some(MediaType::Gif),
            _ => None,
        }
    }

    /// Derive the type from a filename extension.
    ///
    /// Unknown extensions fall back to PNG as a last resort; the provider
    /// accepts it for most unlabeled image uploads.
    pub fn from_filename(filename: &str) -> MediaType {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            MediaType::Pdf
        } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            MediaType::Jpeg
        } else if lower.ends_with(".png") {
            MediaType::Png
        } else if lower.ends_with(".webp") {
            MediaType::Webp
        } else if lower.ends_with(".tif") || lower.ends_with(".tiff") {
            MediaType::Tiff
        } else if lower.ends_with(".gif") {
            MediaType::Gif
        } else {
            MediaType::Png
        }
    }

    /// Resolve the effective type from a declared MIME type and/or filename.
    ///
    /// Resolution order: supported declared type wins; otherwise the
    /// filename extension decides (PNG last resort). A declared but
    /// unsupported type with no filename to fall back on fails with
    /// [`LlmError::UnsupportedMediaType`].
    pub fn resolve(mimetype: Option<&str>, filename: Option<&str>) -> Result<MediaType, LlmError> {
        if let Some(mime) = mimetype {
            if let Some(media) = MediaType::from_mime(mime) {
                return Ok(media);
            }
            return match filename {
                Some(name) => Ok(MediaType::from_filename(name)),
                None => Err(LlmError::UnsupportedMediaType(mime.to_string())),
            };
        }
        Ok(filename.map(MediaType::from_filename).unwrap_or(MediaType::Png))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
