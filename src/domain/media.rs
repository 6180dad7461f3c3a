//! Media kinds, MIME detection and display references for selected files

use std::fmt;
use std::path::Path;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};

/// Bytes left as-is in a `file://` path
const PATH_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// The kind of media a page accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// MIME top-level type prefix, including the slash
    pub fn mime_prefix(self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Video => "video/",
        }
    }

    /// File extensions offered in the file picker for this kind
    pub fn extensions(self) -> Vec<&'static str> {
        MIME_TABLE
            .iter()
            .filter(|(_, mime)| mime.starts_with(self.mime_prefix()))
            .map(|(ext, _)| *ext)
            .collect()
    }
}

/// Extension to MIME type table, mirroring what browsers report as `File.type`
const MIME_TABLE: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("avif", "image/avif"),
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("ogv", "video/ogg"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("txt", "text/plain"),
    ("pdf", "application/pdf"),
];

/// A MIME type string such as `video/mp4`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeType(String);

impl MimeType {
    /// Guess the MIME type from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        MIME_TABLE
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, mime)| Self((*mime).to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this type belongs to the given media kind
    pub fn is_kind(&self, kind: MediaKind) -> bool {
        self.0.starts_with(kind.mime_prefix())
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `file://` URI used to display a selected file.
///
/// Dropping it together with its source is the equivalent of revoking an
/// object URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUrl(String);

impl DisplayUrl {
    /// Build a URI for an absolute path from its raw bytes
    pub fn for_path(path: &Path) -> Self {
        let encoded = percent_encode(path_bytes(path).as_ref(), PATH_SET);
        Self(format!("file://{encoded}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    std::borrow::Cow::Owned(path.to_string_lossy().into_owned().into_bytes())
}

impl fmt::Display for DisplayUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
