//! File selection: picker dialog, drop validation and image probing

use std::path::{Path, PathBuf};

use crate::domain::{DisplayUrl, MediaKind, MimeType};

/// Errors raised while accepting or presenting a media file
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    #[error("{} is not a valid {expected:?} file", path.display())]
    WrongType { path: PathBuf, expected: MediaKind },
    #[error("{} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("could not decode image: {0}")]
    Decode(String),
    #[error("playback failed: {0}")]
    Playback(String),
}

/// A file accepted for display and interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub mime: MimeType,
    pub url: DisplayUrl,
}

/// Validate a picked or dropped file against the expected media kind.
///
/// The MIME type is derived from the extension; anything outside the
/// expected top-level type is rejected.
pub fn accept(path: &Path, kind: MediaKind) -> Result<SelectedFile, MediaError> {
    let mime = MimeType::from_path(path)
        .filter(|mime| mime.is_kind(kind))
        .ok_or_else(|| MediaError::WrongType {
            path: path.to_path_buf(),
            expected: kind,
        })?;

    if !path.is_file() {
        return Err(MediaError::Missing(path.to_path_buf()));
    }

    let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let name = absolute
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    log::debug!("Accepted {} ({}) as {:?}", absolute.display(), mime, kind);

    Ok(SelectedFile {
        url: DisplayUrl::for_path(&absolute),
        path: absolute,
        name,
        mime,
    })
}

/// Read the image header and return its dimensions
pub fn probe_image(file: &SelectedFile) -> Result<(u32, u32), MediaError> {
    image::image_dimensions(&file.path).map_err(|err| MediaError::Decode(err.to_string()))
}

/// Show the platform file picker filtered to the given kind
pub async fn pick(kind: MediaKind) -> Option<PathBuf> {
    let (title, filter, start) = match kind {
        MediaKind::Image => ("Select an image", "Images", dirs::picture_dir()),
        MediaKind::Video => ("Select a video", "Videos", dirs::video_dir()),
    };

    let extensions = kind.extensions();
    let mut dialog = rfd::AsyncFileDialog::new()
        .set_title(title)
        .add_filter(filter, extensions.as_slice());
    if let Some(dir) = start.or_else(dirs::home_dir) {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_file().await.map(|f| f.path().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        image::RgbaImage::new(4, 3).save(&path).unwrap();
        path
    }

    #[test]
    fn test_accept_video() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("greeting.webm");
        std::fs::write(&path, b"not really webm").unwrap();

        let file = accept(&path, MediaKind::Video).unwrap();
        assert_eq!(file.name, "greeting.webm");
        assert_eq!(file.mime.as_str(), "video/webm");
        assert!(file.url.as_str().starts_with("file:///"));
        assert!(file.url.as_str().ends_with("/greeting.webm"));
    }

    #[cfg(unix)]
    #[test]
    fn test_accept_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"clip\xff.mp4"));
        std::fs::write(&path, b"frames").unwrap();

        let file = accept(&path, MediaKind::Video).unwrap();
        assert_eq!(file.mime.as_str(), "video/mp4");
        assert!(file.url.as_str().ends_with("/clip%FF.mp4"));
    }

    #[test]
    fn test_reject_wrong_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "still.png");

        let err = accept(&path, MediaKind::Video).unwrap_err();
        assert!(matches!(err, MediaError::WrongType { expected: MediaKind::Video, .. }));
    }

    #[test]
    fn test_reject_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        assert!(matches!(
            accept(&path, MediaKind::Image),
            Err(MediaError::WrongType { .. })
        ));
    }

    #[test]
    fn test_reject_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.mp4");

        assert_eq!(
            accept(&path, MediaKind::Video),
            Err(MediaError::Missing(path.clone()))
        );
    }

    #[test]
    fn test_probe_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "hand.png");

        let file = accept(&path, MediaKind::Image).unwrap();
        assert_eq!(probe_image(&file).unwrap(), (4, 3));
    }

    #[test]
    fn test_probe_corrupt_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let file = accept(&path, MediaKind::Image).unwrap();
        assert!(matches!(probe_image(&file), Err(MediaError::Decode(_))));
    }
}
