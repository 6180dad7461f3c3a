//! Media acquisition
//!
//! This module consolidates:
//! - File selection and MIME validation (file.rs)
//! - Live camera sessions and the GStreamer camera backend (camera.rs, gst_camera.rs)
//! - Video playback (player.rs)
//! - Decoded frames handed to the UI (frame.rs)
//! - Mock upload progress (upload.rs)

pub mod camera;
pub mod file;
pub mod frame;
pub mod gst_camera;
pub mod player;
pub mod upload;

#[cfg(test)]
pub mod testing;

pub use camera::{CameraBackend, CameraError, CameraSession, CameraStream, StreamHandle};
pub use file::{MediaError, SelectedFile};
pub use frame::VideoFrame;
pub use player::{Playback, PlaybackEvent, PlayerBackend};

/// What a capture session is interpreting
#[derive(Debug, Clone)]
pub enum MediaSource {
    /// A selected image or video file
    File(SelectedFile),
    /// A live camera stream
    Camera(StreamHandle),
}
