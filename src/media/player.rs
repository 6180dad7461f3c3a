//! Video playback for uploaded files
//!
//! The GStreamer implementation is a `playbin` whose video sink is an RGBA
//! app sink, sharing the frame path with the camera backend.

use std::sync::Arc;

use anyhow::Context;
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;

use super::file::{MediaError, SelectedFile};
use super::frame::{FrameSlot, VideoFrame};

/// Something the player reported since the last poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Running,
    Ended,
    Failed(String),
}

/// Loads files into playback pipelines
pub trait PlayerBackend: Send + Sync {
    fn load(&self, file: &SelectedFile) -> Result<Box<dyn Playback>, MediaError>;
}

/// A loaded video, paused on its first frame until played
pub trait Playback: Send + std::fmt::Debug {
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    /// Release the pipeline; the playback is unusable afterwards
    fn stop(&mut self);
    fn poll(&mut self) -> PlaybackEvent;
    fn latest_frame(&self) -> Option<VideoFrame>;
}

pub struct GstPlayerBackend;

impl GstPlayerBackend {
    pub fn new() -> anyhow::Result<Self> {
        gst::init().context("Failed to initialize GStreamer")?;
        Ok(Self)
    }
}

impl PlayerBackend for GstPlayerBackend {
    fn load(&self, file: &SelectedFile) -> Result<Box<dyn Playback>, MediaError> {
        let player = GstPlayback::new(file).map_err(|err| MediaError::Playback(format!("{err:#}")))?;
        Ok(Box::new(player))
    }
}

/// Backend used when GStreamer failed to initialise
pub struct UnavailablePlayer {
    reason: String,
}

impl UnavailablePlayer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl PlayerBackend for UnavailablePlayer {
    fn load(&self, _file: &SelectedFile) -> Result<Box<dyn Playback>, MediaError> {
        Err(MediaError::Playback(self.reason.clone()))
    }
}

#[derive(Debug)]
pub struct GstPlayback {
    playbin: gst::Element,
    slot: Arc<FrameSlot>,
    stopped: bool,
}

impl GstPlayback {
    fn new(file: &SelectedFile) -> anyhow::Result<Self> {
        let caps = gst::Caps::builder("video/x-raw")
            .field("format", "RGBA")
            .build();
        let appsink = gst_app::AppSink::builder()
            .caps(&caps)
            .max_buffers(2)
            .drop(true)
            .build();

        let slot = Arc::new(FrameSlot::default());
        let sample_slot = Arc::clone(&slot);
        let preroll_slot = Arc::clone(&slot);
        appsink.set_callbacks(
            gst_app::AppSinkCallbacks::builder()
                .new_sample(move |sink| {
                    let sample = sink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                    if let Ok(frame) = VideoFrame::from_sample(&sample) {
                        sample_slot.store(frame);
                    }
                    Ok(gst::FlowSuccess::Ok)
                })
                .new_preroll(move |sink| {
                    let sample = sink.pull_preroll().map_err(|_| gst::FlowError::Eos)?;
                    if let Ok(frame) = VideoFrame::from_sample(&sample) {
                        preroll_slot.store(frame);
                    }
                    Ok(gst::FlowSuccess::Ok)
                })
                .build(),
        );

        let playbin = gst::ElementFactory::make("playbin")
            .property("uri", file.url.as_str())
            .property("video-sink", &appsink)
            .build()
            .context("Failed to create playbin element")?;

        playbin
            .set_state(gst::State::Paused)
            .with_context(|| format!("Failed to load {}", file.path.display()))?;

        log::info!("Loaded {} for playback", file.path.display());

        Ok(Self {
            playbin,
            slot,
            stopped: false,
        })
    }
}

impl Playback for GstPlayback {
    fn play(&mut self) -> Result<(), MediaError> {
        self.playbin
            .set_state(gst::State::Playing)
            .map(|_| ())
            .map_err(|err| MediaError::Playback(err.to_string()))
    }

    fn pause(&mut self) {
        if let Err(err) = self.playbin.set_state(gst::State::Paused) {
            log::warn!("Failed to pause playback: {err}");
        }
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            if let Err(err) = self.playbin.set_state(gst::State::Null) {
                log::error!("Failed to stop playback: {err}");
            }
            self.slot.clear();
        }
    }

    fn poll(&mut self) -> PlaybackEvent {
        let Some(bus) = self.playbin.bus() else {
            return PlaybackEvent::Running;
        };
        while let Some(message) = bus.pop() {
            match message.view() {
                gst::MessageView::Eos(..) => {
                    // Rewind so the next play starts over
                    self.pause();
                    if let Err(err) = self
                        .playbin
                        .seek_simple(gst::SeekFlags::FLUSH, gst::ClockTime::ZERO)
                    {
                        log::debug!("Rewind after end of stream failed: {err}");
                    }
                    return PlaybackEvent::Ended;
                }
                gst::MessageView::Error(err) => {
                    return PlaybackEvent::Failed(err.error().to_string());
                }
                _ => {}
            }
        }
        PlaybackEvent::Running
    }

    fn latest_frame(&self) -> Option<VideoFrame> {
        self.slot.take()
    }
}

impl Drop for GstPlayback {
    fn drop(&mut self) {
        self.stop();
    }
}
