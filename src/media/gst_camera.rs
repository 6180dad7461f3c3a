//! GStreamer camera backend
//!
//! Devices come from a `DeviceMonitor` filtered to `Video/Source`. A stream
//! is `<device source> ! videoconvert ! appsink(RGBA)`, with the app sink
//! writing into a [`FrameSlot`] the UI polls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;

use super::camera::{CameraBackend, CameraError, CameraStream, StreamHandle};
use super::frame::{FrameSlot, VideoFrame};
use crate::domain::{DeviceDescriptor, DeviceId};

/// Device properties tried, in order, to derive a stable device id
const ID_PROPERTIES: &[&str] = &["api.v4l2.path", "device.path", "object.path", "device.serial"];

/// How long to wait for a live source to reach Playing
const START_TIMEOUT_SECS: u64 = 3;

pub struct GstCameraBackend {
    devices: Mutex<HashMap<DeviceId, gst::Device>>,
}

impl GstCameraBackend {
    pub fn new() -> anyhow::Result<Self> {
        gst::init().context("Failed to initialize GStreamer")?;
        Ok(Self {
            devices: Mutex::new(HashMap::new()),
        })
    }

    fn lookup(&self, id: &DeviceId) -> Result<gst::Device, CameraError> {
        let cached = self
            .devices
            .lock()
            .ok()
            .and_then(|devices| devices.get(id).cloned());
        if let Some(device) = cached {
            return Ok(device);
        }

        // Selection may come from config before the first enumeration
        self.enumerate()?;
        self.devices
            .lock()
            .ok()
            .and_then(|devices| devices.get(id).cloned())
            .ok_or_else(|| CameraError::NotFound(id.clone()))
    }

    fn source_element(&self, device: Option<&DeviceId>) -> Result<gst::Element, CameraError> {
        match device {
            Some(id) => self
                .lookup(id)?
                .create_element(None)
                .map_err(|err| CameraError::Backend(err.to_string())),
            None => gst::ElementFactory::make("autovideosrc")
                .build()
                .map_err(|err| CameraError::Backend(err.to_string())),
        }
    }
}

impl CameraBackend for GstCameraBackend {
    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>, CameraError> {
        let monitor = gst::DeviceMonitor::new();
        let caps = gst::Caps::new_empty_simple("video/x-raw");
        monitor.add_filter(Some("Video/Source"), Some(&caps));
        monitor
            .start()
            .map_err(|err| CameraError::Backend(format!("device monitor: {err}")))?;
        let found = monitor.devices();
        monitor.stop();

        let mut descriptors = Vec::new();
        let mut devices = HashMap::new();
        for device in found {
            let label = device.display_name().to_string();
            let id = DeviceId::new(device_id(&device).unwrap_or_else(|| label.clone()));
            log::debug!("Found video source {label} ({id})");
            descriptors.push(DeviceDescriptor {
                id: id.clone(),
                label,
            });
            devices.insert(id, device);
        }

        if let Ok(mut cache) = self.devices.lock() {
            *cache = devices;
        }
        Ok(descriptors)
    }

    fn open(&self, device: Option<&DeviceId>) -> Result<StreamHandle, CameraError> {
        let source = self.source_element(device)?;
        let stream = GstCameraStream::new(source, device.cloned())
            .map_err(|err| CameraError::Backend(format!("{err:#}")))?;
        stream.start()?;
        Ok(Arc::new(stream))
    }
}

fn device_id(device: &gst::Device) -> Option<String> {
    let props = device.properties()?;
    ID_PROPERTIES
        .iter()
        .find_map(|key| props.get::<String>(*key).ok())
}

/// A camera pipeline feeding an RGBA app sink
#[derive(Debug)]
pub struct GstCameraStream {
    pipeline: gst::Pipeline,
    slot: Arc<FrameSlot>,
    device: Option<DeviceId>,
    live: AtomicBool,
}

impl GstCameraStream {
    fn new(source: gst::Element, device: Option<DeviceId>) -> anyhow::Result<Self> {
        let pipeline = gst::Pipeline::new();

        let videoconvert = gst::ElementFactory::make("videoconvert")
            .build()
            .context("Failed to create videoconvert element")?;

        let caps = gst::Caps::builder("video/x-raw")
            .field("format", "RGBA")
            .build();
        let appsink = gst_app::AppSink::builder()
            .caps(&caps)
            .max_buffers(1)
            .drop(true)
            .sync(false)
            .build();

        pipeline.add_many([&source, &videoconvert, appsink.upcast_ref()])?;
        gst::Element::link_many([&source, &videoconvert, appsink.upcast_ref()])?;

        let slot = Arc::new(FrameSlot::default());
        let sink_slot = Arc::clone(&slot);
        appsink.set_callbacks(
            gst_app::AppSinkCallbacks::builder()
                .new_sample(move |sink| {
                    let sample = sink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                    match VideoFrame::from_sample(&sample) {
                        Ok(frame) => sink_slot.store(frame),
                        Err(err) => log::debug!("Dropping camera frame: {err:#}"),
                    }
                    Ok(gst::FlowSuccess::Ok)
                })
                .build(),
        );

        Ok(Self {
            pipeline,
            slot,
            device,
            live: AtomicBool::new(false),
        })
    }

    fn start(&self) -> Result<(), CameraError> {
        let started = self.pipeline.set_state(gst::State::Playing).is_ok()
            && matches!(
                self.pipeline
                    .state(gst::ClockTime::from_seconds(START_TIMEOUT_SECS))
                    .0,
                Ok(gst::StateChangeSuccess::Success | gst::StateChangeSuccess::NoPreroll)
            );

        if started {
            self.live.store(true, Ordering::SeqCst);
            log::info!("Camera pipeline playing ({:?})", self.device);
            return Ok(());
        }

        let err = self.bus_error();
        let _ = self.pipeline.set_state(gst::State::Null);
        Err(err)
    }

    /// Classify the first error posted on the bus while starting
    fn bus_error(&self) -> CameraError {
        let Some(bus) = self.pipeline.bus() else {
            return CameraError::Backend("pipeline has no bus".into());
        };
        bus.timed_pop_filtered(
            gst::ClockTime::from_mseconds(500),
            &[gst::MessageType::Error],
        )
        .and_then(|message| self.classify(&message))
        .unwrap_or_else(|| CameraError::Backend("camera did not start".into()))
    }

    fn classify(&self, message: &gst::Message) -> Option<CameraError> {
        let gst::MessageView::Error(err) = message.view() else {
            return None;
        };
        let error = err.error();
        log::warn!(
            "Camera pipeline error: {} ({})",
            error,
            err.debug().unwrap_or_default()
        );
        let classified = if error.matches(gst::ResourceError::NotAuthorized) {
            CameraError::PermissionDenied
        } else if error.matches(gst::ResourceError::Busy) {
            CameraError::Busy
        } else if error.matches(gst::ResourceError::NotFound) {
            CameraError::NotFound(self.device.clone().unwrap_or_else(|| DeviceId::new("default")))
        } else {
            CameraError::Backend(error.to_string())
        };
        Some(classified)
    }
}

impl CameraStream for GstCameraStream {
    fn device(&self) -> Option<&DeviceId> {
        self.device.as_ref()
    }

    fn latest_frame(&self) -> Option<VideoFrame> {
        self.slot.take()
    }

    fn stop(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            if let Err(err) = self.pipeline.set_state(gst::State::Null) {
                log::error!("Failed to stop camera pipeline: {err}");
            }
            self.slot.clear();
            log::info!("Camera pipeline released ({:?})", self.device);
        }
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    fn poll(&self) -> Option<CameraError> {
        if !self.is_live() {
            return None;
        }
        let bus = self.pipeline.bus()?;
        let message = bus.pop_filtered(&[gst::MessageType::Error])?;
        self.classify(&message)
    }
}

impl Drop for GstCameraStream {
    fn drop(&mut self) {
        self.stop();
    }
}
