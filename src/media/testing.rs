//! In-memory camera and player backends for tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::camera::{CameraBackend, CameraError, CameraStream, StreamHandle};
use super::file::{MediaError, SelectedFile};
use super::frame::VideoFrame;
use super::player::{Playback, PlaybackEvent, PlayerBackend};
use crate::domain::{DeviceDescriptor, DeviceId};

#[derive(Debug, Default)]
struct Counters {
    live: AtomicUsize,
    max_live: AtomicUsize,
    opened: AtomicUsize,
}

/// Camera backend that tracks how many streams are live at once
#[derive(Clone, Default)]
pub struct FakeCamera {
    devices: Vec<DeviceDescriptor>,
    counters: Arc<Counters>,
    failures: Arc<Mutex<VecDeque<CameraError>>>,
    lost: Arc<Mutex<Option<CameraError>>>,
}

impl FakeCamera {
    pub fn with_devices(ids: &[&str]) -> Self {
        Self {
            devices: ids
                .iter()
                .map(|id| DeviceDescriptor::new(*id, format!("Fake {id}")))
                .collect(),
            ..Default::default()
        }
    }

    /// Make the next `open` fail with `err`
    pub fn fail_next(&self, err: CameraError) {
        self.failures.lock().unwrap().push_back(err);
    }

    /// Make live streams report `err` on their next poll
    pub fn lose_device(&self, err: CameraError) {
        *self.lost.lock().unwrap() = Some(err);
    }

    pub fn live(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }

    pub fn max_live(&self) -> usize {
        self.counters.max_live.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }
}

impl CameraBackend for FakeCamera {
    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>, CameraError> {
        Ok(self.devices.clone())
    }

    fn open(&self, device: Option<&DeviceId>) -> Result<StreamHandle, CameraError> {
        if let Some(err) = self.failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        if let Some(id) = device {
            if !self.devices.iter().any(|d| &d.id == id) {
                return Err(CameraError::NotFound(id.clone()));
            }
        }

        let live = self.counters.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_live.fetch_max(live, Ordering::SeqCst);
        self.counters.opened.fetch_add(1, Ordering::SeqCst);

        Ok(Arc::new(FakeStream {
            device: device.cloned(),
            counters: Arc::clone(&self.counters),
            lost: Arc::clone(&self.lost),
            live: AtomicBool::new(true),
        }))
    }
}

#[derive(Debug)]
pub struct FakeStream {
    device: Option<DeviceId>,
    counters: Arc<Counters>,
    lost: Arc<Mutex<Option<CameraError>>>,
    live: AtomicBool,
}

impl CameraStream for FakeStream {
    fn device(&self) -> Option<&DeviceId> {
        self.device.as_ref()
    }

    fn latest_frame(&self) -> Option<VideoFrame> {
        self.is_live()
            .then(|| VideoFrame::from_rgba(2, 2, vec![128; 16]))
            .flatten()
    }

    fn stop(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            self.counters.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    fn poll(&self) -> Option<CameraError> {
        if !self.is_live() {
            return None;
        }
        self.lost.lock().unwrap().take()
    }
}

impl Drop for FakeStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Shared record of what a [`FakePlayback`] was asked to do
#[derive(Debug, Default)]
pub struct PlayerLog {
    pub loaded: AtomicUsize,
    pub playing: AtomicBool,
    pub stopped: AtomicUsize,
    pub pending: Mutex<VecDeque<PlaybackEvent>>,
}

/// Player backend whose playbacks report into a shared [`PlayerLog`]
#[derive(Clone, Default)]
pub struct FakePlayer {
    pub log: Arc<PlayerLog>,
}

impl FakePlayer {
    /// Queue an event for the next `poll` of the current playback
    pub fn emit(&self, event: PlaybackEvent) {
        self.log.pending.lock().unwrap().push_back(event);
    }
}

impl PlayerBackend for FakePlayer {
    fn load(&self, _file: &SelectedFile) -> Result<Box<dyn Playback>, MediaError> {
        self.log.loaded.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePlayback {
            log: Arc::clone(&self.log),
        }))
    }
}

#[derive(Debug)]
pub struct FakePlayback {
    log: Arc<PlayerLog>,
}

impl Playback for FakePlayback {
    fn play(&mut self) -> Result<(), MediaError> {
        self.log.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&mut self) {
        self.log.playing.store(false, Ordering::SeqCst);
    }

    fn stop(&mut self) {
        self.log.playing.store(false, Ordering::SeqCst);
        self.log.stopped.fetch_add(1, Ordering::SeqCst);
    }

    fn poll(&mut self) -> PlaybackEvent {
        self.log
            .pending
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PlaybackEvent::Running)
    }

    fn latest_frame(&self) -> Option<VideoFrame> {
        None
    }
}
