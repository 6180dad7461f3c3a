//! Live camera sessions
//!
//! A [`CameraSession`] owns at most one live stream. Opening is asynchronous:
//! a start request hands out an [`OpenRequest`] carrying a ticket, and the
//! result is applied only while that ticket is still current. Streams that
//! arrive late are stopped on the spot so no hardware stays locked.

use std::fmt;
use std::sync::Arc;

use crate::domain::{DeviceDescriptor, DeviceId};
use crate::media::VideoFrame;

/// Why a camera could not be enumerated or opened
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("camera access was denied")]
    PermissionDenied,
    #[error("camera is in use by another application")]
    Busy,
    #[error("camera {0} was not found")]
    NotFound(DeviceId),
    #[error("camera backend error: {0}")]
    Backend(String),
}

/// Platform camera access
pub trait CameraBackend: Send + Sync {
    /// List the available video input devices
    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>, CameraError>;

    /// Open a stream, constrained to exactly `device` when given
    fn open(&self, device: Option<&DeviceId>) -> Result<StreamHandle, CameraError>;
}

/// A running camera stream.
///
/// `stop` must release the device and be safe to call more than once.
pub trait CameraStream: Send + Sync + fmt::Debug {
    fn device(&self) -> Option<&DeviceId>;
    /// Newest frame since the last call, if any
    fn latest_frame(&self) -> Option<VideoFrame>;
    fn stop(&self);
    fn is_live(&self) -> bool;
    /// Error raised by the device since it went live, if any
    fn poll(&self) -> Option<CameraError>;
}

pub type StreamHandle = Arc<dyn CameraStream>;

/// A pending stream acquisition, to be run off the UI thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub ticket: u64,
    pub device: Option<DeviceId>,
    /// Whether this replaces a stream that was live (device switch)
    pub switching: bool,
}

/// Result of applying a finished open to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Started,
    Switched,
    Failed(CameraError),
    SwitchFailed(CameraError),
    /// The request was superseded or cancelled; any stream was released
    Stale,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Inactive,
    Opening {
        ticket: u64,
        switching: bool,
    },
    Active(StreamHandle),
}

/// Camera lifecycle for one page visit
#[derive(Debug, Default)]
pub struct CameraSession {
    state: State,
    next_ticket: u64,
    selected: Option<DeviceId>,
    devices: Vec<DeviceDescriptor>,
}

impl CameraSession {
    pub fn new(preferred: Option<DeviceId>) -> Self {
        Self {
            state: State::Inactive,
            next_ticket: 0,
            selected: preferred,
            devices: Vec::new(),
        }
    }

    /// Record the enumerated devices.
    ///
    /// Keeps the current selection if it is still present, otherwise selects
    /// the first device.
    pub fn set_devices(&mut self, devices: Vec<DeviceDescriptor>) {
        let keep = self
            .selected
            .as_ref()
            .is_some_and(|id| devices.iter().any(|d| &d.id == id));
        if !keep {
            self.selected = devices.first().map(|d| d.id.clone());
        }
        self.devices = devices;
    }

    pub fn devices(&self) -> &[DeviceDescriptor] {
        &self.devices
    }

    pub fn selected(&self) -> Option<&DeviceId> {
        self.selected.as_ref()
    }

    /// Index of the selected device in [`Self::devices`]
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.devices.iter().position(|d| &d.id == selected)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active(_))
    }

    pub fn is_opening(&self) -> bool {
        matches!(self.state, State::Opening { .. })
    }

    pub fn stream(&self) -> Option<&StreamHandle> {
        match &self.state {
            State::Active(stream) => Some(stream),
            _ => None,
        }
    }

    /// Begin acquiring a stream for the selected device.
    ///
    /// Returns `None` when a stream is already live or being opened.
    pub fn request_start(&mut self) -> Option<OpenRequest> {
        if !matches!(self.state, State::Inactive) {
            return None;
        }
        Some(self.issue(false))
    }

    /// Change the selected device.
    ///
    /// A live stream is stopped before the replacement is requested, so two
    /// streams are never open at once. An open in flight is superseded.
    pub fn select_device(&mut self, id: DeviceId) -> Option<OpenRequest> {
        self.selected = Some(id);
        match std::mem::take(&mut self.state) {
            State::Inactive => None,
            State::Opening { switching, .. } => Some(self.issue(switching)),
            State::Active(stream) => {
                log::info!("Switching camera, releasing {:?}", stream.device());
                stream.stop();
                Some(self.issue(true))
            }
        }
    }

    /// Apply the result of an [`OpenRequest`]
    pub fn complete(
        &mut self,
        ticket: u64,
        result: Result<StreamHandle, CameraError>,
    ) -> OpenOutcome {
        let current = match self.state {
            State::Opening {
                ticket: pending,
                switching,
            } if pending == ticket => Some(switching),
            _ => None,
        };

        let Some(switching) = current else {
            if let Ok(stream) = result {
                log::debug!("Discarding stale camera stream (ticket {ticket})");
                stream.stop();
            }
            return OpenOutcome::Stale;
        };

        match result {
            Ok(stream) => {
                log::info!("Camera stream live on {:?}", stream.device());
                self.state = State::Active(stream);
                if switching {
                    OpenOutcome::Switched
                } else {
                    OpenOutcome::Started
                }
            }
            Err(err) => {
                log::warn!("Camera open failed: {err}");
                self.state = State::Inactive;
                if switching {
                    OpenOutcome::SwitchFailed(err)
                } else {
                    OpenOutcome::Failed(err)
                }
            }
        }
    }

    /// Check the live stream for a device failure.
    ///
    /// A failed stream is released and the session goes inactive.
    pub fn poll(&mut self) -> Option<CameraError> {
        let State::Active(stream) = &self.state else {
            return None;
        };
        let err = stream.poll()?;
        log::warn!("Camera stream failed on {:?}: {err}", stream.device());
        stream.stop();
        self.state = State::Inactive;
        Some(err)
    }

    /// Release the live stream or cancel a pending open.
    ///
    /// Returns `true` if anything was released or cancelled.
    pub fn stop(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            State::Inactive => false,
            State::Opening { ticket, .. } => {
                log::debug!("Cancelled pending camera open (ticket {ticket})");
                true
            }
            State::Active(stream) => {
                stream.stop();
                log::info!("Camera stopped");
                true
            }
        }
    }

    fn issue(&mut self, switching: bool) -> OpenRequest {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.state = State::Opening { ticket, switching };
        OpenRequest {
            ticket,
            device: self.selected.clone(),
            switching,
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run [`CameraBackend::open`] on a blocking worker
pub async fn open_on_worker(
    backend: Arc<dyn CameraBackend>,
    request: OpenRequest,
) -> (u64, Result<StreamHandle, CameraError>) {
    let ticket = request.ticket;
    let result = tokio::task::spawn_blocking(move || backend.open(request.device.as_ref()))
        .await
        .unwrap_or_else(|err| Err(CameraError::Backend(err.to_string())));
    (ticket, result)
}

/// Run [`CameraBackend::enumerate`] on a blocking worker
pub async fn enumerate_on_worker(
    backend: Arc<dyn CameraBackend>,
) -> Result<Vec<DeviceDescriptor>, CameraError> {
    tokio::task::spawn_blocking(move || backend.enumerate())
        .await
        .unwrap_or_else(|err| Err(CameraError::Backend(err.to_string())))
}

/// Backend used when the platform camera stack failed to initialise
pub struct UnavailableCamera {
    reason: String,
}

impl UnavailableCamera {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl CameraBackend for UnavailableCamera {
    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>, CameraError> {
        Err(CameraError::Backend(self.reason.clone()))
    }

    fn open(&self, _device: Option<&DeviceId>) -> Result<StreamHandle, CameraError> {
        Err(CameraError::Backend(self.reason.clone()))
    }
}
