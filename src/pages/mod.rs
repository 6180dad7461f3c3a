//! Page views
//!
//! Pages never run side effects themselves. `update` returns [`Effects`]:
//! notices for the shell to toast and [`Command`]s for it to turn into tasks.
//! Async results come back as an [`Event`] tagged with the page visit that
//! asked for them, so a page that was navigated away from never sees them.

pub mod about;
pub mod home;
pub mod image;
pub mod not_found;
pub mod video;
pub mod webcam;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Preference, SignBridgeConfig};
use crate::core::route::Route;
use crate::domain::{DeviceDescriptor, MediaKind, Notice, ResultEntry};
use crate::interpret::{Activation, Analyzers};
use crate::media::camera::{CameraError, OpenRequest, UnavailableCamera};
use crate::media::player::UnavailablePlayer;
use crate::media::upload::UploadRun;
use crate::media::{CameraBackend, PlayerBackend, StreamHandle};
use crate::platform::Platform;

/// Work a page asks the shell to perform
pub enum Command {
    PickFile(MediaKind),
    EnumerateDevices,
    OpenCamera(OpenRequest),
    Analyze(Activation),
    Upload(UploadRun),
    Navigate(Route),
    Remember(Preference),
}

/// Results of commands, delivered back to the page that issued them
#[derive(Debug, Clone)]
pub enum Event {
    FilePicked(Option<PathBuf>),
    DevicesListed(Result<Vec<DeviceDescriptor>, CameraError>),
    CameraOpened {
        ticket: u64,
        result: Result<StreamHandle, CameraError>,
    },
    Interpreted {
        generation: u64,
        entry: ResultEntry,
    },
    InterpretationDone {
        generation: u64,
    },
    UploadProgress {
        generation: u64,
        percent: u8,
    },
    /// Poll live frames and player state
    FrameTick,
}

/// Window file drag-and-drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropEvent {
    Hovered,
    Left,
    Dropped(PathBuf),
}

/// Output of a page update
#[derive(Default)]
pub struct Effects {
    pub notices: Vec<Notice>,
    pub commands: Vec<Command>,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn notice(notice: Notice) -> Self {
        Self {
            notices: vec![notice],
            commands: Vec::new(),
        }
    }

    pub fn command(command: Command) -> Self {
        Self {
            notices: Vec::new(),
            commands: vec![command],
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }
}

/// Backends shared by all pages
#[derive(Clone)]
pub struct Services {
    pub camera: Arc<dyn CameraBackend>,
    pub player: Arc<dyn PlayerBackend>,
    pub analyzers: Analyzers,
}

impl Services {
    /// GStreamer backends, or stand-ins reporting why they are unavailable
    pub fn detect() -> Self {
        let camera: Arc<dyn CameraBackend> = match crate::media::gst_camera::GstCameraBackend::new() {
            Ok(backend) => Arc::new(backend),
            Err(err) => {
                log::error!("Camera support unavailable: {err:#}");
                Arc::new(UnavailableCamera::new(format!("{err:#}")))
            }
        };
        let player: Arc<dyn PlayerBackend> = match crate::media::player::GstPlayerBackend::new() {
            Ok(backend) => Arc::new(backend),
            Err(err) => {
                log::error!("Video playback unavailable: {err:#}");
                Arc::new(UnavailablePlayer::new(format!("{err:#}")))
            }
        };
        Self {
            camera,
            player,
            analyzers: Analyzers::mock(),
        }
    }
}

/// Messages raised by page views
#[derive(Debug, Clone)]
pub enum Msg {
    Navigate(Route),
    Image(image::Msg),
    Video(video::Msg),
    Webcam(webcam::Msg),
}

/// The page currently shown, with its visit-scoped state
pub enum Page {
    Home,
    Image(image::ImagePage),
    Video(video::VideoPage),
    Webcam(webcam::WebcamPage),
    About,
    NotFound(String),
}

impl Page {
    /// Enter `route`, returning the page and any work it needs on entry
    pub fn open(route: &Route, services: &Services, config: &SignBridgeConfig) -> (Self, Effects) {
        match route {
            Route::Home => (Page::Home, Effects::none()),
            Route::ImageUpload => (
                Page::Image(image::ImagePage::new(services.analyzers.image.clone())),
                Effects::none(),
            ),
            Route::VideoUpload => (
                Page::Video(video::VideoPage::new(
                    services.player.clone(),
                    services.analyzers.video.clone(),
                )),
                Effects::none(),
            ),
            Route::Webcam => {
                let page = webcam::WebcamPage::new(services.analyzers.webcam.clone(), config);
                (Page::Webcam(page), Effects::command(Command::EnumerateDevices))
            }
            Route::About => (Page::About, Effects::none()),
            Route::NotFound(path) => {
                log::warn!("No page for {path}");
                (Page::NotFound(path.clone()), Effects::none())
            }
        }
    }

    pub fn update(&mut self, msg: Msg) -> Effects {
        match (self, msg) {
            (_, Msg::Navigate(route)) => Effects::command(Command::Navigate(route)),
            (Page::Image(page), Msg::Image(msg)) => page.update(msg),
            (Page::Video(page), Msg::Video(msg)) => page.update(msg),
            (Page::Webcam(page), Msg::Webcam(msg)) => page.update(msg),
            (_, msg) => {
                log::debug!("Ignoring message for another page: {msg:?}");
                Effects::none()
            }
        }
    }

    pub fn handle(&mut self, event: Event) -> Effects {
        match self {
            Page::Image(page) => page.handle(event),
            Page::Video(page) => page.handle(event),
            Page::Webcam(page) => page.handle(event),
            Page::Home | Page::About | Page::NotFound(_) => Effects::none(),
        }
    }

    pub fn handle_drop(&mut self, event: DropEvent) -> Effects {
        match self {
            Page::Image(page) => page.handle_drop(event),
            Page::Video(page) => page.handle_drop(event),
            _ => Effects::none(),
        }
    }

    /// Release everything the page acquired. Called when navigating away.
    pub fn teardown(&mut self) {
        match self {
            Page::Image(page) => page.teardown(),
            Page::Video(page) => page.teardown(),
            Page::Webcam(page) => page.teardown(),
            Page::Home | Page::About | Page::NotFound(_) => {}
        }
    }

    /// Whether the shell should send [`Event::FrameTick`]
    pub fn wants_frames(&self) -> bool {
        match self {
            Page::Video(page) => page.wants_frames(),
            Page::Webcam(page) => page.wants_frames(),
            _ => false,
        }
    }

    pub fn view(&self, platform: Platform, config: &SignBridgeConfig) -> cosmic::Element<'_, Msg> {
        match self {
            Page::Home => home::view(platform),
            Page::Image(page) => page.view(platform).map(Msg::Image),
            Page::Video(page) => page.view(platform, config.show_tips).map(Msg::Video),
            Page::Webcam(page) => page.view(platform).map(Msg::Webcam),
            Page::About => about::view(),
            Page::NotFound(path) => not_found::view(path),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::services;
    use super::*;
    use crate::media::testing::{FakeCamera, FakePlayer};

    #[test]
    fn test_open_webcam_enumerates() {
        let services = services(FakeCamera::with_devices(&["cam"]), FakePlayer::default());
        let (page, effects) = Page::open(&Route::Webcam, &services, &SignBridgeConfig::default());
        assert!(matches!(page, Page::Webcam(_)));
        assert!(matches!(effects.commands.as_slice(), [Command::EnumerateDevices]));
    }

    #[test]
    fn test_unknown_route_opens_not_found() {
        let services = services(FakeCamera::default(), FakePlayer::default());
        let route = Route::from_path("/nope");
        let (page, effects) = Page::open(&route, &services, &SignBridgeConfig::default());
        assert!(matches!(page, Page::NotFound(ref p) if p == "/nope"));
        assert!(effects.commands.is_empty());
    }

    #[test]
    fn test_navigate_message_becomes_command() {
        let mut page = Page::Home;
        let effects = page.update(Msg::Navigate(Route::Webcam));
        assert!(matches!(
            effects.commands.as_slice(),
            [Command::Navigate(Route::Webcam)]
        ));
    }

    #[test]
    fn test_messages_for_other_pages_ignored() {
        let mut page = Page::About;
        let effects = page.update(Msg::Webcam(webcam::Msg::ToggleCamera));
        assert!(effects.commands.is_empty());
        assert!(effects.notices.is_empty());
    }
}
