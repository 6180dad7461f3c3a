//! Live webcam page

use std::sync::Arc;

use cosmic::Element;
use cosmic::iced::{Alignment, ContentFit, Length};
use cosmic::iced_widget::{column, container, row};
use cosmic::widget::{button, icon, text};

use super::{Command, Effects, Event};
use crate::config::{Preference, SignBridgeConfig};
use crate::domain::{DeviceDescriptor, Notice, ResultEntry};
use crate::fl;
use crate::interpret::{Analyzer, InterpretationEngine, Reactivation};
use crate::media::camera::OpenOutcome;
use crate::media::{CameraSession, MediaSource};
use crate::platform::Platform;
use crate::widget::{build_settings_drawer, layout, results_panel};

#[derive(Debug, Clone)]
pub enum Msg {
    ToggleCamera,
    ToggleSettings,
    SelectDevice(usize),
    MirrorToggled(bool),
    RefreshAnalysis,
}

pub struct WebcamPage {
    session: CameraSession,
    engine: InterpretationEngine,
    device_labels: Vec<String>,
    frame: Option<cosmic::widget::image::Handle>,
    mirror: bool,
    show_settings: bool,
}

impl WebcamPage {
    pub fn new(analyzer: Arc<dyn Analyzer>, config: &SignBridgeConfig) -> Self {
        Self {
            session: CameraSession::new(config.preferred_camera()),
            engine: InterpretationEngine::new(analyzer),
            device_labels: Vec::new(),
            frame: None,
            mirror: config.mirror_video,
            show_settings: false,
        }
    }

    pub fn update(&mut self, msg: Msg) -> Effects {
        match msg {
            Msg::ToggleCamera => {
                if self.session.is_active() || self.session.is_opening() {
                    self.stop();
                    Effects::none()
                } else {
                    match self.session.request_start() {
                        Some(request) => Effects::command(Command::OpenCamera(request)),
                        None => Effects::none(),
                    }
                }
            }
            Msg::ToggleSettings => {
                self.show_settings = !self.show_settings;
                Effects::none()
            }
            Msg::SelectDevice(index) => {
                let Some(device) = self.session.devices().get(index) else {
                    return Effects::none();
                };
                let id = device.id.clone();
                if self.session.selected() == Some(&id) {
                    return Effects::none();
                }

                let mut effects = Effects::command(Command::Remember(Preference::Camera(id.clone())));
                if let Some(request) = self.session.select_device(id) {
                    self.frame = None;
                    effects = effects.with_command(Command::OpenCamera(request));
                }
                effects
            }
            Msg::MirrorToggled(mirror) => {
                self.mirror = mirror;
                Effects::command(Command::Remember(Preference::Mirror(mirror)))
            }
            Msg::RefreshAnalysis => self.start_analysis(),
        }
    }

    pub fn handle(&mut self, event: Event) -> Effects {
        match event {
            Event::DevicesListed(Ok(devices)) => {
                log::debug!("Found {} camera(s)", devices.len());
                self.device_labels = labels(&devices);
                self.session.set_devices(devices);
                Effects::none()
            }
            Event::DevicesListed(Err(err)) => {
                log::warn!("Camera enumeration failed: {err}");
                Effects::notice(Notice::error(fl!("camera-devices-failed")))
            }
            Event::CameraOpened { ticket, result } => self.opened(ticket, result),
            Event::Interpreted { generation, entry } => {
                self.engine.accept(generation, entry);
                Effects::none()
            }
            Event::InterpretationDone { generation } => {
                self.engine.finish(generation);
                Effects::none()
            }
            Event::FrameTick => {
                if let Some(err) = self.session.poll() {
                    log::warn!("Camera lost: {err}");
                    self.engine.cancel();
                    self.frame = None;
                    return Effects::notice(Notice::error(fl!("camera-lost")));
                }
                if let Some(frame) = self.session.stream().and_then(|s| s.latest_frame()) {
                    let frame = if self.mirror { frame.mirrored() } else { frame };
                    self.frame = Some(frame.handle());
                }
                Effects::none()
            }
            _ => Effects::none(),
        }
    }

    pub fn teardown(&mut self) {
        self.stop();
        self.show_settings = false;
    }

    pub fn wants_frames(&self) -> bool {
        self.session.is_active()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    pub fn results(&self) -> &[ResultEntry] {
        self.engine.results()
    }

    fn opened(
        &mut self,
        ticket: u64,
        result: Result<crate::media::StreamHandle, crate::media::CameraError>,
    ) -> Effects {
        match self.session.complete(ticket, result) {
            OpenOutcome::Started => self
                .start_analysis()
                .with_notice(Notice::success(fl!("camera-started"))),
            OpenOutcome::Switched => Effects::notice(Notice::success(fl!("camera-switched"))),
            OpenOutcome::Failed(err) => {
                log::warn!("Could not start camera: {err}");
                self.engine.cancel();
                Effects::notice(Notice::error(fl!("camera-access-failed")))
            }
            OpenOutcome::SwitchFailed(err) => {
                log::warn!("Could not switch camera: {err}");
                self.engine.cancel();
                self.frame = None;
                Effects::notice(Notice::error(fl!("camera-switch-failed")))
            }
            OpenOutcome::Stale => Effects::none(),
        }
    }

    fn start_analysis(&mut self) -> Effects {
        let Some(stream) = self.session.stream().cloned() else {
            return Effects::none();
        };
        match self
            .engine
            .activate(&MediaSource::Camera(stream), Reactivation::Restart)
        {
            Some(activation) => Effects::command(Command::Analyze(activation)),
            None => Effects::none(),
        }
    }

    fn stop(&mut self) {
        self.session.stop();
        self.engine.cancel();
        self.frame = None;
    }

    pub fn view(&self, platform: Platform) -> Element<'_, Msg> {
        let spacing = cosmic::theme::active().cosmic().spacing;
        let active = self.session.is_active();

        let preview: Element<'_, Msg> = match (&self.frame, active) {
            (Some(frame), true) => cosmic::widget::image(frame.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            (_, true) => text::body(fl!("camera-waiting")).into(),
            (_, false) if self.session.is_opening() => text::body(fl!("camera-starting")).into(),
            (_, false) => column![
                icon::from_name("camera-disabled-symbolic").size(48).icon(),
                text::body(fl!("camera-inactive")),
                button::suggested(fl!("start-camera")).on_press(Msg::ToggleCamera),
            ]
            .spacing(spacing.space_s)
            .align_x(Alignment::Center)
            .into(),
        };
        let preview = container(preview)
            .center_x(Length::Fill)
            .center_y(Length::Fixed(360.0))
            .class(cosmic::theme::Container::Dialog);

        let mut controls = row![].spacing(spacing.space_s).align_y(Alignment::Center);
        if active {
            controls = controls.push(button::destructive(fl!("stop-camera")).on_press(Msg::ToggleCamera));
        }
        controls = controls
            .push(cosmic::widget::horizontal_space())
            .push(
                button::icon(icon::from_name("view-refresh-symbolic"))
                    .tooltip(fl!("refresh-analysis"))
                    .on_press_maybe(active.then_some(Msg::RefreshAnalysis)),
            )
            .push(
                button::icon(icon::from_name("preferences-system-symbolic"))
                    .tooltip(fl!("camera-settings"))
                    .on_press(Msg::ToggleSettings),
            );

        let mut media = column![preview, controls].spacing(spacing.space_s);
        if self.show_settings {
            media = media.push(build_settings_drawer(
                &self.device_labels,
                self.session.selected_index(),
                Msg::SelectDevice,
                self.mirror,
                Msg::MirrorToggled,
                spacing.space_s,
            ));
        }

        let placeholder = if active {
            fl!("webcam-placeholder-active")
        } else {
            fl!("webcam-placeholder-inactive")
        };

        layout::page(
            column![
                layout::page_header(fl!("webcam-title"), fl!("webcam-subtitle")),
                layout::two_pane(
                    platform,
                    layout::card(media),
                    results_panel(self.engine.results(), placeholder),
                ),
            ]
            .spacing(spacing.space_l)
            .into(),
        )
    }
}

fn labels(devices: &[DeviceDescriptor]) -> Vec<String> {
    devices
        .iter()
        .enumerate()
        .map(|(position, device)| device.display_label(position))
        .collect()
}
