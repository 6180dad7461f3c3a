use std::time::Duration;

use cosmic::iced::window;
use cosmic::widget::nav_bar;
use cosmic::widget::toaster::{Toast, ToastId, Toasts, toaster};
use cosmic::{
    ApplicationExt, Task, app,
    iced_futures::{Subscription, event::listen_with},
};

use crate::config::SignBridgeConfig;
use crate::core::route::Route;
use crate::domain::NoticeLevel;
use crate::media::camera::{enumerate_on_worker, open_on_worker};
use crate::media::file;
use crate::pages::{self, Command, DropEvent, Effects, Event, Page, Services};
use crate::platform::Platform;

/// Interval between frame polls while a page shows live video
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

pub(crate) fn run(initial: Route) -> cosmic::iced::Result {
    let settings = cosmic::app::Settings::default()
        .size(cosmic::iced::Size::new(1100.0, 760.0))
        .size_limits(
            cosmic::iced::Limits::NONE
                .min_width(360.0)
                .min_height(480.0),
        );
    cosmic::app::run::<App>(settings, Flags { initial })
}

pub struct Flags {
    pub initial: Route,
}

pub struct App {
    core: app::Core,
    nav: nav_bar::Model,
    route: Route,
    page: Page,
    /// Incremented on every navigation; results for older visits are dropped
    visit: u64,
    services: Services,
    config: SignBridgeConfig,
    toasts: Toasts<Msg>,
}

#[derive(Debug, Clone)]
pub enum Msg {
    Page(pages::Msg),
    /// Result of a command issued during the given visit
    Event(u64, Event),
    Drop(DropEvent),
    FrameTick,
    CloseToast(ToastId),
}

impl cosmic::Application for App {
    type Executor = cosmic::executor::Default;

    type Flags = Flags;

    type Message = Msg;

    const APP_ID: &'static str = SignBridgeConfig::ID;

    fn core(&self) -> &app::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut app::Core {
        &mut self.core
    }

    fn init(core: app::Core, flags: Self::Flags) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let mut nav = nav_bar::Model::default();
        for route in Route::NAV {
            nav.insert()
                .text(route.title())
                .icon(cosmic::widget::icon::from_name(route.icon_name()))
                .data::<Route>(route);
        }

        let mut app = Self {
            core,
            nav,
            route: Route::Home,
            page: Page::Home,
            visit: 0,
            services: Services::detect(),
            config: SignBridgeConfig::load(),
            toasts: Toasts::new(Msg::CloseToast),
        };
        let task = app.navigate(flags.initial);
        (app, task)
    }

    fn nav_model(&self) -> Option<&nav_bar::Model> {
        Some(&self.nav)
    }

    fn on_nav_select(&mut self, id: nav_bar::Id) -> Task<cosmic::Action<Self::Message>> {
        match self.nav.data::<Route>(id).cloned() {
            Some(route) => self.navigate(route),
            None => Task::none(),
        }
    }

    fn view(&self) -> cosmic::Element<'_, Self::Message> {
        let platform = Platform::detect(self.core.is_condensed(), self.config.force_mobile_layout);
        toaster(&self.toasts, self.page.view(platform, &self.config).map(Msg::Page))
    }

    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        match message {
            Msg::Page(msg) => {
                let effects = self.page.update(msg);
                self.apply(effects)
            }
            Msg::Event(visit, event) => match route_event(self.visit, visit, event) {
                Some(event) => {
                    let effects = self.page.handle(event);
                    self.apply(effects)
                }
                None => Task::none(),
            },
            Msg::Drop(event) => {
                let effects = self.page.handle_drop(event);
                self.apply(effects)
            }
            Msg::FrameTick => {
                let effects = self.page.handle(Event::FrameTick);
                self.apply(effects)
            }
            Msg::CloseToast(id) => {
                self.toasts.remove(id);
                Task::none()
            }
        }
    }

    fn subscription(&self) -> Subscription<Self::Message> {
        let mut subscriptions = vec![listen_with(|e, _, _| match e {
            cosmic::iced_core::Event::Window(window::Event::FileHovered(_)) => {
                Some(Msg::Drop(DropEvent::Hovered))
            }
            cosmic::iced_core::Event::Window(window::Event::FilesHoveredLeft) => {
                Some(Msg::Drop(DropEvent::Left))
            }
            cosmic::iced_core::Event::Window(window::Event::FileDropped(path)) => {
                Some(Msg::Drop(DropEvent::Dropped(path)))
            }
            _ => None,
        })];

        if self.page.wants_frames() {
            subscriptions.push(cosmic::iced::time::every(FRAME_INTERVAL).map(|_| Msg::FrameTick));
        }

        Subscription::batch(subscriptions)
    }
}

impl App {
    /// Leave the current page and enter `route`
    fn navigate(&mut self, route: Route) -> Task<cosmic::Action<Msg>> {
        if self.visit > 0 && route == self.route {
            return Task::none();
        }
        log::info!("Navigating to {}", route.path());
        self.page.teardown();

        let (page, effects) = Page::open(&route, &self.services, &self.config);
        self.page = page;
        self.visit += 1;

        let active = self.nav.iter().find(|id| self.nav.data::<Route>(*id) == Some(&route));
        if let Some(id) = active {
            self.nav.activate(id);
        }
        self.set_header_title(route.title());
        self.route = route;

        self.apply(effects)
    }

    fn apply(&mut self, effects: Effects) -> Task<cosmic::Action<Msg>> {
        let mut tasks = Vec::with_capacity(effects.notices.len() + effects.commands.len());
        for notice in effects.notices {
            match notice.level {
                NoticeLevel::Error => log::warn!("{}", notice.message),
                NoticeLevel::Success | NoticeLevel::Info => log::info!("{}", notice.message),
            }
            tasks.push(self.toasts.push(Toast::new(notice.message)).map(cosmic::Action::App));
        }
        for command in effects.commands {
            tasks.push(self.execute(command));
        }
        Task::batch(tasks)
    }

    fn execute(&mut self, command: Command) -> Task<cosmic::Action<Msg>> {
        let visit = self.visit;
        let reply = move |event: Event| cosmic::Action::App(Msg::Event(visit, event));

        match command {
            Command::PickFile(kind) => {
                Task::perform(file::pick(kind), move |path| reply(Event::FilePicked(path)))
            }
            Command::EnumerateDevices => Task::perform(
                enumerate_on_worker(self.services.camera.clone()),
                move |devices| reply(Event::DevicesListed(devices)),
            ),
            Command::OpenCamera(request) => Task::perform(
                open_on_worker(self.services.camera.clone(), request),
                move |(ticket, result)| reply(Event::CameraOpened { ticket, result }),
            ),
            Command::Analyze(activation) => {
                let generation = activation.generation;
                Task::run(activation.entries, move |entry| {
                    reply(Event::Interpreted { generation, entry })
                })
                .chain(Task::done(reply(Event::InterpretationDone { generation })))
            }
            Command::Upload(run) => {
                let generation = run.generation;
                Task::run(run.progress, move |percent| {
                    reply(Event::UploadProgress {
                        generation,
                        percent,
                    })
                })
            }
            Command::Navigate(route) => self.navigate(route),
            Command::Remember(preference) => {
                if self.config.apply(preference) {
                    self.config.save();
                }
                Task::none()
            }
        }
    }
}

/// Pass `event` on if it belongs to the current visit, otherwise release it
fn route_event(current: u64, visit: u64, event: Event) -> Option<Event> {
    if visit == current {
        return Some(event);
    }
    discard(event);
    None
}

/// Release anything carried by a result that arrived after its page was left
fn discard(event: Event) {
    if let Event::CameraOpened {
        result: Ok(stream), ..
    } = event
    {
        log::debug!("Releasing camera opened for a page no longer shown");
        stream.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResultEntry;
    use crate::media::CameraBackend;
    use crate::media::testing::FakeCamera;

    #[test]
    fn test_current_visit_events_pass_through() {
        let event = Event::InterpretationDone { generation: 3 };
        let routed = route_event(2, 2, event);
        assert!(matches!(routed, Some(Event::InterpretationDone { generation: 3 })));
    }

    #[test]
    fn test_earlier_visit_events_dropped() {
        let event = Event::Interpreted {
            generation: 1,
            entry: ResultEntry::new(0, "hello", Duration::from_secs(1)),
        };
        assert!(route_event(3, 2, event).is_none());
    }

    #[test]
    fn test_stale_camera_stream_stopped() {
        let camera = FakeCamera::with_devices(&["cam"]);
        let stream = camera.open(None).unwrap();
        assert_eq!(camera.live(), 1);

        let event = Event::CameraOpened {
            ticket: 1,
            result: Ok(stream.clone()),
        };
        assert!(route_event(2, 1, event).is_none());
        assert!(!stream.is_live());
        assert_eq!(camera.live(), 0);
    }

    #[test]
    fn test_current_camera_stream_kept() {
        let camera = FakeCamera::with_devices(&["cam"]);
        let stream = camera.open(None).unwrap();

        let event = Event::CameraOpened {
            ticket: 1,
            result: Ok(stream.clone()),
        };
        assert!(route_event(1, 1, event).is_some());
        assert!(stream.is_live());
        assert_eq!(camera.live(), 1);
    }
}
