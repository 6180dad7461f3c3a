//! Video upload page

use std::path::Path;
use std::sync::Arc;

use cosmic::Element;
use cosmic::iced::{Alignment, ContentFit, Length};
use cosmic::iced_widget::{column, container, progress_bar, row};
use cosmic::widget::{button, icon, text};

use super::{Command, DropEvent, Effects, Event};
use crate::domain::{MediaKind, Notice, ResultEntry};
use crate::fl;
use crate::interpret::{Analyzer, InterpretationEngine, Reactivation};
use crate::media::file::{self, MediaError};
use crate::media::upload::UploadTracker;
use crate::media::{MediaSource, Playback, PlaybackEvent, PlayerBackend, SelectedFile};
use crate::platform::Platform;
use crate::widget::{drop_zone, layout, results_panel};

#[derive(Debug, Clone)]
pub enum Msg {
    Browse,
    Clear,
    TogglePlay,
}

pub struct VideoPage {
    player: Arc<dyn PlayerBackend>,
    file: Option<SelectedFile>,
    playback: Option<Box<dyn Playback>>,
    frame: Option<cosmic::widget::image::Handle>,
    playing: bool,
    dragging: bool,
    upload: UploadTracker,
    engine: InterpretationEngine,
}

impl VideoPage {
    pub fn new(player: Arc<dyn PlayerBackend>, analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            player,
            file: None,
            playback: None,
            frame: None,
            playing: false,
            dragging: false,
            upload: UploadTracker::default(),
            engine: InterpretationEngine::new(analyzer),
        }
    }

    pub fn update(&mut self, msg: Msg) -> Effects {
        match msg {
            Msg::Browse => Effects::command(Command::PickFile(MediaKind::Video)),
            Msg::Clear => {
                self.clear();
                Effects::none()
            }
            Msg::TogglePlay => self.toggle_play(),
        }
    }

    pub fn handle(&mut self, event: Event) -> Effects {
        match event {
            Event::FilePicked(Some(path)) => self.select(&path),
            Event::Interpreted { generation, entry } => {
                self.engine.accept(generation, entry);
                Effects::none()
            }
            Event::InterpretationDone { generation } => {
                self.engine.finish(generation);
                Effects::none()
            }
            Event::UploadProgress {
                generation,
                percent,
            } => {
                if self.upload.advance(generation, percent) {
                    Effects::notice(Notice::success(fl!("video-uploaded")))
                } else {
                    Effects::none()
                }
            }
            Event::FrameTick => self.poll_player(),
            _ => Effects::none(),
        }
    }

    pub fn handle_drop(&mut self, event: DropEvent) -> Effects {
        match event {
            DropEvent::Hovered => self.dragging = true,
            DropEvent::Left => self.dragging = false,
            DropEvent::Dropped(path) => {
                self.dragging = false;
                return self.select(&path);
            }
        }
        Effects::none()
    }

    pub fn teardown(&mut self) {
        self.clear();
        self.dragging = false;
    }

    pub fn wants_frames(&self) -> bool {
        self.playback.is_some()
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn results(&self) -> &[ResultEntry] {
        self.engine.results()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    fn select(&mut self, path: &Path) -> Effects {
        let file = match file::accept(path, MediaKind::Video) {
            Ok(file) => file,
            Err(err) => {
                log::info!("Rejected video: {err}");
                return Effects::notice(Notice::error(rejection_message(&err)));
            }
        };
        let playback = match self.player.load(&file) {
            Ok(playback) => playback,
            Err(err) => {
                log::warn!("Could not load {}: {err}", file.path.display());
                return Effects::notice(Notice::error(fl!("playback-failed")));
            }
        };

        self.clear();
        let run = self.upload.begin();
        self.file = Some(file);
        self.playback = Some(playback);
        Effects::command(Command::Upload(run))
    }

    fn toggle_play(&mut self) -> Effects {
        let Some(playback) = self.playback.as_mut() else {
            return Effects::none();
        };

        if self.playing {
            playback.pause();
            self.playing = false;
            return Effects::none();
        }

        if let Err(err) = playback.play() {
            log::warn!("Playback failed to start: {err}");
            return Effects::notice(Notice::error(fl!("playback-failed")));
        }
        self.playing = true;

        let Some(file) = self.file.clone() else {
            return Effects::none();
        };
        match self
            .engine
            .activate(&MediaSource::File(file), Reactivation::KeepExisting)
        {
            Some(activation) => Effects::command(Command::Analyze(activation))
                .with_notice(Notice::info(fl!("analyzing-video"))),
            None => Effects::none(),
        }
    }

    fn poll_player(&mut self) -> Effects {
        let Some(playback) = self.playback.as_mut() else {
            return Effects::none();
        };

        let effects = match playback.poll() {
            PlaybackEvent::Running => Effects::none(),
            PlaybackEvent::Ended => {
                log::debug!("Video reached the end");
                self.playing = false;
                Effects::none()
            }
            PlaybackEvent::Failed(reason) => {
                log::error!("Playback error: {reason}");
                self.playing = false;
                Effects::notice(Notice::error(fl!("playback-failed")))
            }
        };

        if let Some(frame) = playback.latest_frame() {
            self.frame = Some(frame.handle());
        }
        effects
    }

    fn clear(&mut self) {
        if let Some(mut playback) = self.playback.take() {
            playback.stop();
        }
        self.engine.cancel();
        self.upload.cancel();
        self.file = None;
        self.frame = None;
        self.playing = false;
    }

    pub fn view(&self, platform: Platform, show_tips: bool) -> Element<'_, Msg> {
        let spacing = cosmic::theme::active().cosmic().spacing;

        let media: Element<'_, Msg> = match &self.file {
            None => drop_zone(MediaKind::Video, self.dragging, Msg::Browse),
            Some(file) => {
                let screen: Element<'_, Msg> = match &self.frame {
                    Some(frame) => cosmic::widget::image(frame.clone())
                        .content_fit(ContentFit::Contain)
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .into(),
                    None => icon::from_name("video-x-generic-symbolic").size(64).icon().into(),
                };
                let screen = container(screen)
                    .center_x(Length::Fill)
                    .center_y(Length::Fixed(320.0))
                    .class(cosmic::theme::Container::Dialog);

                let (play_icon, play_label) = if self.playing {
                    ("media-playback-pause-symbolic", fl!("pause"))
                } else {
                    ("media-playback-start-symbolic", fl!("play"))
                };

                let mut details = column![
                    screen,
                    row![
                        text::body(file.name.as_str()),
                        cosmic::widget::horizontal_space(),
                        button::icon(icon::from_name(play_icon))
                            .tooltip(play_label)
                            .on_press(Msg::TogglePlay),
                        button::standard(fl!("clear")).on_press(Msg::Clear),
                    ]
                    .spacing(spacing.space_s)
                    .align_y(Alignment::Center),
                ]
                .spacing(spacing.space_s);

                if self.upload.is_uploading() {
                    details = details.push(
                        column![
                            text::caption(fl!("uploading", percent = self.upload.progress())),
                            progress_bar(0.0..=100.0, f32::from(self.upload.progress())),
                        ]
                        .spacing(spacing.space_xxs),
                    );
                }
                layout::card(details)
            }
        };

        let mut side = column![results_panel(
            self.engine.results(),
            fl!("video-placeholder")
        )]
        .spacing(spacing.space_m);

        if show_tips {
            side = side.push(layout::card(
                column![
                    text::heading(fl!("tips-title")),
                    text::caption(fl!("tip-lighting")),
                    text::caption(fl!("tip-framing")),
                    text::caption(fl!("tip-pace")),
                ]
                .spacing(spacing.space_xxs),
            ));
        }

        layout::page(
            column![
                layout::page_header(fl!("video-title"), fl!("video-subtitle")),
                layout::two_pane(platform, media, side.into()),
            ]
            .spacing(spacing.space_l)
            .into(),
        )
    }
}

fn rejection_message(err: &MediaError) -> String {
    match err {
        MediaError::Missing(path) => fl!("file-missing", name = path.display().to_string()),
        _ => fl!("invalid-video"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::testing::FakePlayer;
    use crate::pages::test_support::{quick_analyzer, take_activation, take_upload};
    use futures::StreamExt;
    use std::path::PathBuf;
    use std::sync::atomic::Ordering;

    fn write_video(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"fake video bytes").unwrap();
        path
    }

    fn page(player: &FakePlayer) -> VideoPage {
        VideoPage::new(Arc::new(player.clone()), quick_analyzer())
    }

    async fn drain(page: &mut VideoPage, effects: &mut Effects) {
        let activation = take_activation(effects).unwrap();
        let generation = activation.generation;
        let entries: Vec<_> = activation.entries.collect().await;
        for entry in entries {
            page.handle(Event::Interpreted { generation, entry });
        }
        page.handle(Event::InterpretationDone { generation });
    }

    #[test]
    fn test_accepted_video_loads_and_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let player = FakePlayer::default();
        let mut page = page(&player);

        let mut effects = page.handle(Event::FilePicked(Some(write_video(dir.path(), "hello.mp4"))));
        assert!(effects.notices.is_empty());
        assert!(take_upload(&mut effects).is_some());
        assert_eq!(page.selected().unwrap().mime.as_str(), "video/mp4");
        assert!(page.results().is_empty());
        assert!(page.wants_frames());
        assert_eq!(player.log.loaded.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rejected_image_notifies_once() {
        let dir = tempfile::tempdir().unwrap();
        let player = FakePlayer::default();
        let mut page = page(&player);
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"jpeg").unwrap();

        let effects = page.handle_drop(DropEvent::Dropped(path));
        assert_eq!(effects.notices.len(), 1);
        assert!(effects.notices[0].is_error());
        assert!(page.selected().is_none());
        assert_eq!(player.log.loaded.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_starts_analysis_once() {
        let dir = tempfile::tempdir().unwrap();
        let player = FakePlayer::default();
        let mut page = page(&player);
        page.handle(Event::FilePicked(Some(write_video(dir.path(), "hello.webm"))));

        let mut effects = page.update(Msg::TogglePlay);
        assert!(page.is_playing());
        assert_eq!(effects.notices.len(), 1);
        drain(&mut page, &mut effects).await;
        assert_eq!(page.results().len(), 3);

        // Pause and play again: results already present, nothing restarts
        page.update(Msg::TogglePlay);
        assert!(!page.is_playing());
        let effects = page.update(Msg::TogglePlay);
        assert!(page.is_playing());
        assert!(effects.commands.is_empty());
        assert!(effects.notices.is_empty());
        assert_eq!(page.results().len(), 3);
    }

    #[test]
    fn test_end_of_stream_resets_playing() {
        let dir = tempfile::tempdir().unwrap();
        let player = FakePlayer::default();
        let mut page = page(&player);
        page.handle(Event::FilePicked(Some(write_video(dir.path(), "hello.mkv"))));
        page.update(Msg::TogglePlay);

        player.emit(PlaybackEvent::Ended);
        page.handle(Event::FrameTick);
        assert!(!page.is_playing());
    }

    #[test]
    fn test_playback_failure_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let player = FakePlayer::default();
        let mut page = page(&player);
        page.handle(Event::FilePicked(Some(write_video(dir.path(), "hello.mov"))));
        page.update(Msg::TogglePlay);

        player.emit(PlaybackEvent::Failed("decoder missing".into()));
        let effects = page.handle(Event::FrameTick);
        assert_eq!(effects.notices.len(), 1);
        assert!(!page.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_stops_everything() {
        let dir = tempfile::tempdir().unwrap();
        let player = FakePlayer::default();
        let mut page = page(&player);
        let mut effects = page.handle(Event::FilePicked(Some(write_video(dir.path(), "a.mp4"))));
        let upload = take_upload(&mut effects).unwrap();

        let activation = take_activation(&mut page.update(Msg::TogglePlay)).unwrap();
        page.update(Msg::Clear);

        assert!(page.selected().is_none());
        assert!(!page.is_playing());
        assert!(!page.wants_frames());
        assert_eq!(player.log.stopped.load(Ordering::SeqCst), 1);

        let mut entries = activation.entries;
        assert!(entries.next().await.is_none());
        let mut progress = upload.progress;
        assert!(progress.next().await.is_none());
        assert!(page.results().is_empty());
    }

    #[test]
    fn test_teardown_releases_player() {
        let dir = tempfile::tempdir().unwrap();
        let player = FakePlayer::default();
        let mut page = page(&player);
        page.handle(Event::FilePicked(Some(write_video(dir.path(), "a.mp4"))));
        page.update(Msg::TogglePlay);

        page.teardown();
        assert!(!player.log.playing.load(Ordering::SeqCst));
        assert_eq!(player.log.stopped.load(Ordering::SeqCst), 1);
    }
}
