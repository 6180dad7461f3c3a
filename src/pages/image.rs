//! Image upload page

use std::path::Path;
use std::sync::Arc;

use cosmic::Element;
use cosmic::iced::{Alignment, ContentFit, Length};
use cosmic::iced_widget::{column, progress_bar, row};
use cosmic::widget::{button, text};

use super::{Command, DropEvent, Effects, Event};
use crate::domain::{MediaKind, Notice};
use crate::fl;
use crate::interpret::{Analyzer, InterpretationEngine, Reactivation};
use crate::media::file::{self, MediaError};
use crate::media::upload::UploadTracker;
use crate::media::{MediaSource, SelectedFile};
use crate::platform::Platform;
use crate::widget::{drop_zone, layout, results_panel};

#[derive(Debug, Clone)]
pub enum Msg {
    Browse,
    Clear,
    Analyze,
}

struct Selection {
    file: SelectedFile,
    dimensions: (u32, u32),
    preview: cosmic::widget::image::Handle,
}

pub struct ImagePage {
    selection: Option<Selection>,
    engine: InterpretationEngine,
    upload: UploadTracker,
    dragging: bool,
}

impl ImagePage {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            selection: None,
            engine: InterpretationEngine::new(analyzer),
            upload: UploadTracker::default(),
            dragging: false,
        }
    }

    pub fn update(&mut self, msg: Msg) -> Effects {
        match msg {
            Msg::Browse => Effects::command(Command::PickFile(MediaKind::Image)),
            Msg::Clear => {
                self.clear();
                Effects::none()
            }
            Msg::Analyze => self.analyze(),
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
                    Effects::notice(Notice::success(fl!("image-uploaded")))
                } else {
                    Effects::none()
                }
            }
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

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selection.as_ref().map(|s| &s.file)
    }

    pub fn results(&self) -> &[crate::domain::ResultEntry] {
        self.engine.results()
    }

    fn select(&mut self, path: &Path) -> Effects {
        let file = match file::accept(path, MediaKind::Image) {
            Ok(file) => file,
            Err(err) => {
                log::info!("Rejected image: {err}");
                return Effects::notice(Notice::error(rejection_message(&err)));
            }
        };
        let dimensions = match file::probe_image(&file) {
            Ok(dimensions) => dimensions,
            Err(err) => {
                log::warn!("Could not read {}: {err}", file.path.display());
                return Effects::notice(Notice::error(fl!("image-unreadable")));
            }
        };

        self.engine.cancel();
        let run = self.upload.begin();
        self.selection = Some(Selection {
            preview: cosmic::widget::image::Handle::from_path(&file.path),
            dimensions,
            file,
        });
        Effects::command(Command::Upload(run))
    }

    fn analyze(&mut self) -> Effects {
        if self.upload.is_uploading() {
            return Effects::none();
        }
        let Some(selection) = &self.selection else {
            return Effects::none();
        };
        let source = MediaSource::File(selection.file.clone());
        match self.engine.activate(&source, Reactivation::Restart) {
            Some(activation) => Effects::command(Command::Analyze(activation))
                .with_notice(Notice::info(fl!("analyzing-image"))),
            None => Effects::none(),
        }
    }

    fn clear(&mut self) {
        self.engine.cancel();
        self.upload.cancel();
        self.selection = None;
    }

    pub fn view(&self, platform: Platform) -> Element<'_, Msg> {
        let spacing = cosmic::theme::active().cosmic().spacing;

        let media: Element<'_, Msg> = match &self.selection {
            None => drop_zone(MediaKind::Image, self.dragging, Msg::Browse),
            Some(selection) => {
                let (width, height) = selection.dimensions;
                let mut details = column![
                    cosmic::widget::image(selection.preview.clone())
                        .content_fit(ContentFit::Contain)
                        .width(Length::Fill)
                        .height(Length::Fixed(320.0)),
                    row![
                        text::body(selection.file.name.as_str()),
                        cosmic::widget::horizontal_space(),
                        text::caption(fl!("image-dimensions", width = width, height = height)),
                    ]
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

                let analyze = button::suggested(fl!("analyze-image")).on_press_maybe(
                    (!self.upload.is_uploading() && !self.engine.is_running()).then_some(Msg::Analyze),
                );
                details = details.push(
                    row![analyze, button::standard(fl!("clear")).on_press(Msg::Clear)]
                        .spacing(spacing.space_s),
                );
                layout::card(details)
            }
        };

        let placeholder = if self.selection.is_none() {
            fl!("image-placeholder-empty")
        } else if self.engine.is_running() {
            fl!("analyzing-placeholder")
        } else {
            fl!("image-placeholder-ready")
        };

        layout::page(
            column![
                layout::page_header(fl!("image-title"), fl!("image-subtitle")),
                layout::two_pane(platform, media, results_panel(self.engine.results(), placeholder)),
            ]
            .spacing(spacing.space_l)
            .into(),
        )
    }
}

fn rejection_message(err: &MediaError) -> String {
    match err {
        MediaError::Missing(path) => fl!("file-missing", name = path.display().to_string()),
        _ => fl!("invalid-image"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_support::{quick_analyzer, take_activation, take_upload};
    use futures::StreamExt;
    use std::path::PathBuf;

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        image::RgbaImage::new(8, 6).save(&path).unwrap();
        path
    }

    fn page() -> ImagePage {
        ImagePage::new(quick_analyzer())
    }

    async fn finish_upload(page: &mut ImagePage, effects: &mut Effects) -> Vec<Notice> {
        let run = take_upload(effects).unwrap();
        let mut notices = Vec::new();
        let mut progress = run.progress;
        while let Some(percent) = progress.next().await {
            notices.extend(
                page.handle(Event::UploadProgress {
                    generation: run.generation,
                    percent,
                })
                .notices,
            );
        }
        notices
    }

    #[test]
    fn test_accepted_image_resets_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "sign.png");
        let mut page = page();

        let mut effects = page.handle(Event::FilePicked(Some(path)));
        assert!(effects.notices.is_empty());
        assert!(take_upload(&mut effects).is_some());

        let file = page.selected().unwrap();
        assert!(file.url.as_str().starts_with("file://"));
        assert!(page.results().is_empty());
    }

    #[test]
    fn test_rejected_file_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_png(dir.path(), "sign.png");
        let bad = dir.path().join("clip.mp4");
        std::fs::write(&bad, b"video").unwrap();

        let mut page = page();
        page.handle(Event::FilePicked(Some(good)));
        let before = page.selected().cloned();

        let effects = page.handle_drop(DropEvent::Dropped(bad));
        assert_eq!(effects.notices.len(), 1);
        assert!(effects.notices[0].is_error());
        assert!(effects.commands.is_empty());
        assert_eq!(page.selected().cloned(), before);
    }

    #[test]
    fn test_undecodable_image_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"garbage").unwrap();

        let mut page = page();
        let effects = page.handle(Event::FilePicked(Some(path)));
        assert_eq!(effects.notices.len(), 1);
        assert!(effects.notices[0].is_error());
        assert!(page.selected().is_none());
    }

    #[test]
    fn test_drag_hover_flag() {
        let mut page = page();
        page.handle_drop(DropEvent::Hovered);
        assert!(page.dragging);
        page.handle_drop(DropEvent::Left);
        assert!(!page.dragging);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_then_analyze() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "sign.png");
        let mut page = page();

        let mut effects = page.handle(Event::FilePicked(Some(path)));
        // Analyze is ignored until the upload finishes
        assert!(take_activation(&mut page.update(Msg::Analyze)).is_none());

        let notices = finish_upload(&mut page, &mut effects).await;
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, crate::domain::NoticeLevel::Success);

        let mut effects = page.update(Msg::Analyze);
        let activation = take_activation(&mut effects).unwrap();
        let generation = activation.generation;
        let entries: Vec<_> = activation.entries.collect().await;
        for entry in entries {
            page.handle(Event::Interpreted { generation, entry });
        }
        page.handle(Event::InterpretationDone { generation });

        let texts: Vec<_> = page.results().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "sign.png");
        let mut page = page();

        let mut effects = page.handle(Event::FilePicked(Some(path)));
        finish_upload(&mut page, &mut effects).await;
        let activation = take_activation(&mut page.update(Msg::Analyze)).unwrap();

        page.update(Msg::Clear);
        assert!(page.selected().is_none());
        let mut entries = activation.entries;
        assert!(entries.next().await.is_none());
        assert!(page.results().is_empty());
    }
}
