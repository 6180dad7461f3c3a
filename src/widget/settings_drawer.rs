//! Camera settings drawer shown under the webcam preview

use cosmic::Element;
use cosmic::iced::Length;
use cosmic::iced_core::Border;
use cosmic::iced_widget::{column, container, row, toggler};
use cosmic::widget::{dropdown, text};

use crate::fl;

/// Build the settings drawer element
pub fn build_settings_drawer<'a, Msg: Clone + 'static>(
    device_labels: &'a [String],
    selected_device: Option<usize>,
    on_device_select: impl Fn(usize) -> Msg + 'static,
    mirror: bool,
    on_mirror_toggle: impl Fn(bool) -> Msg + 'a,
    space_s: u16,
) -> Element<'a, Msg> {
    let device_row: Element<'a, Msg> = if device_labels.is_empty() {
        text::caption(fl!("no-cameras")).into()
    } else {
        dropdown(device_labels, selected_device, on_device_select)
            .width(Length::Fill)
            .into()
    };

    let mirror_row = row![
        text::body(fl!("mirror-video")),
        cosmic::widget::horizontal_space(),
        toggler(mirror).on_toggle(on_mirror_toggle).size(24.0),
    ]
    .spacing(space_s)
    .align_y(cosmic::iced_core::Alignment::Center)
    .width(Length::Fill);

    let drawer_content: Element<'_, Msg> = column![
        text::heading(fl!("select-camera")),
        device_row,
        mirror_row,
    ]
    .spacing(space_s)
    .padding(space_s)
    .width(Length::Fill)
    .into();

    container(drawer_content)
        .class(cosmic::theme::Container::Custom(Box::new(|theme| {
            let cosmic_theme = theme.cosmic();
            cosmic::iced::widget::container::Style {
                background: Some(cosmic::iced::Background::Color(
                    cosmic_theme.background.component.base.into(),
                )),
                text_color: Some(cosmic_theme.background.component.on.into()),
                border: Border {
                    radius: cosmic_theme.corner_radii.radius_s.into(),
                    ..Default::default()
                },
                ..Default::default()
            }
        })))
        .into()
}
