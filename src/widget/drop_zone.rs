//! File drop target with a browse button

use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::iced_core::Border;
use cosmic::iced_widget::{column, container};
use cosmic::widget::{button, icon, text};

use crate::domain::MediaKind;
use crate::fl;

/// Build the drop zone shown before a file is selected.
///
/// Highlighted with the accent color while a file is dragged over the window.
pub fn drop_zone<'a, Msg: Clone + 'static>(
    kind: MediaKind,
    dragging: bool,
    on_browse: Msg,
) -> Element<'a, Msg> {
    let spacing = cosmic::theme::active().cosmic().spacing;

    let (icon_name, title, formats) = match kind {
        MediaKind::Image => (
            "image-x-generic-symbolic",
            fl!("drop-image-title"),
            fl!("drop-image-formats"),
        ),
        MediaKind::Video => (
            "video-x-generic-symbolic",
            fl!("drop-video-title"),
            fl!("drop-video-formats"),
        ),
    };

    let content = column![
        icon::from_name(icon_name).size(48).icon(),
        text::title4(title),
        text::caption(fl!("drop-or")),
        button::suggested(fl!("browse-files")).on_press(on_browse),
        text::caption(formats),
    ]
    .spacing(spacing.space_s)
    .align_x(Alignment::Center);

    container(content)
        .center(Length::Fill)
        .height(Length::Fixed(280.0))
        .padding(spacing.space_l)
        .class(cosmic::theme::Container::Custom(Box::new(move |theme| {
            let cosmic_theme = theme.cosmic();
            let border_color = if dragging {
                cosmic_theme.accent_color()
            } else {
                cosmic_theme.bg_divider()
            };
            let mut tint = cosmic_theme.accent_color();
            tint.alpha = 0.08;
            cosmic::iced::widget::container::Style {
                background: dragging.then(|| cosmic::iced::Background::Color(tint.into())),
                text_color: Some(cosmic_theme.background.on.into()),
                border: Border {
                    color: border_color.into(),
                    width: 2.0,
                    radius: cosmic_theme.corner_radii.radius_m.into(),
                },
                ..Default::default()
            }
        })))
        .into()
}
