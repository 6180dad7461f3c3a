//! Page scaffolding shared by all views

use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::iced_widget::{column, container, row, scrollable};
use cosmic::widget::text;

use crate::platform::Platform;

/// Centered page title and subtitle
pub fn page_header<'a, Msg: 'static>(title: String, subtitle: String) -> Element<'a, Msg> {
    let spacing = cosmic::theme::active().cosmic().spacing;
    column![text::title2(title), text::body(subtitle)]
        .spacing(spacing.space_xxs)
        .align_x(Alignment::Center)
        .width(Length::Fill)
        .into()
}

/// Media on the left and results on the right; stacked on mobile
pub fn two_pane<'a, Msg: 'static>(
    platform: Platform,
    media: Element<'a, Msg>,
    side: Element<'a, Msg>,
) -> Element<'a, Msg> {
    let spacing = cosmic::theme::active().cosmic().spacing;
    if platform.is_mobile() {
        column![media, side]
            .spacing(spacing.space_m)
            .width(Length::Fill)
            .into()
    } else {
        row![
            container(media).width(Length::FillPortion(3)),
            container(side).width(Length::FillPortion(2)),
        ]
        .spacing(spacing.space_m)
        .width(Length::Fill)
        .into()
    }
}

/// Scrollable page body with a maximum content width
pub fn page<'a, Msg: 'static>(content: Element<'a, Msg>) -> Element<'a, Msg> {
    let spacing = cosmic::theme::active().cosmic().spacing;
    scrollable(
        container(container(content).max_width(1024.0))
            .center_x(Length::Fill)
            .padding(spacing.space_l),
    )
    .height(Length::Fill)
    .into()
}

/// Card container used for media and side panels
pub fn card<'a, Msg: 'static>(content: impl Into<Element<'a, Msg>>) -> Element<'a, Msg> {
    let spacing = cosmic::theme::active().cosmic().spacing;
    container(content)
        .padding(spacing.space_m)
        .width(Length::Fill)
        .class(cosmic::theme::Container::Card)
        .into()
}
