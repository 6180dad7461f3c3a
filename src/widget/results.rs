//! Interpretation results panel

use cosmic::Element;
use cosmic::iced::Length;
use cosmic::iced_widget::{column, container, scrollable};
use cosmic::widget::{icon, text};

use crate::domain::ResultEntry;
use crate::fl;

/// Card listing interpreted lines, or `placeholder` while there are none
pub fn results_panel<'a, Msg: 'static>(
    results: &'a [ResultEntry],
    placeholder: String,
) -> Element<'a, Msg> {
    let spacing = cosmic::theme::active().cosmic().spacing;

    let body: Element<'a, Msg> = if results.is_empty() {
        container(
            column![
                icon::from_name("dialog-information-symbolic").size(32).icon(),
                text::body(placeholder),
            ]
            .spacing(spacing.space_xs)
            .align_x(cosmic::iced::Alignment::Center),
        )
        .center(Length::Fill)
        .into()
    } else {
        let lines = results.iter().map(|entry| -> Element<'a, Msg> {
            container(text::body(entry.text.as_str()))
                .padding(spacing.space_xs)
                .width(Length::Fill)
                .class(cosmic::theme::Container::Primary)
                .into()
        });
        scrollable(
            cosmic::iced_widget::Column::with_children(lines)
                .spacing(spacing.space_xxs)
                .width(Length::Fill),
        )
        .height(Length::Fill)
        .into()
    };

    container(
        column![text::title4(fl!("results-title")), body]
            .spacing(spacing.space_s)
            .height(Length::Fill),
    )
    .padding(spacing.space_m)
    .width(Length::Fill)
    .height(Length::Fixed(320.0))
    .class(cosmic::theme::Container::Card)
    .into()
}
