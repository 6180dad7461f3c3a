use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::iced_widget::{column, container};
use cosmic::widget::{button, text};

use super::Msg;
use crate::core::route::Route;
use crate::fl;

pub fn view(path: &str) -> Element<'_, Msg> {
    let spacing = cosmic::theme::active().cosmic().spacing;
    container(
        column![
            text::title1("404"),
            text::title4(fl!("not-found-title")),
            text::body(fl!("not-found-body", path = path)),
            button::suggested(fl!("go-home")).on_press(Msg::Navigate(Route::Home)),
        ]
        .spacing(spacing.space_s)
        .align_x(Alignment::Center),
    )
    .center(Length::Fill)
    .into()
}
