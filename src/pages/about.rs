use cosmic::Element;
use cosmic::iced_widget::column;
use cosmic::widget::text;

use super::Msg;
use crate::fl;
use crate::widget::layout;

pub fn view<'a>() -> Element<'a, Msg> {
    let spacing = cosmic::theme::active().cosmic().spacing;
    layout::page(
        column![
            layout::page_header(fl!("about-title"), fl!("about-subtitle")),
            layout::card(
                column![
                    text::body(fl!("about-mission")),
                    text::body(fl!("about-demo")),
                    text::caption(fl!("about-version", version = env!("CARGO_PKG_VERSION"))),
                ]
                .spacing(spacing.space_s)
            ),
        ]
        .spacing(spacing.space_l)
        .into(),
    )
}
