//! Landing page

use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::iced_widget::{column, row};
use cosmic::widget::{button, icon, text};

use super::Msg;
use crate::core::route::Route;
use crate::fl;
use crate::platform::Platform;
use crate::widget::layout;

struct Feature {
    route: Route,
    title: String,
    description: String,
}

fn features() -> [Feature; 3] {
    [
        Feature {
            route: Route::ImageUpload,
            title: fl!("feature-image-title"),
            description: fl!("feature-image-description"),
        },
        Feature {
            route: Route::VideoUpload,
            title: fl!("feature-video-title"),
            description: fl!("feature-video-description"),
        },
        Feature {
            route: Route::Webcam,
            title: fl!("feature-webcam-title"),
            description: fl!("feature-webcam-description"),
        },
    ]
}

fn steps() -> [String; 3] {
    [fl!("step-capture"), fl!("step-analyze"), fl!("step-read")]
}

fn feature_card<'a>(feature: Feature, mobile: bool) -> Element<'a, Msg> {
    let spacing = cosmic::theme::active().cosmic().spacing;
    let content = column![
        icon::from_name(feature.route.icon_name()).size(32).icon(),
        text::title4(feature.title),
        text::body(feature.description),
        button::text(fl!("get-started"))
            .trailing_icon(icon::from_name("go-next-symbolic"))
            .on_press(Msg::Navigate(feature.route)),
    ]
    .spacing(spacing.space_xs)
    .align_x(if mobile { Alignment::Start } else { Alignment::Center });
    layout::card(content)
}

fn how_it_works<'a>() -> Element<'a, Msg> {
    let spacing = cosmic::theme::active().cosmic().spacing;
    let rows = steps().into_iter().enumerate().map(|(index, step)| -> Element<'a, Msg> {
        row![
            text::title4(format!("{}", index + 1)),
            text::body(step),
        ]
        .spacing(spacing.space_s)
        .align_y(Alignment::Center)
        .into()
    });
    column![
        text::title3(fl!("how-it-works")),
        cosmic::iced_widget::Column::with_children(rows).spacing(spacing.space_s),
    ]
    .spacing(spacing.space_m)
    .width(Length::Fill)
    .into()
}

pub fn view<'a>(platform: Platform) -> Element<'a, Msg> {
    let spacing = cosmic::theme::active().cosmic().spacing;
    let mobile = platform.is_mobile();

    let hero_actions: Element<'a, Msg> = if mobile {
        column![
            button::suggested(fl!("try-live")).on_press(Msg::Navigate(Route::Webcam)).width(Length::Fill),
            button::standard(fl!("upload-media")).on_press(Msg::Navigate(Route::ImageUpload)).width(Length::Fill),
        ]
        .spacing(spacing.space_s)
        .into()
    } else {
        row![
            button::suggested(fl!("try-live")).on_press(Msg::Navigate(Route::Webcam)),
            button::standard(fl!("upload-media")).on_press(Msg::Navigate(Route::ImageUpload)),
        ]
        .spacing(spacing.space_s)
        .into()
    };

    let hero = column![
        text::caption(fl!("hero-badge")),
        text::title1(fl!("hero-title")),
        text::body(fl!("hero-subtitle")),
        hero_actions,
    ]
    .spacing(spacing.space_s)
    .align_x(Alignment::Center)
    .width(Length::Fill);

    let cards = features().into_iter().map(|feature| feature_card(feature, mobile));
    let cards: Element<'a, Msg> = if mobile {
        cosmic::iced_widget::Column::with_children(cards)
            .spacing(spacing.space_s)
            .into()
    } else {
        cosmic::iced_widget::Row::with_children(cards)
            .spacing(spacing.space_m)
            .into()
    };

    layout::page(
        column![
            hero,
            column![text::title3(fl!("input-methods")), cards].spacing(spacing.space_m),
            how_it_works(),
        ]
        .spacing(spacing.space_xl)
        .into(),
    )
}
