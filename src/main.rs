mod config;
mod core;
mod domain;
mod interpret;
mod localize;
mod media;
mod pages;
mod platform;
mod widget;

use crate::core::route::Route;

fn main() -> cosmic::iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    localize::localize();

    let initial = std::env::args()
        .nth(1)
        .map(|path| Route::from_path(&path))
        .unwrap_or(Route::Home);
    core::app::run(initial)
}
