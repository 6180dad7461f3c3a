//! Reusable view pieces

pub mod drop_zone;
pub mod layout;
pub mod results;
pub mod settings_drawer;

pub use drop_zone::drop_zone;
pub use results::results_panel;
pub use settings_drawer::build_settings_drawer;
