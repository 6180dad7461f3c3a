//! Pure domain types with minimal dependencies
//!
//! Types here have no framework dependencies (cosmic, iced, gstreamer)
//! so that every layer can use them.

pub mod device;
pub mod media;
pub mod notice;
pub mod result;

pub use device::*;
pub use media::*;
pub use notice::*;
pub use result::*;
