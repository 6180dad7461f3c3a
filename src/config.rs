//! Configuration persistence for SignBridge preferences

use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};

use crate::domain::DeviceId;

/// Preferences persisted between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, CosmicConfigEntry)]
#[version = 1]
pub struct SignBridgeConfig {
    /// Mirror the live camera preview
    pub mirror_video: bool,
    /// Last selected camera device id
    pub preferred_camera: Option<String>,
    /// Always use the mobile layout
    pub force_mobile_layout: bool,
    /// Show the tips card on the video page
    #[serde(default = "default_show_tips")]
    pub show_tips: bool,
}

fn default_show_tips() -> bool {
    true
}

/// A single preference change reported by a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preference {
    Mirror(bool),
    Camera(DeviceId),
}

impl SignBridgeConfig {
    /// Configuration ID for cosmic-config
    pub const ID: &'static str = "io.github.signbridge.SignBridge";

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        match cosmic_config::Config::new(Self::ID, Self::VERSION) {
            Ok(config) => match Self::get_entry(&config) {
                Ok(entry) => entry,
                Err((errs, entry)) => {
                    log::warn!("Error loading config, using defaults: {:?}", errs);
                    entry
                }
            },
            Err(err) => {
                log::warn!("Could not create config handler: {:?}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        match cosmic_config::Config::new(Self::ID, Self::VERSION) {
            Ok(config) => {
                if let Err(err) = self.write_entry(&config) {
                    log::error!("Failed to save config: {:?}", err);
                }
            }
            Err(err) => {
                log::error!("Could not create config handler for saving: {:?}", err);
            }
        }
    }

    /// Apply a preference change. Returns `true` if anything changed.
    pub fn apply(&mut self, preference: Preference) -> bool {
        match preference {
            Preference::Mirror(mirror) => {
                let changed = self.mirror_video != mirror;
                self.mirror_video = mirror;
                changed
            }
            Preference::Camera(id) => {
                let id = id.as_str().to_string();
                let changed = self.preferred_camera.as_deref() != Some(id.as_str());
                self.preferred_camera = Some(id);
                changed
            }
        }
    }

    pub fn preferred_camera(&self) -> Option<DeviceId> {
        self.preferred_camera.as_deref().map(DeviceId::new)
    }
}

impl Default for SignBridgeConfig {
    fn default() -> Self {
        Self {
            mirror_video: true,
            preferred_camera: None,
            force_mobile_layout: false,
            show_tips: default_show_tips(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SignBridgeConfig::default();
        assert!(config.mirror_video);
        assert!(config.show_tips);
        assert!(!config.force_mobile_layout);
        assert_eq!(config.preferred_camera(), None);
    }

    #[test]
    fn test_apply_reports_changes() {
        let mut config = SignBridgeConfig::default();
        assert!(!config.apply(Preference::Mirror(true)));
        assert!(config.apply(Preference::Mirror(false)));
        assert!(!config.mirror_video);

        assert!(config.apply(Preference::Camera(DeviceId::new("/dev/video2"))));
        assert!(!config.apply(Preference::Camera(DeviceId::new("/dev/video2"))));
        assert_eq!(config.preferred_camera(), Some(DeviceId::new("/dev/video2")));
    }
}
