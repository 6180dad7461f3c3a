//! Device class detection
//!
//! Views branch on [`DeviceClass`] instead of querying window geometry
//! themselves.

/// Environment variable forcing a device class (`mobile` or `desktop`)
pub const PLATFORM_ENV: &str = "SIGNBRIDGE_PLATFORM";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceClass {
    Mobile,
    #[default]
    Desktop,
}

impl DeviceClass {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mobile" => Some(DeviceClass::Mobile),
            "desktop" => Some(DeviceClass::Desktop),
            _ => None,
        }
    }
}

/// Capability flags consumed by views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Platform {
    pub class: DeviceClass,
}

impl Platform {
    /// Resolve the device class.
    ///
    /// Precedence: environment override, then the config flag, then the
    /// shell's condensed-window state.
    pub fn resolve(env_override: Option<&str>, condensed: bool, force_mobile: bool) -> Self {
        let class = env_override
            .and_then(DeviceClass::parse)
            .unwrap_or(if condensed || force_mobile {
                DeviceClass::Mobile
            } else {
                DeviceClass::Desktop
            });
        Self { class }
    }

    /// Resolve using the process environment
    pub fn detect(condensed: bool, force_mobile: bool) -> Self {
        let env = std::env::var(PLATFORM_ENV).ok();
        Self::resolve(env.as_deref(), condensed, force_mobile)
    }

    pub fn is_mobile(self) -> bool {
        self.class == DeviceClass::Mobile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condensed_window_is_mobile() {
        assert!(Platform::resolve(None, true, false).is_mobile());
        assert!(!Platform::resolve(None, false, false).is_mobile());
    }

    #[test]
    fn test_config_forces_mobile() {
        assert!(Platform::resolve(None, false, true).is_mobile());
    }

    #[test]
    fn test_env_override_wins() {
        assert!(!Platform::resolve(Some("Desktop"), true, true).is_mobile());
        assert!(Platform::resolve(Some("mobile"), false, false).is_mobile());
        // Unrecognised values fall through
        assert!(Platform::resolve(Some("tablet"), true, false).is_mobile());
    }
}
