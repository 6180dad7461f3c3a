//! Camera device descriptors

use std::fmt;

/// Opaque platform identifier of a video input device
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A video input device as enumerated from the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub id: DeviceId,
    /// Human-readable label; may be empty when the platform withholds it
    pub label: String,
}

impl DeviceDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: DeviceId::new(id),
            label: label.into(),
        }
    }

    /// Label shown in the device picker, falling back to "Camera N" (1-based)
    pub fn display_label(&self, position: usize) -> String {
        if self.label.trim().is_empty() {
            format!("Camera {}", position + 1)
        } else {
            self.label.clone()
        }
    }
}
