//! Navigation routes

use crate::fl;

/// A page of the application, addressed by its path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    ImageUpload,
    VideoUpload,
    Webcam,
    About,
    /// Any unknown path, kept for display
    NotFound(String),
}

impl Route {
    /// Routes listed in the navigation bar, in order
    pub const NAV: [Route; 5] = [
        Route::Home,
        Route::ImageUpload,
        Route::VideoUpload,
        Route::Webcam,
        Route::About,
    ];

    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');
        match normalized {
            "" => Route::Home,
            "/image-upload" => Route::ImageUpload,
            "/video-upload" => Route::VideoUpload,
            "/webcam" => Route::Webcam,
            "/about" => Route::About,
            _ => Route::NotFound(trimmed.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Home => "/",
            Route::ImageUpload => "/image-upload",
            Route::VideoUpload => "/video-upload",
            Route::Webcam => "/webcam",
            Route::About => "/about",
            Route::NotFound(path) => path,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Route::Home => fl!("nav-home"),
            Route::ImageUpload => fl!("nav-image"),
            Route::VideoUpload => fl!("nav-video"),
            Route::Webcam => fl!("nav-webcam"),
            Route::About => fl!("nav-about"),
            Route::NotFound(_) => fl!("not-found-title"),
        }
    }

    pub fn icon_name(&self) -> &'static str {
        match self {
            Route::Home => "go-home-symbolic",
            Route::ImageUpload => "image-x-generic-symbolic",
            Route::VideoUpload => "video-x-generic-symbolic",
            Route::Webcam => "camera-web-symbolic",
            Route::About => "help-about-symbolic",
            Route::NotFound(_) => "dialog-question-symbolic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_routes_round_trip() {
        for route in Route::NAV {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn test_trailing_slash_and_empty() {
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/webcam/"), Route::Webcam);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let route = Route::from_path("/settings");
        assert_eq!(route, Route::NotFound("/settings".into()));
        assert_eq!(route.path(), "/settings");
        assert_eq!(Route::from_path("/Webcam"), Route::NotFound("/Webcam".into()));
    }
}
