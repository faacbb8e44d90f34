use crate::camera_lab::core::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Generic,
    Training,
}

/// Entries of the top navigation, in display order.
pub const NAVIGATION: [Route; 2] = [Route::Generic, Route::Training];

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Generic => "/",
            Route::Training => "/training",
        }
    }

    pub fn nav_name(self) -> &'static str {
        match self {
            Route::Generic => "Generic Model",
            Route::Training => "Train Your Own",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Route::Generic => "Pre-Trained Generic Model",
            Route::Training => "Train Your Own Model",
        }
    }

    pub fn mode(self) -> Mode {
        match self {
            Route::Generic => Mode::Default,
            Route::Training => Mode::Training,
        }
    }

    /// Unknown paths land on the generic page.
    pub fn from_path(path: &str) -> Self {
        NAVIGATION
            .into_iter()
            .find(|route| route.path() == path)
            .unwrap_or(Route::Generic)
    }

    pub fn is_active(self, current_path: &str) -> bool {
        self.path() == current_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/"), Route::Generic);
        assert_eq!(Route::from_path("/training"), Route::Training);
        assert_eq!(Route::from_path("/nope"), Route::Generic);
    }

    #[test]
    fn test_active_entry_uses_exact_match() {
        assert!(Route::Training.is_active("/training"));
        assert!(!Route::Training.is_active("/training/"));
        assert!(!Route::Generic.is_active("/training"));
    }

    #[test]
    fn test_routes_pick_their_mode() {
        assert_eq!(Route::Generic.mode(), Mode::Default);
        assert_eq!(Route::Training.mode(), Mode::Training);
    }
}
