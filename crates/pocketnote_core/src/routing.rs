//! Launch routing decision and navigation primitives.
//!
//! Pure functions with no UI framework dependency. The UI only needs two
//! navigation primitives: replace the current screen, or go back.

/// Top-level destinations the core can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// One-time profile setup flow.
    ProfileSetup,
    /// Main note-browsing surface.
    Main,
}

impl Route {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProfileSetup => "profile_setup",
            Self::Main => "main",
        }
    }
}

/// Navigation primitive requested from the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// Replace the current screen so back navigation cannot return to it.
    Replace(Route),
    Back,
}

/// Route chosen on app launch.
pub fn launch_route(profile_present: bool) -> Route {
    if profile_present {
        Route::Main
    } else {
        Route::ProfileSetup
    }
}

pub fn route_after_setup() -> NavAction {
    NavAction::Replace(Route::Main)
}

pub fn route_after_logout() -> NavAction {
    NavAction::Replace(Route::ProfileSetup)
}

/// After the editor saves, return to whatever opened it.
pub fn route_after_note_saved() -> NavAction {
    NavAction::Back
}
