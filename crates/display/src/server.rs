//! Display server detection.

use std::ffi::OsString;

/// Display server / platform family the process can present on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayServer {
    Wayland,
    X11,
    Windows,
    MacOS,
    #[default]
    Unknown,
}

impl DisplayServer {
    /// Detect from the process environment.
    pub fn detect() -> Self {
        Self::detect_with(|key| std::env::var_os(key))
    }

    /// Detect using `lookup` for environment variables.
    pub fn detect_with(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        if cfg!(target_os = "windows") {
            return Self::Windows;
        }
        if cfg!(target_os = "macos") {
            return Self::MacOS;
        }

        let set = |key: &str| lookup(key).is_some_and(|v| !v.is_empty());
        if set("WAYLAND_DISPLAY") {
            Self::Wayland
        } else if set("DISPLAY") {
            Self::X11
        } else {
            Self::Unknown
        }
    }

    /// Whether windows can be opened.
    pub fn is_interactive(self) -> bool {
        self != Self::Unknown
    }
}
