//! rsurf display contracts.
//!
//! The pipeline hands a finished image to a [`DisplaySurface`] and moves on;
//! whatever the surface does afterwards cannot fail the render. Concrete
//! surfaces:
//! - [`HeadlessDisplay`]: never available, always compiled
//! - `WindowDisplay` (feature `window`): a native window via eframe

pub mod server;
#[cfg(feature = "window")]
pub mod window;

pub use server::DisplayServer;
#[cfg(feature = "window")]
pub use window::WindowDisplay;

use image::RgbImage;
use rsurf_common::error::RsurfResult;

/// An image ready to be shown, with its window title.
#[derive(Debug, Clone)]
pub struct Presentation {
    pub image: RgbImage,
    pub title: String,
}

impl Presentation {
    /// Presentation titled `rsurf: <base name> (<directory>)`.
    pub fn for_scene(image: RgbImage, base_name: &str, parent_dir: &str) -> Self {
        Self {
            image,
            title: format!("rsurf: {base_name} ({parent_dir})"),
        }
    }
}

/// A place finished images can be shown.
pub trait DisplaySurface {
    /// Whether an interactive display can be used in this environment.
    fn is_available(&self) -> bool;

    /// Hand an image over for presentation. Must not block on the user.
    fn dispatch(&mut self, presentation: Presentation) -> RsurfResult<()>;

    /// Keep dispatched presentations on screen until the user dismisses them.
    /// Called by the application after the pipeline has finished.
    fn run_until_closed(&mut self) {}
}

/// Display used when no interactive surface exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessDisplay;

impl DisplaySurface for HeadlessDisplay {
    fn is_available(&self) -> bool {
        false
    }

    fn dispatch(&mut self, presentation: Presentation) -> RsurfResult<()> {
        tracing::debug!(title = %presentation.title, "Headless display dropped presentation");
        Ok(())
    }
}

/// Best display for this build and environment.
pub fn platform_display() -> Box<dyn DisplaySurface> {
    let server = DisplayServer::detect();
    tracing::debug!(?server, "Detected display server");

    #[cfg(feature = "window")]
    {
        if server.is_interactive() {
            return Box::new(WindowDisplay::new(server));
        }
    }

    Box::new(HeadlessDisplay)
}
