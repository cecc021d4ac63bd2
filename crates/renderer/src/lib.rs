//! rsurf renderer
//!
//! Evaluates a [`Scene`](rsurf_scene::Scene) into raw pixels:
//! - `antialias`: sampling modes and per-pixel sample patterns
//! - `raycast`: ray/surface intersection and surface normals
//! - `shading`: material lighting
//! - `cpu`: the parallel CPU renderer tying them together
//!
//! Renderers write a flat RGB8 buffer whose first row is the *bottom* of the
//! image. Callers that need top-down rows must flip.

pub mod antialias;
pub mod cpu;
pub mod raycast;
pub mod shading;

pub use antialias::{AntiAliasing, AntiAliasingMode, AntiAliasingPattern, Sample};
pub use cpu::CpuSurfaceRenderer;

use rsurf_common::error::RsurfResult;

/// Something that can fill a pixel buffer.
pub trait SurfaceRenderer: Send + Sync {
    /// Fill `buffer` (`3 * width * height` bytes, RGB, bottom row first).
    fn draw(&self, aa: AntiAliasing, buffer: &mut [u8], width: u32, height: u32)
        -> RsurfResult<()>;

    /// Renderer name for diagnostics.
    fn name(&self) -> &str;
}
