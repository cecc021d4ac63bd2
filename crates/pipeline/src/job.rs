//! One render, from scene script to delivered image.

use std::time::Instant;

use image::RgbImage;

use rsurf_common::clock::CreationClock;
use rsurf_common::error::RsurfResult;
use rsurf_display::DisplaySurface;
use rsurf_renderer::{CpuSurfaceRenderer, SurfaceRenderer};
use rsurf_scene::{Scene, SceneSource};

use crate::buffer::PixelBuffer;
use crate::metadata::ImageMetadata;
use crate::orient::flip_vertical;
use crate::output::{self, Delivery, OutputRequest, OutputSink};
use crate::settings::RenderConfiguration;

/// A fully resolved render request.
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Scene script to load.
    pub source: SceneSource,

    /// Where the image goes.
    pub sink: OutputSink,

    pub config: RenderConfiguration,

    /// Timestamp source for `CreationTime`.
    pub clock: CreationClock,
}

impl RenderJob {
    /// Resolve the sink for `request` and bundle everything a render needs.
    pub fn new(
        source: SceneSource,
        request: &OutputRequest,
        config: RenderConfiguration,
        clock: CreationClock,
        display_available: bool,
    ) -> Self {
        let sink = output::resolve_sink(&source, request, display_available);
        Self {
            source,
            sink,
            config,
            clock,
        }
    }
}

/// Load the scene, render it on the CPU, and deliver the result.
pub fn execute(job: &RenderJob, display: &mut dyn DisplaySurface) -> RsurfResult<Delivery> {
    tracing::info!(
        input = %job.source.path().display(),
        sink = ?job.sink,
        size = job.config.image_size(),
        quality = %job.config.quality(),
        "Starting render"
    );

    let scene = Scene::load(&job.source)?;
    tracing::debug!(equation = %scene.equation, "Scene loaded");

    let renderer = CpuSurfaceRenderer::new(scene);
    execute_with(job, &renderer, display)
}

/// Render with `renderer` and deliver. The scene is whatever `renderer` holds.
pub fn execute_with(
    job: &RenderJob,
    renderer: &dyn SurfaceRenderer,
    display: &mut dyn DisplaySurface,
) -> RsurfResult<Delivery> {
    let image = render_image(renderer, &job.config)?;
    let metadata = ImageMetadata::build(job.config.quality(), &job.clock);
    output::deliver(&job.sink, image, &metadata, &job.source, display)
}

/// Allocate, draw and flip into a top-down image.
pub fn render_image(
    renderer: &dyn SurfaceRenderer,
    config: &RenderConfiguration,
) -> RsurfResult<RgbImage> {
    let size = config.image_size();
    let mut buffer = PixelBuffer::allocate(size, size)?;

    let started = Instant::now();
    renderer.draw(config.anti_aliasing(), buffer.as_mut_slice(), size, size)?;
    tracing::info!(
        renderer = renderer.name(),
        anti_aliasing = %config.anti_aliasing(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Render complete"
    );

    Ok(flip_vertical(&buffer.into_image()?))
}
