//! Render one scene.

use rsurf_common::clock::CreationClock;
use rsurf_common::config::RenderDefaults;
use rsurf_common::error::RsurfResult;
use rsurf_display::DisplaySurface;
use rsurf_pipeline::{execute, Delivery, OutputRequest, RenderConfiguration, RenderJob};
use rsurf_scene::SceneSource;

use crate::Cli;

/// Validate the request, then load, render and deliver.
///
/// Everything that can be rejected without touching the scene is checked
/// first, so bad flags never cost a render.
pub fn run(
    cli: &Cli,
    defaults: &RenderDefaults,
    display: &mut dyn DisplaySurface,
) -> RsurfResult<Delivery> {
    let config =
        RenderConfiguration::from_args(cli.size.as_deref(), cli.quality.as_deref(), defaults)?;
    let clock = CreationClock::from_env()?;
    if clock.is_fixed() {
        tracing::debug!(at = %clock.now(), "Using fixed creation time");
    }

    let request = OutputRequest {
        positional: cli.output.clone(),
        option: cli.output_option.clone(),
        display_requested: cli.gui,
    };
    let job = RenderJob::new(
        SceneSource::from_arg(&cli.input),
        &request,
        config,
        clock,
        display.is_available(),
    );

    execute(&job, display)
}
