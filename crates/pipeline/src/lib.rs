//! rsurf render pipeline.
//!
//! Stages, in the order a render runs through them:
//! - `settings` / `quality`: user input to an immutable [`RenderConfiguration`]
//! - `buffer`: the pixel buffer handed to the renderer and its image view
//! - `orient`: bottom-up renderer rows to top-down image rows
//! - `metadata`: provenance text entries
//! - `materialize`: PNG encoding and atomic file / stream writes
//! - `output`: choosing and feeding the sink
//! - `job`: running all of the above for one scene

pub mod buffer;
pub mod job;
pub mod materialize;
pub mod metadata;
pub mod orient;
pub mod output;
pub mod quality;
pub mod settings;

pub use buffer::PixelBuffer;
pub use job::{execute, execute_with, render_image, RenderJob};
pub use metadata::ImageMetadata;
pub use output::{Delivery, OutputRequest, OutputSink};
pub use quality::QualityLevel;
pub use settings::RenderConfiguration;

/// Program name used in metadata and window titles.
pub const PROGRAM_NAME: &str = "rsurf";
