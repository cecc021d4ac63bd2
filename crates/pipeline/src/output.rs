//! Output routing.
//!
//! A render ends in exactly one sink. An available display takes precedence
//! over any file path; otherwise the positional output beats `--output`, and
//! with neither the image lands next to the working directory as
//! `<scene base name>.png`.

use std::io::Write;
use std::path::{Path, PathBuf};

use image::RgbImage;

use rsurf_common::error::RsurfResult;
use rsurf_display::{DisplaySurface, Presentation};
use rsurf_scene::SceneSource;

use crate::materialize::{self, PNG_EXTENSION};
use crate::metadata::ImageMetadata;

/// Spelling of stdout on the command line.
pub const STDOUT_MARKER: &str = "-";

/// Where the finished image goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    File(PathBuf),
    Stdout,
    Display,
    /// Render only; nothing is written. Never chosen by [`resolve_sink`].
    None,
}

impl OutputSink {
    /// Sink named by an output argument.
    pub fn from_arg(arg: &str) -> Self {
        if arg == STDOUT_MARKER {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(arg))
        }
    }
}

/// Output choices as given by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRequest {
    /// Second positional argument.
    pub positional: Option<String>,
    /// `--output` value.
    pub option: Option<String>,
    /// `--gui`.
    pub display_requested: bool,
}

impl OutputRequest {
    /// Explicit output argument, positional first.
    pub fn explicit(&self) -> Option<&str> {
        self.positional.as_deref().or(self.option.as_deref())
    }
}

/// Pick the sink for one render.
///
/// A display that was asked for but is not available is ignored without
/// comment, and the request falls through to file or stream output.
pub fn resolve_sink(
    source: &SceneSource,
    request: &OutputRequest,
    display_available: bool,
) -> OutputSink {
    if request.display_requested {
        if display_available {
            return OutputSink::Display;
        }
        tracing::debug!("Display requested but not available; writing output instead");
    }

    match request.explicit() {
        Some(arg) => OutputSink::from_arg(arg),
        None => OutputSink::File(default_output_path(source)),
    }
}

/// `<base name>.png` in the working directory.
pub fn default_output_path(source: &SceneSource) -> PathBuf {
    PathBuf::from(format!("{}.{PNG_EXTENSION}", source.base_name()))
}

/// What happened to the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Written(PathBuf),
    Streamed,
    Displayed,
    Discarded,
}

/// Hand the finished image to `sink`.
pub fn deliver(
    sink: &OutputSink,
    image: RgbImage,
    metadata: &ImageMetadata,
    source: &SceneSource,
    display: &mut dyn DisplaySurface,
) -> RsurfResult<Delivery> {
    match sink {
        OutputSink::File(path) => {
            materialize::write_file(path, &image, metadata)?;
            tracing::info!(path = %path.display(), "Wrote image");
            Ok(Delivery::Written(path.clone()))
        }
        OutputSink::Stdout => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_to_stream(&mut lock, &image, metadata)?;
            Ok(Delivery::Streamed)
        }
        OutputSink::Display => {
            let presentation =
                Presentation::for_scene(image, &source.base_name(), &source.parent_dir());
            display.dispatch(presentation)?;
            Ok(Delivery::Displayed)
        }
        OutputSink::None => Ok(Delivery::Discarded),
    }
}

/// Encode into any stream, reported as stdout in errors.
pub fn write_to_stream(
    writer: &mut dyn Write,
    image: &RgbImage,
    metadata: &ImageMetadata,
) -> RsurfResult<()> {
    materialize::write_stream(writer, Path::new("<stdout>"), image, metadata)
}
