//! Immutable render configuration.

use rsurf_common::config::RenderDefaults;
use rsurf_common::error::{RsurfError, RsurfResult};
use rsurf_renderer::AntiAliasing;

use crate::quality::QualityLevel;

/// Everything a render needs to know about its output raster.
///
/// Built once from user input; the anti-aliasing setting is always the one
/// dictated by `quality`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfiguration {
    image_size: u32,
    quality: QualityLevel,
    anti_aliasing: AntiAliasing,
}

impl RenderConfiguration {
    pub fn new(image_size: u32, quality: QualityLevel) -> RsurfResult<Self> {
        validate_size(image_size as i64)?;
        Ok(Self {
            image_size,
            quality,
            anti_aliasing: quality.anti_aliasing(),
        })
    }

    /// Resolve from optional command-line strings, falling back to `defaults`.
    pub fn from_args(
        size: Option<&str>,
        quality: Option<&str>,
        defaults: &RenderDefaults,
    ) -> RsurfResult<Self> {
        let image_size = match size {
            Some(text) => parse_size(text)?,
            None => validate_size(defaults.size)?,
        };
        let quality = match quality {
            Some(text) => QualityLevel::parse(text)?,
            None => QualityLevel::new(defaults.quality)?,
        };
        Self::new(image_size, quality)
    }

    /// Width and height of the square raster.
    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    pub fn quality(&self) -> QualityLevel {
        self.quality
    }

    pub fn anti_aliasing(&self) -> AntiAliasing {
        self.anti_aliasing
    }
}

/// Parse a command-line size value.
pub fn parse_size(text: &str) -> RsurfResult<u32> {
    let size: i64 = text
        .trim()
        .parse()
        .map_err(|_| RsurfError::config(format!("size must be an integer, got {text:?}")))?;
    validate_size(size)
}

fn validate_size(size: i64) -> RsurfResult<u32> {
    if size <= 0 {
        return Err(RsurfError::config(format!(
            "size must be positive, got {size}"
        )));
    }
    let side = u32::try_from(size)
        .map_err(|_| RsurfError::config(format!("size {size} is too large")))?;
    (side as usize)
        .checked_mul(side as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| RsurfError::config(format!("size {size} is too large")))?;
    Ok(side)
}
