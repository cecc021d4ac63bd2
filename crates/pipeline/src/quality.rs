//! Quality level to anti-aliasing resolution.

use std::fmt;

use rsurf_common::error::{RsurfError, RsurfResult};
use rsurf_renderer::{AntiAliasing, AntiAliasingMode, AntiAliasingPattern};

/// User-facing quality knob, 0 (low) to 3 (extreme).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualityLevel(u8);

impl QualityLevel {
    pub const LOW: QualityLevel = QualityLevel(0);
    pub const MEDIUM: QualityLevel = QualityLevel(1);
    pub const HIGH: QualityLevel = QualityLevel(2);
    pub const EXTREME: QualityLevel = QualityLevel(3);

    pub const ALL: [QualityLevel; 4] = [Self::LOW, Self::MEDIUM, Self::HIGH, Self::EXTREME];

    /// Accepts exactly 0, 1, 2 or 3.
    pub fn new(level: i64) -> RsurfResult<Self> {
        match level {
            0..=3 => Ok(Self(level as u8)),
            other => Err(RsurfError::config(format!(
                "quality must be 0, 1, 2 or 3, got {other}"
            ))),
        }
    }

    /// Parse a command-line value.
    pub fn parse(text: &str) -> RsurfResult<Self> {
        let level: i64 = text.trim().parse().map_err(|_| {
            RsurfError::config(format!("quality must be an integer, got {text:?}"))
        })?;
        Self::new(level)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Anti-aliasing strategy for this level.
    pub fn anti_aliasing(self) -> AntiAliasing {
        use AntiAliasingMode::*;
        use AntiAliasingPattern::*;
        match self.0 {
            0 => AntiAliasing::new(AdaptiveSupersampling, OrderedGrid1x1),
            1 => AntiAliasing::new(AdaptiveSupersampling, Quincunx),
            2 => AntiAliasing::new(AdaptiveSupersampling, OrderedGrid4x4),
            _ => AntiAliasing::new(Supersampling, OrderedGrid4x4),
        }
    }
}

impl Default for QualityLevel {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map a raw quality level to its anti-aliasing mode and pattern.
pub fn resolve(level: i64) -> RsurfResult<(AntiAliasingMode, AntiAliasingPattern)> {
    let aa = QualityLevel::new(level)?.anti_aliasing();
    Ok((aa.mode, aa.pattern))
}
