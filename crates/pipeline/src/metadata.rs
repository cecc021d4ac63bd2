//! Provenance metadata embedded in every output image.
//!
//! Three text entries: who made the file, when, and with which settings. With
//! a fixed [`CreationClock`] the entries depend only on the quality level, so
//! repeated runs produce identical bytes.

use chrono::{DateTime, Utc};

use rsurf_common::clock::CreationClock;

use crate::quality::QualityLevel;
use crate::PROGRAM_NAME;

pub const KEY_SOFTWARE: &str = "Software";
pub const KEY_CREATION_TIME: &str = "CreationTime";
pub const KEY_SOURCE: &str = "Source";

/// UTC, minute precision, numeric offset: `2023-11-14T22:13+0000`.
pub const CREATION_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M%z";

/// Text entries for one output image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    pub software: String,
    pub creation_time: String,
    pub source: String,
}

impl ImageMetadata {
    /// Metadata for a render at `quality`, timestamped by `clock`.
    pub fn build(quality: QualityLevel, clock: &CreationClock) -> Self {
        Self {
            software: software_identity(),
            creation_time: format_creation_time(clock.now()),
            source: format!("{PROGRAM_NAME} settings: --quality {quality}"),
        }
    }

    /// `(keyword, value)` pairs in the order they are written.
    pub fn entries(&self) -> [(&'static str, &str); 3] {
        [
            (KEY_SOFTWARE, self.software.as_str()),
            (KEY_CREATION_TIME, self.creation_time.as_str()),
            (KEY_SOURCE, self.source.as_str()),
        ]
    }
}

/// Program name and version.
pub fn software_identity() -> String {
    format!("{PROGRAM_NAME} version {}", env!("CARGO_PKG_VERSION"))
}

pub fn format_creation_time(at: DateTime<Utc>) -> String {
    at.format(CREATION_TIME_FORMAT).to_string()
}
