//! Creation-time resolution for reproducible output.
//!
//! The `SOURCE_DATE_EPOCH` override is read once, at the process boundary, and
//! handed to whatever needs a timestamp as a [`CreationClock`]. Nothing below the
//! boundary looks at the environment.

use chrono::{DateTime, Utc};

use crate::error::{RsurfError, RsurfResult};

/// Environment variable carrying the reproducible-build timestamp.
pub const SOURCE_DATE_EPOCH: &str = "SOURCE_DATE_EPOCH";

/// Source of the creation timestamp embedded in output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationClock {
    /// Use the wall clock at the moment the timestamp is taken.
    WallClock,

    /// Use a fixed instant (from `SOURCE_DATE_EPOCH`).
    Fixed(DateTime<Utc>),
}

impl CreationClock {
    /// Resolve the clock from the process environment.
    pub fn from_env() -> RsurfResult<Self> {
        match std::env::var(SOURCE_DATE_EPOCH) {
            Ok(value) => Self::from_override(Some(&value)),
            Err(std::env::VarError::NotPresent) => Ok(Self::WallClock),
            Err(std::env::VarError::NotUnicode(_)) => Err(RsurfError::config(format!(
                "{SOURCE_DATE_EPOCH} is not valid unicode"
            ))),
        }
    }

    /// Resolve the clock from an optional override value.
    ///
    /// A present value must be an integer number of seconds since the Unix epoch.
    pub fn from_override(value: Option<&str>) -> RsurfResult<Self> {
        let Some(raw) = value else {
            return Ok(Self::WallClock);
        };
        let secs: i64 = raw.parse().map_err(|_| {
            RsurfError::config(format!(
                "{SOURCE_DATE_EPOCH} must be an integer number of seconds, got {raw:?}"
            ))
        })?;
        Self::from_epoch_seconds(secs)
    }

    /// Fixed clock at the given Unix timestamp.
    pub fn from_epoch_seconds(secs: i64) -> RsurfResult<Self> {
        DateTime::from_timestamp(secs, 0)
            .map(Self::Fixed)
            .ok_or_else(|| {
                RsurfError::config(format!(
                    "{SOURCE_DATE_EPOCH} value {secs} is outside the representable range"
                ))
            })
    }

    /// The creation instant.
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::WallClock => Utc::now(),
            Self::Fixed(at) => *at,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}
