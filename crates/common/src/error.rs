//! Error types shared across rsurf crates.
//!
//! Every failure belongs to exactly one pipeline [`Stage`]; the stage decides
//! the process exit code so callers can tell the four failure classes apart.

use std::path::PathBuf;

/// Top-level error type for rsurf operations.
#[derive(Debug, thiserror::Error)]
pub enum RsurfError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unable to read scene {}: {message}", path.display())]
    SceneLoad { path: PathBuf, message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Unable to write {}: {message}", path.display())]
    Output { path: PathBuf, message: String },
}

/// Result type alias using RsurfError.
pub type RsurfResult<T> = Result<T, RsurfError>;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Config,
    SceneLoad,
    Render,
    Output,
}

impl Stage {
    /// Process exit code reported for a failure in this stage.
    pub fn exit_code(self) -> u8 {
        match self {
            Stage::Config => 255,
            Stage::SceneLoad => 254,
            Stage::Render => 253,
            Stage::Output => 252,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Config => "configuration",
            Stage::SceneLoad => "scene",
            Stage::Render => "render",
            Stage::Output => "output",
        }
    }
}

impl RsurfError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn scene_load(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::SceneLoad {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn output(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Output {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::Config { .. } => Stage::Config,
            Self::SceneLoad { .. } => Stage::SceneLoad,
            Self::Render { .. } => Stage::Render,
            Self::Output { .. } => Stage::Output,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.stage().exit_code()
    }
}
