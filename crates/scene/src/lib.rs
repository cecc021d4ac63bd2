//! Scene model for rsurf.
//!
//! A scene is a `.jsurf` script: a properties file whose entries name an
//! implicit surface equation, its parameters, materials and the view. This
//! crate turns such a script into a validated [`Scene`] ready for rendering.

pub mod expr;
pub mod linalg;
pub mod properties;
pub mod scene;

pub use expr::{Expr, ExprError};
pub use linalg::{Mat3, Vec3};
pub use properties::Properties;
pub use scene::{Camera, Color, Scene, SceneSource};
