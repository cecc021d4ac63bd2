//! Scene description loaded from a `.jsurf` script.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rsurf_common::error::{RsurfError, RsurfResult};

use crate::expr::Expr;
use crate::linalg::Mat3;
use crate::properties::Properties;

/// Where a scene script is read from. `-` on the command line means stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneSource {
    Stdin,
    File(PathBuf),
}

impl SceneSource {
    pub const STDIO_MARKER: &'static str = "-";

    pub fn from_arg(arg: &str) -> Self {
        if arg == Self::STDIO_MARKER {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    /// Path used in diagnostics (`-` for stdin).
    pub fn path(&self) -> &Path {
        match self {
            Self::Stdin => Path::new(Self::STDIO_MARKER),
            Self::File(p) => p,
        }
    }

    /// File name without directory and last extension (`dir/scene.jsurf` -> `scene`).
    ///
    /// Everything from the last `.` on is dropped, so `.jsurf` has an empty base name.
    pub fn base_name(&self) -> String {
        let name = self
            .path()
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match name.rfind('.') {
            Some(dot) => name[..dot].to_string(),
            None => name,
        }
    }

    /// Directory part of the path, empty when there is none.
    pub fn parent_dir(&self) -> String {
        self.path()
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Linear RGB colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    fn parse(text: &str) -> Result<Self, String> {
        let values = parse_floats(text)?;
        let [r, g, b] = <[f64; 3]>::try_from(values.as_slice())
            .map_err(|_| format!("expected 3 components, got {}", values.len()))?;
        if [r, g, b].iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err("components must lie in [0, 1]".to_string());
        }
        Ok(Self { r, g, b })
    }
}

/// Perspective camera looking down -z from `(0, 0, distance)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub distance: f64,
    /// Vertical field of view in degrees.
    pub fov_deg: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            distance: 4.0,
            fov_deg: 45.0,
        }
    }
}

/// A validated scene.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Equation text as written in the script.
    pub equation: String,
    pub surface: Expr,
    pub parameters: BTreeMap<String, f64>,
    pub background: Color,
    pub front_material: Color,
    pub back_material: Color,
    /// Surface-to-camera transform (rotation · scale).
    pub transform: Mat3,
    /// Camera-to-surface transform.
    pub to_surface: Mat3,
    pub camera: Camera,
    pub clip_radius: f64,
}

pub const DEFAULT_BACKGROUND: Color = Color::new(1.0, 1.0, 1.0);
pub const DEFAULT_FRONT_MATERIAL: Color = Color::new(0.9, 0.6, 0.2);
pub const DEFAULT_BACK_MATERIAL: Color = Color::new(0.3, 0.5, 0.8);
pub const DEFAULT_CLIP_RADIUS: f64 = 1.0;

const PARAMETER_PREFIX: &str = "surface_parameter_";

const KNOWN_KEYS: &[&str] = &[
    "surface_equation",
    "background_color",
    "front_material_color",
    "back_material_color",
    "rotation_matrix",
    "scale_matrix",
    "camera_distance",
    "camera_fov",
    "clip_radius",
];

impl Scene {
    /// Read and validate a scene from its source.
    pub fn load(source: &SceneSource) -> RsurfResult<Self> {
        let path = source.path();
        tracing::debug!(path = %path.display(), "Loading scene");

        let props = match source {
            SceneSource::Stdin => Properties::read_from(std::io::stdin().lock()),
            SceneSource::File(p) => {
                let file = File::open(p).map_err(|e| RsurfError::scene_load(p, e.to_string()))?;
                Properties::read_from(BufReader::new(file))
            }
        }
        .map_err(|e| RsurfError::scene_load(path, e.to_string()))?;

        Self::from_properties(&props).map_err(|msg| RsurfError::scene_load(path, msg))
    }

    /// Parse a scene from script text; `origin` only labels errors.
    pub fn parse_str(text: &str, origin: &Path) -> RsurfResult<Self> {
        Self::from_properties(&Properties::parse(text))
            .map_err(|msg| RsurfError::scene_load(origin, msg))
    }

    /// Build a scene from already-parsed properties.
    pub fn from_properties(props: &Properties) -> Result<Self, String> {
        for key in props.keys() {
            if !KNOWN_KEYS.contains(&key) && !key.starts_with(PARAMETER_PREFIX) {
                tracing::debug!(key, "Ignoring unknown scene key");
            }
        }

        let mut parameters = BTreeMap::new();
        for (name, value) in props.with_prefix(PARAMETER_PREFIX) {
            if matches!(name, "x" | "y" | "z") || name.is_empty() {
                return Err(format!("invalid parameter name '{name}'"));
            }
            let v = parse_number(value).map_err(|e| format!("{PARAMETER_PREFIX}{name}: {e}"))?;
            parameters.insert(name.to_string(), v);
        }

        let equation = props
            .get("surface_equation")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or("missing surface_equation")?
            .to_string();
        let surface =
            Expr::parse(&equation, &parameters).map_err(|e| format!("surface_equation: {e}"))?;

        let background = color_or(props, "background_color", DEFAULT_BACKGROUND)?;
        let front_material = color_or(props, "front_material_color", DEFAULT_FRONT_MATERIAL)?;
        let back_material = color_or(props, "back_material_color", DEFAULT_BACK_MATERIAL)?;

        let rotation = matrix_or_identity(props, "rotation_matrix")?;
        let scale = matrix_or_identity(props, "scale_matrix")?;
        let transform = rotation.mul(&scale);
        let to_surface = transform
            .inverse()
            .ok_or("rotation_matrix * scale_matrix is singular")?;

        let camera = Camera {
            distance: number_or(props, "camera_distance", Camera::default().distance)?,
            fov_deg: number_or(props, "camera_fov", Camera::default().fov_deg)?,
        };
        if camera.distance <= 0.0 {
            return Err("camera_distance must be positive".to_string());
        }
        if !(camera.fov_deg > 0.0 && camera.fov_deg < 180.0) {
            return Err("camera_fov must lie strictly between 0 and 180 degrees".to_string());
        }

        let clip_radius = number_or(props, "clip_radius", DEFAULT_CLIP_RADIUS)?;
        if clip_radius <= 0.0 {
            return Err("clip_radius must be positive".to_string());
        }

        Ok(Self {
            equation,
            surface,
            parameters,
            background,
            front_material,
            back_material,
            transform,
            to_surface,
            camera,
            clip_radius,
        })
    }
}

fn parse_number(text: &str) -> Result<f64, String> {
    let v: f64 = text
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", text.trim()))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("'{}' is not finite", text.trim()))
    }
}

fn parse_floats(text: &str) -> Result<Vec<f64>, String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(parse_number)
        .collect()
}

fn number_or(props: &Properties, key: &str, default: f64) -> Result<f64, String> {
    match props.get(key) {
        Some(v) => parse_number(v).map_err(|e| format!("{key}: {e}")),
        None => Ok(default),
    }
}

fn color_or(props: &Properties, key: &str, default: Color) -> Result<Color, String> {
    match props.get(key) {
        Some(v) => Color::parse(v).map_err(|e| format!("{key}: {e}")),
        None => Ok(default),
    }
}

fn matrix_or_identity(props: &Properties, key: &str) -> Result<Mat3, String> {
    let Some(text) = props.get(key) else {
        return Ok(Mat3::IDENTITY);
    };
    let values = parse_floats(text).map_err(|e| format!("{key}: {e}"))?;
    let values = <[f64; 16]>::try_from(values.as_slice())
        .map_err(|_| format!("{key}: expected 16 values, got {}", values.len()))?;
    Ok(Mat3::from_row_major_4x4(&values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsurf_common::error::Stage;

    #[test]
    fn test_minimal_scene_uses_defaults() {
        let scene = Scene::parse_str("surface_equation=x^2+y^2+z^2-1\n", Path::new("t")).unwrap();
        assert_eq!(scene.background, DEFAULT_BACKGROUND);
        assert_eq!(scene.front_material, DEFAULT_FRONT_MATERIAL);
        assert_eq!(scene.transform, Mat3::IDENTITY);
        assert_eq!(scene.camera, Camera::default());
        assert_eq!(scene.clip_radius, DEFAULT_CLIP_RADIUS);
        assert_eq!(scene.surface.eval([1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_parameters_feed_equation() {
        let text = "surface_parameter_a=0.25\nsurface_equation=x^2+y^2+z^2-a\n";
        let scene = Scene::parse_str(text, Path::new("t")).unwrap();
        assert_eq!(scene.parameters.get("a"), Some(&0.25));
        assert_eq!(scene.surface.eval([0.5, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_missing_equation_is_scene_error() {
        let err = Scene::parse_str("background_color=0 0 0\n", Path::new("broken.jsurf"))
            .unwrap_err();
        assert_eq!(err.stage(), Stage::SceneLoad);
        assert!(err.to_string().contains("broken.jsurf"));
        assert!(err.to_string().contains("missing surface_equation"));
    }

    #[test]
    fn test_bad_color_rejected() {
        let text = "surface_equation=x\nbackground_color=0 0\n";
        assert!(Scene::parse_str(text, Path::new("t")).is_err());
        let text = "surface_equation=x\nbackground_color=0 0 2\n";
        assert!(Scene::parse_str(text, Path::new("t")).is_err());
    }

    #[test]
    fn test_singular_transform_rejected() {
        let text = "surface_equation=x\nscale_matrix=0 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1\n";
        let err = Scene::parse_str(text, Path::new("t")).unwrap_err();
        assert!(err.to_string().contains("singular"));
    }

    #[test]
    fn test_scale_matrix_inverts() {
        let text = "surface_equation=x\nscale_matrix=2 0 0 0 0 2 0 0 0 0 2 0 0 0 0 1\n";
        let scene = Scene::parse_str(text, Path::new("t")).unwrap();
        assert_eq!(scene.to_surface.mul_vec([2.0, 4.0, 6.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_camera_validation() {
        assert!(Scene::parse_str("surface_equation=x\ncamera_fov=180\n", Path::new("t")).is_err());
        assert!(
            Scene::parse_str("surface_equation=x\ncamera_distance=-1\n", Path::new("t")).is_err()
        );
    }

    #[test]
    fn test_source_names() {
        let src = SceneSource::from_arg("scenes/scene.jsurf");
        assert_eq!(src.base_name(), "scene");
        assert_eq!(src.parent_dir(), "scenes");

        let src = SceneSource::from_arg("scene.jsurf");
        assert_eq!(src.base_name(), "scene");
        assert_eq!(src.parent_dir(), "");

        let src = SceneSource::from_arg("-");
        assert_eq!(src, SceneSource::Stdin);
        assert_eq!(src.base_name(), "-");
    }

    #[test]
    fn test_base_name_drops_only_last_extension() {
        assert_eq!(SceneSource::from_arg("gallery/a.b.jsurf").base_name(), "a.b");
        assert_eq!(SceneSource::from_arg("noext").base_name(), "noext");
        assert_eq!(SceneSource::from_arg("dir.d/plain").base_name(), "plain");
        assert_eq!(SceneSource::from_arg(".jsurf").base_name(), "");
        assert_eq!(SceneSource::from_arg("hidden/.jsurf").base_name(), "");
    }
}
