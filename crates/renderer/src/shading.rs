//! Material lighting for surface hits.
//!
//! Two directional lights: a headlight along the view direction and a fixed
//! key light from the upper left. The side of the surface facing the viewer
//! decides between the front and back material.

use rsurf_scene::linalg::{add, dot, normalize, scale, Vec3};
use rsurf_scene::{Color, Scene};

use crate::raycast::{Hit, Ray};

const AMBIENT: f64 = 0.15;
const HEADLIGHT: f64 = 0.55;
const KEY_LIGHT: f64 = 0.35;
const SPECULAR: f64 = 0.3;
const SHININESS: i32 = 32;
const KEY_LIGHT_DIR: Vec3 = [-0.4, 0.6, 0.7];

/// Colour of a hit seen along `ray`, channels in `[0, 1]`.
pub fn shade(scene: &Scene, hit: &Hit, ray: &Ray) -> [f64; 3] {
    let view = scale(ray.dir, -1.0);
    let (material, n) = if dot(hit.normal, view) >= 0.0 {
        (scene.front_material, hit.normal)
    } else {
        (scene.back_material, scale(hit.normal, -1.0))
    };

    let key = normalize(KEY_LIGHT_DIR).unwrap_or(view);
    let diffuse =
        AMBIENT + HEADLIGHT * dot(n, view).max(0.0) + KEY_LIGHT * dot(n, key).max(0.0);

    let half = normalize(add(view, key)).unwrap_or(view);
    let specular = SPECULAR * dot(n, half).max(0.0).powi(SHININESS);

    let base = material.to_array();
    [
        (base[0] * diffuse + specular).clamp(0.0, 1.0),
        (base[1] * diffuse + specular).clamp(0.0, 1.0),
        (base[2] * diffuse + specular).clamp(0.0, 1.0),
    ]
}

/// Background colour as a channel triple.
pub fn background(scene: &Scene) -> [f64; 3] {
    let Color { r, g, b } = scene.background;
    [r, g, b]
}

/// Quantise a `[0, 1]` channel to 8 bits.
pub fn to_u8(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
