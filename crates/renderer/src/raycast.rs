//! Ray/surface intersection.
//!
//! Rays are traced in camera space. The surface equation lives in surface
//! space; points are mapped through `Scene::to_surface` before evaluation.
//! Only the part of the surface inside the clipping sphere is visible.

use rsurf_scene::linalg::{add, dot, normalize, scale, Vec3};
use rsurf_scene::Scene;

/// Uniform steps taken through the clipping sphere when looking for a sign change.
pub const DEFAULT_STEPS: usize = 128;

const BISECTION_ITERATIONS: usize = 48;

/// First visible surface point along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub t: f64,
    pub point: Vec3,
    /// Unit gradient direction in camera space (not yet oriented to the viewer).
    pub normal: Vec3,
}

/// A ray with unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn at(&self, t: f64) -> Vec3 {
        add(self.origin, scale(self.dir, t))
    }
}

/// Traces rays against one scene.
#[derive(Debug, Clone)]
pub struct Tracer<'a> {
    scene: &'a Scene,
    eye: Vec3,
    tan_half_fov: f64,
    steps: usize,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene, steps: usize) -> Self {
        Self {
            scene,
            eye: [0.0, 0.0, scene.camera.distance],
            tan_half_fov: (scene.camera.fov_deg.to_radians() * 0.5).tan(),
            steps: steps.max(1),
        }
    }

    /// Primary ray through image-plane coordinates `u, v` in `[-1, 1]`
    /// (`v = -1` is the bottom edge).
    pub fn primary_ray(&self, u: f64, v: f64) -> Ray {
        let d = [u * self.tan_half_fov, v * self.tan_half_fov, -1.0];
        Ray {
            origin: self.eye,
            dir: normalize(d).unwrap_or([0.0, 0.0, -1.0]),
        }
    }

    fn field(&self, p: Vec3) -> f64 {
        self.scene.surface.eval(self.scene.to_surface.mul_vec(p))
    }

    /// Parameter interval where the ray is inside the clipping sphere.
    pub fn clip_interval(&self, ray: &Ray) -> Option<(f64, f64)> {
        let r = self.scene.clip_radius;
        let b = dot(ray.origin, ray.dir);
        let c = dot(ray.origin, ray.origin) - r * r;
        let disc = b * b - c;
        if disc <= 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let t0 = (-b - sq).max(0.0);
        let t1 = -b + sq;
        (t1 > t0).then_some((t0, t1))
    }

    /// First intersection of `ray` with the surface inside the clipping sphere.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let (t0, t1) = self.clip_interval(ray)?;
        let dt = (t1 - t0) / self.steps as f64;

        let mut prev_t = t0;
        let mut prev_f = self.field(ray.at(t0));
        if prev_f == 0.0 {
            return Some(self.hit(ray, t0));
        }

        for i in 1..=self.steps {
            let t = t0 + dt * i as f64;
            let f = self.field(ray.at(t));
            if f == 0.0 {
                return Some(self.hit(ray, t));
            }
            if f.is_finite() && prev_f.is_finite() && (f < 0.0) != (prev_f < 0.0) {
                return Some(self.hit(ray, self.bisect(ray, prev_t, prev_f, t)));
            }
            prev_t = t;
            prev_f = f;
        }
        None
    }

    fn bisect(&self, ray: &Ray, mut lo: f64, lo_f: f64, mut hi: f64) -> f64 {
        let lo_negative = lo_f < 0.0;
        for _ in 0..BISECTION_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            let f = self.field(ray.at(mid));
            if f == 0.0 {
                return mid;
            }
            if (f < 0.0) == lo_negative {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }

    fn hit(&self, ray: &Ray, t: f64) -> Hit {
        let point = ray.at(t);
        let normal = self
            .gradient(point)
            .and_then(normalize)
            .unwrap_or_else(|| scale(ray.dir, -1.0));
        Hit { t, point, normal }
    }

    /// Central-difference gradient of the field in camera space.
    pub fn gradient(&self, p: Vec3) -> Option<Vec3> {
        let h = 1e-6 * self.scene.clip_radius.max(1.0);
        let mut g = [0.0; 3];
        for (axis, out) in g.iter_mut().enumerate() {
            let mut a = p;
            let mut b = p;
            a[axis] += h;
            b[axis] -= h;
            *out = (self.field(a) - self.field(b)) / (2.0 * h);
        }
        g.iter().all(|c| c.is_finite()).then_some(g)
    }
}
