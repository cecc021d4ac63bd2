//! Parallel CPU renderer.

use rayon::prelude::*;

use rsurf_common::error::{RsurfError, RsurfResult};
use rsurf_scene::Scene;

use crate::antialias::{AntiAliasing, AntiAliasingMode, Sample};
use crate::raycast::{Tracer, DEFAULT_STEPS};
use crate::shading::{background, shade, to_u8};
use crate::SurfaceRenderer;

/// Largest per-channel difference between neighbouring centre samples that
/// still counts as a flat region in adaptive mode.
pub const ADAPTIVE_THRESHOLD: f64 = 1.0 / 32.0;

/// Ray-casting renderer for one scene.
#[derive(Debug, Clone)]
pub struct CpuSurfaceRenderer {
    scene: Scene,
    steps: usize,
}

impl CpuSurfaceRenderer {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            steps: DEFAULT_STEPS,
        }
    }

    /// Override the number of root-search steps per ray.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps.max(1);
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

/// Pixel-to-image-plane mapping shared by all samples of one render.
struct Frame<'a> {
    tracer: Tracer<'a>,
    scene: &'a Scene,
    width: f64,
    height: f64,
    aspect: f64,
}

impl Frame<'_> {
    /// Colour at sub-pixel position `(dx, dy)` of pixel `(x, row)`; row 0 is the bottom.
    fn sample(&self, x: u32, row: u32, dx: f64, dy: f64) -> [f64; 3] {
        let u = ((x as f64 + dx) / self.width * 2.0 - 1.0) * self.aspect;
        let v = (row as f64 + dy) / self.height * 2.0 - 1.0;
        let ray = self.tracer.primary_ray(u, v);
        match self.tracer.intersect(&ray) {
            Some(hit) => shade(self.scene, &hit, &ray),
            None => background(self.scene),
        }
    }

    fn sample_pattern(&self, x: u32, row: u32, samples: &[Sample]) -> [f64; 3] {
        let mut acc = [0.0; 3];
        for s in samples {
            let c = self.sample(x, row, s.dx, s.dy);
            for k in 0..3 {
                acc[k] += c[k] * s.weight;
            }
        }
        acc
    }
}

fn differs(a: &[f64; 3], b: &[f64; 3]) -> bool {
    a.iter()
        .zip(b.iter())
        .any(|(x, y)| (x - y).abs() > ADAPTIVE_THRESHOLD)
}

fn write_pixel(dst: &mut [u8], c: [f64; 3]) {
    dst[0] = to_u8(c[0]);
    dst[1] = to_u8(c[1]);
    dst[2] = to_u8(c[2]);
}

impl SurfaceRenderer for CpuSurfaceRenderer {
    fn draw(
        &self,
        aa: AntiAliasing,
        buffer: &mut [u8],
        width: u32,
        height: u32,
    ) -> RsurfResult<()> {
        if width == 0 || height == 0 {
            return Err(RsurfError::render(format!(
                "cannot render a {width}x{height} image"
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| RsurfError::render("image dimensions overflow"))?;
        if buffer.len() != expected {
            return Err(RsurfError::render(format!(
                "pixel buffer holds {} bytes, {width}x{height} RGB needs {expected}",
                buffer.len()
            )));
        }

        let frame = Frame {
            tracer: Tracer::new(&self.scene, self.steps),
            scene: &self.scene,
            width: width as f64,
            height: height as f64,
            aspect: width as f64 / height as f64,
        };
        let row_bytes = width as usize * 3;
        let samples = aa.pattern.samples();

        tracing::debug!(
            width,
            height,
            anti_aliasing = %aa,
            steps = self.steps,
            "Rendering surface"
        );

        match aa.mode {
            AntiAliasingMode::None => {
                buffer
                    .par_chunks_mut(row_bytes)
                    .enumerate()
                    .for_each(|(row, line)| {
                        for (x, px) in line.chunks_exact_mut(3).enumerate() {
                            write_pixel(px, frame.sample(x as u32, row as u32, 0.5, 0.5));
                        }
                    });
            }
            AntiAliasingMode::Supersampling => {
                buffer
                    .par_chunks_mut(row_bytes)
                    .enumerate()
                    .for_each(|(row, line)| {
                        for (x, px) in line.chunks_exact_mut(3).enumerate() {
                            write_pixel(px, frame.sample_pattern(x as u32, row as u32, &samples));
                        }
                    });
            }
            AntiAliasingMode::AdaptiveSupersampling => {
                let w = width as usize;
                let h = height as usize;
                let mut centers: Vec<[f64; 3]> = Vec::new();
                centers.try_reserve_exact(w * h).map_err(|e| {
                    RsurfError::render(format!(
                        "cannot allocate adaptive sampling buffer for {width}x{height}: {e}"
                    ))
                })?;
                centers.resize(w * h, [0.0; 3]);
                centers
                    .par_chunks_mut(w)
                    .enumerate()
                    .for_each(|(row, line)| {
                        for (x, c) in line.iter_mut().enumerate() {
                            *c = frame.sample(x as u32, row as u32, 0.5, 0.5);
                        }
                    });

                let refine = samples.len() > 1;
                let refined: usize = buffer
                    .par_chunks_mut(row_bytes)
                    .enumerate()
                    .map(|(row, line)| {
                        let mut count = 0usize;
                        for (x, px) in line.chunks_exact_mut(3).enumerate() {
                            let here = &centers[row * w + x];
                            let edge = refine
                                && ((x > 0 && differs(here, &centers[row * w + x - 1]))
                                    || (x + 1 < w && differs(here, &centers[row * w + x + 1]))
                                    || (row > 0 && differs(here, &centers[(row - 1) * w + x]))
                                    || (row + 1 < h && differs(here, &centers[(row + 1) * w + x])));
                            let color = if edge {
                                count += 1;
                                frame.sample_pattern(x as u32, row as u32, &samples)
                            } else {
                                *here
                            };
                            write_pixel(px, color);
                        }
                        count
                    })
                    .sum();
                tracing::debug!(refined, total = w * h, "Adaptive supersampling pass done");
            }
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "cpu"
    }
}
