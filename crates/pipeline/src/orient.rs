//! Row-order correction between renderer and image conventions.
//!
//! Renderers emit the bottom row first; PNG stores the top row first. The flip
//! is applied to every render, whatever the scene.

use image::{imageops, GenericImageView, ImageBuffer, Pixel};

/// New image with rows in reverse order: `out[x, y] == image[x, height - 1 - y]`.
pub fn flip_vertical<I>(image: &I) -> ImageBuffer<I::Pixel, Vec<<I::Pixel as Pixel>::Subpixel>>
where
    I: GenericImageView,
    I::Pixel: 'static,
{
    imageops::flip_vertical(image)
}
