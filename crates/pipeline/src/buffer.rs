//! Pixel buffer shared between the renderer and the image encoder.
//!
//! One allocation travels through the whole render: the renderer writes into
//! it, [`PixelBuffer::view`] reads it in place, and [`PixelBuffer::into_image`]
//! hands the same memory to the image layer.

use image::{ImageBuffer, Rgb, RgbImage};

use rsurf_common::error::{RsurfError, RsurfResult};

/// Channels per pixel (R, G, B).
pub const CHANNELS: usize = 3;

/// Zero-initialised RGB8 storage for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Allocate `3 * width * height` zeroed channel slots.
    ///
    /// A size the allocator refuses is a render error, not an abort.
    pub fn allocate(width: u32, height: u32) -> RsurfResult<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| {
                RsurfError::render(format!("{width}x{height} pixel buffer is too large"))
            })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            RsurfError::render(format!(
                "cannot allocate {len} bytes for a {width}x{height} image: {e}"
            ))
        })?;
        data.resize(len, 0);

        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Mutable channel storage for the renderer.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Borrowed image view over the current contents, no copy.
    pub fn view(&self) -> RsurfResult<ImageBuffer<Rgb<u8>, &[u8]>> {
        ImageBuffer::from_raw(self.width, self.height, self.data.as_slice())
            .ok_or_else(|| self.size_mismatch())
    }

    /// Give the storage to an owned image, no copy.
    pub fn into_image(self) -> RsurfResult<RgbImage> {
        let err = self.size_mismatch();
        ImageBuffer::from_raw(self.width, self.height, self.data).ok_or(err)
    }

    fn size_mismatch(&self) -> RsurfError {
        RsurfError::render(format!(
            "{} bytes do not form a {}x{} RGB image",
            self.data.len(),
            self.width,
            self.height
        ))
    }
}
