// ---------------------------------------------------------------------------
// Owned, tightly packed RGBA image.
// ---------------------------------------------------------------------------

use alloc::vec;
use alloc::vec::Vec;

use rgb::Rgba;

use crate::SizeError;

/// A `width × height` RGBA image stored as row-major bytes, 4 per pixel.
///
/// Dimensions are fixed for the buffer's lifetime and never zero; the byte
/// length is always exactly `width * height * 4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

pub(crate) fn packed_len(width: usize, height: usize) -> Result<usize, SizeError> {
    if width == 0 || height == 0 {
        return Err(SizeError::ZeroDimension);
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(4))
        .ok_or(SizeError::PixelCountMismatch)
}

impl ImageBuffer {
    /// Allocate a zeroed (transparent black) image.
    pub fn new(width: usize, height: usize) -> Result<Self, SizeError> {
        let len = packed_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Wrap existing RGBA bytes. `data.len()` must equal `width * height * 4`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, SizeError> {
        if data.len() != packed_len(width, height)? {
            return Err(SizeError::PixelCountMismatch);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Copy typed pixels into a new image. `pixels.len()` must equal `width * height`.
    pub fn from_pixels(
        width: usize,
        height: usize,
        pixels: &[Rgba<u8>],
    ) -> Result<Self, SizeError> {
        Self::from_raw(width, height, bytemuck::cast_slice(pixels).to_vec())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The same memory viewed as pixels.
    #[inline]
    pub fn pixels(&self) -> &[Rgba<u8>] {
        bytemuck::cast_slice(&self.data)
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgba<u8>] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    /// Color at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// If `x >= width` or `y >= height`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba<u8> {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels()[y * self.width + x]
    }

    /// Set the color at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// If `x >= width` or `y >= height`.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, px: Rgba<u8>) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let w = self.width;
        self.pixels_mut()[y * w + x] = px;
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}
