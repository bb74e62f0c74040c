// ---------------------------------------------------------------------------
// 3×3 neighborhood convolution.
//
// Every entry point validates its buffers up front, then runs the same row
// kernel over a read-only strided source plane. Destination rows are disjoint
// slices, which is all the parallel path needs.
// ---------------------------------------------------------------------------

use rgb::Rgba;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::buffer::packed_len;
use crate::{Filter, ImageBuffer, Neighborhood, Rounding, SizeError};


// ===========================================================================
// Validation helpers
// ===========================================================================

#[inline]
fn check_packed(len: usize, width: usize, height: usize) -> Result<(), SizeError> {
    if len != packed_len(width, height)? {
        Err(SizeError::PixelCountMismatch)
    } else {
        Ok(())
    }
}

#[inline]
fn check_strided(
    len: usize,
    width: usize,
    height: usize,
    stride: usize,
) -> Result<(), SizeError> {
    if width == 0 || height == 0 {
        return Err(SizeError::ZeroDimension);
    }
    let row_bytes = width.checked_mul(4).ok_or(SizeError::InvalidStride)?;
    if row_bytes > stride {
        return Err(SizeError::InvalidStride);
    }
    let total = (height - 1)
        .checked_mul(stride)
        .ok_or(SizeError::InvalidStride)?
        .checked_add(row_bytes)
        .ok_or(SizeError::InvalidStride)?;
    if len < total {
        return Err(SizeError::InvalidStride);
    }
    Ok(())
}

// ===========================================================================
// Edge policy
// ===========================================================================

/// Resolve one axis of a neighbor position.
///
/// Returns `coord + offset` when that lies in `0..size`, otherwise `coord`
/// itself. Out-of-range neighbors fall back to the center's own row or
/// column; they are not clamped to the nearest edge. Rows and columns are
/// resolved independently, so the top-left neighbor of pixel `(0, 0)` is the
/// center, while its top-right neighbor is `(1, 0)`.
///
/// ```rust
/// use hood::clamp_index;
///
/// assert_eq!(clamp_index(3, 10, -1), 2);
/// assert_eq!(clamp_index(0, 10, -1), 0);
/// assert_eq!(clamp_index(9, 10, 1), 9);
/// ```
#[inline]
pub fn clamp_index(coord: usize, size: usize, offset: isize) -> usize {
    match coord.checked_add_signed(offset) {
        Some(c) if c < size => c,
        _ => coord,
    }
}

// ===========================================================================
// Source plane and row kernel
// ===========================================================================

/// Read-only view of a validated strided RGBA buffer.
#[derive(Clone, Copy)]
struct Plane<'a> {
    buf: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl Plane<'_> {
    #[inline(always)]
    fn at(&self, x: usize, y: usize) -> Rgba<u8> {
        let i = y * self.stride + x * 4;
        let px = &self.buf[i..i + 4];
        Rgba::new(px[0], px[1], px[2], px[3])
    }

    #[inline]
    fn neighborhood(&self, x: usize, y: usize) -> Neighborhood {
        Neighborhood::new(core::array::from_fn(|i| {
            let dy = (i / 3) as isize - 1;
            let dx = (i % 3) as isize - 1;
            self.at(
                clamp_index(x, self.width, dx),
                clamp_index(y, self.height, dy),
            )
        }))
    }
}

fn convolve_row<F: Filter + ?Sized>(
    src: &Plane<'_>,
    y: usize,
    dst_row: &mut [u8],
    filter: &F,
    rounding: Rounding,
) {
    for (x, d) in dst_row[..src.width * 4].chunks_exact_mut(4).enumerate() {
        let px = rounding.pixel(filter.compute(&src.neighborhood(x, y)));
        d[0] = px.r;
        d[1] = px.g;
        d[2] = px.b;
        d[3] = px.a;
    }
}

fn convolve_strided<F: Filter + ?Sized>(
    src: &Plane<'_>,
    dst: &mut [u8],
    dst_stride: usize,
    filter: &F,
    rounding: Rounding,
) {
    for (y, row) in dst.chunks_mut(dst_stride).take(src.height).enumerate() {
        convolve_row(src, y, row, filter, rounding);
    }
}

#[cfg(feature = "rayon")]
fn par_convolve_strided<F: Filter + Sync + ?Sized>(
    src: &Plane<'_>,
    dst: &mut [u8],
    dst_stride: usize,
    filter: &F,
    rounding: Rounding,
) {
    dst.par_chunks_mut(dst_stride)
        .take(src.height)
        .enumerate()
        .for_each(|(y, row)| convolve_row(src, y, row, filter, rounding));
}

// ===========================================================================
// Public API
// ===========================================================================

/// Runs a [`Filter`] over every pixel's 3×3 neighborhood.
///
/// The only setting is how fractional filter output is stored; see
/// [`Rounding`]. The default rounds half up.
///
/// ```rust
/// use hood::{Convolver, Darkener, ImageBuffer, Rounding};
/// use rgb::Rgba;
///
/// let src = ImageBuffer::from_pixels(1, 1, &[Rgba::new(255u8, 5, 2, 9)]).unwrap();
///
/// let up = Convolver::new().apply(&src, &Darkener);
/// assert_eq!(up.pixel(0, 0), Rgba::new(128, 3, 1, 9));
///
/// let even = Convolver::new().with_rounding(Rounding::HalfEven).apply(&src, &Darkener);
/// assert_eq!(even.pixel(0, 0), Rgba::new(128, 2, 1, 9));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Convolver {
    rounding: Rounding,
}

impl Convolver {
    pub const fn new() -> Self {
        Self {
            rounding: Rounding::HalfUp,
        }
    }

    pub const fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub const fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// The neighborhood the filter sees for pixel `(x, y)` of `source`.
    ///
    /// # Panics
    ///
    /// If `(x, y)` is outside the image.
    pub fn neighborhood(&self, source: &ImageBuffer, x: usize, y: usize) -> Neighborhood {
        assert!(
            x < source.width() && y < source.height(),
            "pixel ({x}, {y}) out of bounds"
        );
        packed_plane(source).neighborhood(x, y)
    }

    /// Filter `source` into a new image of the same size. `source` is not modified.
    pub fn apply<F: Filter + ?Sized>(&self, source: &ImageBuffer, filter: &F) -> ImageBuffer {
        let mut dst = blank_like(source);
        let src = packed_plane(source);
        convolve_strided(&src, dst.as_bytes_mut(), src.stride, filter, self.rounding);
        dst
    }

    /// Filter tightly packed RGBA bytes into a caller-provided destination.
    ///
    /// Both slices must be exactly `width * height * 4` bytes. Every byte of
    /// `dst` is overwritten.
    pub fn apply_into<F: Filter + ?Sized>(
        &self,
        src: &[u8],
        dst: &mut [u8],
        width: usize,
        height: usize,
        filter: &F,
    ) -> Result<(), SizeError> {
        check_packed(src.len(), width, height)?;
        check_packed(dst.len(), width, height)?;
        let plane = Plane {
            buf: src,
            width,
            height,
            stride: width * 4,
        };
        convolve_strided(&plane, dst, width * 4, filter, self.rounding);
        Ok(())
    }

    /// Filter between strided RGBA buffers.
    ///
    /// `src_stride` / `dst_stride` are the distances in bytes between the
    /// starts of consecutive rows, each ≥ `width * 4`. Padding bytes between
    /// rows are never read or written.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_strided<F: Filter + ?Sized>(
        &self,
        src: &[u8],
        dst: &mut [u8],
        width: usize,
        height: usize,
        src_stride: usize,
        dst_stride: usize,
        filter: &F,
    ) -> Result<(), SizeError> {
        check_strided(src.len(), width, height, src_stride)?;
        check_strided(dst.len(), width, height, dst_stride)?;
        let plane = Plane {
            buf: src,
            width,
            height,
            stride: src_stride,
        };
        convolve_strided(&plane, dst, dst_stride, filter, self.rounding);
        Ok(())
    }

    /// [`apply`](Self::apply), one row per rayon task.
    #[cfg(feature = "rayon")]
    pub fn par_apply<F: Filter + Sync + ?Sized>(
        &self,
        source: &ImageBuffer,
        filter: &F,
    ) -> ImageBuffer {
        let mut dst = blank_like(source);
        let src = packed_plane(source);
        par_convolve_strided(&src, dst.as_bytes_mut(), src.stride, filter, self.rounding);
        dst
    }

    /// [`apply_into`](Self::apply_into), one row per rayon task.
    #[cfg(feature = "rayon")]
    pub fn par_apply_into<F: Filter + Sync + ?Sized>(
        &self,
        src: &[u8],
        dst: &mut [u8],
        width: usize,
        height: usize,
        filter: &F,
    ) -> Result<(), SizeError> {
        check_packed(src.len(), width, height)?;
        check_packed(dst.len(), width, height)?;
        let plane = Plane {
            buf: src,
            width,
            height,
            stride: width * 4,
        };
        par_convolve_strided(&plane, dst, width * 4, filter, self.rounding);
        Ok(())
    }

    /// [`apply_strided`](Self::apply_strided), one row per rayon task.
    #[cfg(feature = "rayon")]
    #[allow(clippy::too_many_arguments)]
    pub fn par_apply_strided<F: Filter + Sync + ?Sized>(
        &self,
        src: &[u8],
        dst: &mut [u8],
        width: usize,
        height: usize,
        src_stride: usize,
        dst_stride: usize,
        filter: &F,
    ) -> Result<(), SizeError> {
        check_strided(src.len(), width, height, src_stride)?;
        check_strided(dst.len(), width, height, dst_stride)?;
        let plane = Plane {
            buf: src,
            width,
            height,
            stride: src_stride,
        };
        par_convolve_strided(&plane, dst, dst_stride, filter, self.rounding);
        Ok(())
    }
}

/// Filter `source` into a new image using the default [`Convolver`].
pub fn apply<F: Filter + ?Sized>(source: &ImageBuffer, filter: &F) -> ImageBuffer {
    Convolver::new().apply(source, filter)
}

fn packed_plane(img: &ImageBuffer) -> Plane<'_> {
    Plane {
        buf: img.as_bytes(),
        width: img.width(),
        height: img.height(),
        stride: img.width() * 4,
    }
}

fn blank_like(img: &ImageBuffer) -> ImageBuffer {
    ImageBuffer::new(img.width(), img.height())
        .expect("source dimensions are already validated")
}
