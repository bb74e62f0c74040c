//! # hood
//!
//! *Know your neighbors.*
//!
//! Every pixel gets a say from the eight pixels around it. `hood` walks an
//! RGBA image, hands each pixel's 3×3 [`Neighborhood`] to a [`Filter`], and
//! writes whatever color comes back into a fresh output buffer.
//!
//! ```rust
//! use hood::{Averager, ImageBuffer};
//! use rgb::Rgba;
//!
//! let src = ImageBuffer::from_pixels(3, 3, &[Rgba::new(90u8, 60, 30, 255); 9]).unwrap();
//! let blurred = hood::apply(&src, &Averager);
//! assert_eq!(blurred.pixel(1, 1), Rgba::new(90, 60, 30, 255));
//! ```
//!
//! ## Edges
//!
//! Neighbors that fall outside the image don't replicate the nearest edge
//! pixel. Each out-of-range row or column falls back to the center pixel's own
//! row or column, independently — see [`clamp_index`].
//!
//! ## Feature flags
//!
//! - **`std`** (default) — Links `std`. Nothing in the crate needs it; it
//!   exists so `rayon` can require it and so `default-features = false`
//!   yields a pure `alloc` build.
//! - **`imgref`** — Whole-image entry points over strided [`imgref`] buffers.
//! - **`rayon`** — `par_apply*` methods on [`Convolver`] that process rows in
//!   parallel. Output is identical to the sequential path. Implies `std`.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod buffer;
mod convolve;
mod filter;
mod pixel;

pub use buffer::ImageBuffer;
pub use convolve::{Convolver, apply, clamp_index};
pub use filter::{Averager, Darkener, Filter};
pub use pixel::{Neighborhood, Rounding};

#[cfg(feature = "imgref")]
pub mod imgref;

/// A buffer's length or dimensions don't describe a valid RGBA image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SizeError {
    /// Width or height is zero.
    ZeroDimension,
    /// Byte length doesn't match `width * height * 4`, or source and
    /// destination dimensions differ.
    PixelCountMismatch,
    /// Stride is shorter than a row, or the buffer can't hold `height` rows.
    InvalidStride,
}

impl core::fmt::Display for SizeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SizeError::ZeroDimension => f.write_str("image width and height must be non-zero"),
            SizeError::PixelCountMismatch => {
                f.write_str("buffer length does not match image dimensions")
            }
            SizeError::InvalidStride => {
                f.write_str("stride is too small or buffer too short for the given stride")
            }
        }
    }
}

impl core::error::Error for SizeError {}
