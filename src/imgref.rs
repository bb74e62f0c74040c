//! Whole-image filtering over [`imgref`] types.
//!
//! Strided sources are fine: padding pixels past `width` are never read, and
//! the output is always tightly packed.
//!
//! ```rust
//! use rgb::Rgba;
//! use ::imgref::ImgVec;
//! use hood::{imgref, Averager};
//!
//! let img = ImgVec::new(vec![Rgba::new(40u8, 80, 120, 255); 12], 4, 3);
//! let blurred: ImgVec<Rgba<u8>> = imgref::apply(img.as_ref(), &Averager);
//! assert_eq!(blurred.buf()[5], Rgba::new(40, 80, 120, 255));
//! ```
//!
//! # Caller-provided destination
//!
//! ```rust
//! use rgb::Rgba;
//! use ::imgref::{ImgRefMut, ImgVec};
//! use hood::{imgref, Darkener};
//!
//! let src = ImgVec::new(vec![Rgba::new(200u8, 100, 50, 255); 4], 2, 2);
//! let mut dst_buf = vec![Rgba::default(); 4];
//! let dst = ImgRefMut::new(&mut dst_buf, 2, 2);
//! imgref::apply_into(src.as_ref(), dst, &Darkener).unwrap();
//! assert_eq!(dst_buf[0], Rgba::new(100, 50, 25, 255));
//! ```

use alloc::vec;

use imgref::{ImgRef, ImgRefMut, ImgVec};
use rgb::Rgba;

use crate::{Convolver, Filter, SizeError};

fn check_dims(sw: usize, sh: usize, dw: usize, dh: usize) -> Result<(), SizeError> {
    if sw == 0 || sh == 0 {
        Err(SizeError::ZeroDimension)
    } else if sw != dw || sh != dh {
        Err(SizeError::PixelCountMismatch)
    } else {
        Ok(())
    }
}

impl Convolver {
    /// Filter an `ImgRef<Rgba<u8>>` into a new, tightly packed `ImgVec`.
    ///
    /// # Panics
    ///
    /// If the image has zero width or height.
    pub fn apply_img<F: Filter + ?Sized>(
        &self,
        img: ImgRef<'_, Rgba<u8>>,
        filter: &F,
    ) -> ImgVec<Rgba<u8>> {
        let (w, h) = (img.width(), img.height());
        let mut dst = ImgVec::new(vec![Rgba::default(); w * h], w, h);
        self.apply_img_into(img, dst.as_mut(), filter)
            .expect("source dimensions must be non-zero");
        dst
    }

    /// Filter between two `imgref` images of equal size. Either may be strided.
    pub fn apply_img_into<F: Filter + ?Sized>(
        &self,
        src: ImgRef<'_, Rgba<u8>>,
        mut dst: ImgRefMut<'_, Rgba<u8>>,
        filter: &F,
    ) -> Result<(), SizeError> {
        let (w, h) = (src.width(), src.height());
        check_dims(w, h, dst.width(), dst.height())?;
        let src_stride = src.stride() * 4;
        let dst_stride = dst.stride() * 4;
        let src_px: &[Rgba<u8>] = src.buf();
        let dst_px: &mut [Rgba<u8>] = dst.buf_mut();
        let src_bytes: &[u8] = bytemuck::cast_slice(src_px);
        let dst_bytes: &mut [u8] = bytemuck::cast_slice_mut(dst_px);
        self.apply_strided(src_bytes, dst_bytes, w, h, src_stride, dst_stride, filter)
    }

    /// [`apply_img`](Self::apply_img), one row per rayon task.
    #[cfg(feature = "rayon")]
    pub fn par_apply_img<F: Filter + Sync + ?Sized>(
        &self,
        img: ImgRef<'_, Rgba<u8>>,
        filter: &F,
    ) -> ImgVec<Rgba<u8>> {
        let (w, h) = (img.width(), img.height());
        let mut dst = ImgVec::new(vec![Rgba::default(); w * h], w, h);
        let src_px: &[Rgba<u8>] = img.buf();
        let dst_px: &mut [Rgba<u8>] = dst.buf_mut();
        self.par_apply_strided(
            bytemuck::cast_slice(src_px),
            bytemuck::cast_slice_mut(dst_px),
            w,
            h,
            img.stride() * 4,
            w * 4,
            filter,
        )
        .expect("source dimensions must be non-zero");
        dst
    }
}

/// Filter an image with the default [`Convolver`].
///
/// # Panics
///
/// If the image has zero width or height.
pub fn apply<F: Filter + ?Sized>(img: ImgRef<'_, Rgba<u8>>, filter: &F) -> ImgVec<Rgba<u8>> {
    Convolver::new().apply_img(img, filter)
}

/// Filter into a caller-provided image with the default [`Convolver`].
pub fn apply_into<F: Filter + ?Sized>(
    src: ImgRef<'_, Rgba<u8>>,
    dst: ImgRefMut<'_, Rgba<u8>>,
    filter: &F,
) -> Result<(), SizeError> {
    Convolver::new().apply_img_into(src, dst, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Averager, Darkener, ImageBuffer};
    use alloc::vec::Vec;

    fn distinct(n: usize) -> Vec<Rgba<u8>> {
        (0..n)
            .map(|i| Rgba::new(i as u8 * 7, i as u8 * 3, 255 - i as u8, 200))
            .collect()
    }

    #[test]
    fn test_apply_img_matches_buffer_api() {
        let px = distinct(20);
        let img = ImgVec::new(px.clone(), 5, 4);
        let out = apply(img.as_ref(), &Averager);
        let expected = crate::apply(&ImageBuffer::from_pixels(5, 4, &px).unwrap(), &Averager);
        assert_eq!(out.width(), 5);
        assert_eq!(out.height(), 4);
        assert_eq!(out.buf().as_slice(), expected.pixels());
    }

    #[test]
    fn test_strided_source_ignores_padding() {
        // 3 pixels wide with stride 4; padding column is loud.
        let loud = Rgba::new(255u8, 255, 255, 255);
        let px = distinct(6);
        let buf = vec![
            px[0], px[1], px[2], loud, //
            px[3], px[4], px[5], loud,
        ];
        let img = ImgVec::new_stride(buf, 3, 2, 4);
        let out = apply(img.as_ref(), &Averager);
        let expected = crate::apply(&ImageBuffer::from_pixels(3, 2, &px).unwrap(), &Averager);
        assert_eq!(out.buf().as_slice(), expected.pixels());
    }

    #[test]
    fn test_apply_into_dimension_mismatch() {
        let src = ImgVec::new(distinct(4), 2, 2);
        let mut dst_buf = vec![Rgba::default(); 6];
        let dst = ImgRefMut::new(&mut dst_buf, 3, 2);
        assert_eq!(
            apply_into(src.as_ref(), dst, &Darkener),
            Err(SizeError::PixelCountMismatch)
        );
    }

    #[test]
    fn test_apply_into_strided_destination() {
        let src = ImgVec::new(distinct(4), 2, 2);
        let marker = Rgba::new(1u8, 2, 3, 4);
        let mut dst_buf = vec![marker; 6];
        let dst = ImgRefMut::new_stride(&mut dst_buf, 2, 2, 3);
        apply_into(src.as_ref(), dst, &Darkener).unwrap();
        assert_eq!(dst_buf[2], marker);
        assert_eq!(dst_buf[5], marker);
        let expected = crate::apply(
            &ImageBuffer::from_pixels(2, 2, src.buf()).unwrap(),
            &Darkener,
        );
        assert_eq!(&dst_buf[0..2], &expected.pixels()[0..2]);
        assert_eq!(&dst_buf[3..5], &expected.pixels()[2..4]);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_par_apply_img() {
        let img = ImgVec::new(distinct(30), 6, 5);
        let c = Convolver::new();
        assert_eq!(
            c.par_apply_img(img.as_ref(), &Averager).buf(),
            c.apply_img(img.as_ref(), &Averager).buf()
        );
    }
}
