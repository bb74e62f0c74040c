// ---------------------------------------------------------------------------
// Filters: pure functions from a 3×3 neighborhood to one output color.
// ---------------------------------------------------------------------------

use rgb::Rgba;

use crate::Neighborhood;

/// A per-pixel transform driven by the pixel's 3×3 neighborhood.
///
/// Implementations must be pure: the same neighborhood always yields the same
/// color, regardless of where in the image it was taken or in which order
/// pixels are visited. Channels may be fractional or out of range; the
/// [`Convolver`](crate::Convolver) rounds and saturates them on store.
///
/// Any `Fn(&Neighborhood) -> Rgba<f32>` is a filter:
///
/// ```rust
/// use hood::{ImageBuffer, Neighborhood};
/// use rgb::Rgba;
///
/// let invert = |n: &Neighborhood| {
///     let c = n.center();
///     Rgba::new(255.0 - f32::from(c.r), 255.0 - f32::from(c.g), 255.0 - f32::from(c.b), f32::from(c.a))
/// };
/// let src = ImageBuffer::from_pixels(1, 1, &[Rgba::new(0u8, 100, 255, 255)]).unwrap();
/// assert_eq!(hood::apply(&src, &invert).pixel(0, 0), Rgba::new(255, 155, 0, 255));
/// ```
pub trait Filter {
    fn compute(&self, neighborhood: &Neighborhood) -> Rgba<f32>;
}

impl<F> Filter for F
where
    F: Fn(&Neighborhood) -> Rgba<f32>,
{
    #[inline]
    fn compute(&self, neighborhood: &Neighborhood) -> Rgba<f32> {
        self(neighborhood)
    }
}

/// Halves R, G and B of the center pixel. Alpha is kept, neighbors ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Darkener;

impl Filter for Darkener {
    #[inline]
    fn compute(&self, neighborhood: &Neighborhood) -> Rgba<f32> {
        let c = neighborhood.center();
        Rgba::new(
            f32::from(c.r) / 2.0,
            f32::from(c.g) / 2.0,
            f32::from(c.b) / 2.0,
            f32::from(c.a),
        )
    }
}

/// 3×3 box blur: each channel is the mean of all nine pixels, center included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Averager;

impl Filter for Averager {
    #[inline]
    fn compute(&self, neighborhood: &Neighborhood) -> Rgba<f32> {
        let mut sum = [0u32; 4];
        for px in neighborhood {
            sum[0] += u32::from(px.r);
            sum[1] += u32::from(px.g);
            sum[2] += u32::from(px.b);
            sum[3] += u32::from(px.a);
        }
        Rgba::new(
            sum[0] as f32 / 9.0,
            sum[1] as f32 / 9.0,
            sum[2] as f32 / 9.0,
            sum[3] as f32 / 9.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Neighborhood {
        let mut px = [Rgba::default(); 9];
        for (i, p) in px.iter_mut().enumerate() {
            let v = i as u8;
            *p = Rgba::new(v, v * 2, v * 3, 255 - v);
        }
        Neighborhood::new(px)
    }

    #[test]
    fn test_darkener_uses_center_only() {
        let out = Darkener.compute(&ramp());
        // center is index 4
        assert_eq!(out, Rgba::new(2.0, 4.0, 6.0, 251.0));
    }

    #[test]
    fn test_darkener_keeps_fraction() {
        let n = Neighborhood::uniform(Rgba::new(255u8, 1, 0, 7));
        assert_eq!(Darkener.compute(&n), Rgba::new(127.5, 0.5, 0.0, 7.0));
    }

    #[test]
    fn test_averager_means_all_nine() {
        // 0+1+..+8 = 36
        let out = Averager.compute(&ramp());
        assert_eq!(out, Rgba::new(4.0, 8.0, 12.0, (9.0 * 255.0 - 36.0) / 9.0));
    }

    #[test]
    fn test_averager_uniform_is_identity() {
        let px = Rgba::new(13u8, 200, 255, 90);
        let out = Averager.compute(&Neighborhood::uniform(px));
        assert_eq!(out, Rgba::new(13.0, 200.0, 255.0, 90.0));
    }

    #[test]
    fn test_closure_filter() {
        let alpha_only = |n: &Neighborhood| Rgba::new(0.0, 0.0, 0.0, f32::from(n[0].a));
        assert_eq!(alpha_only.compute(&ramp()), Rgba::new(0.0, 0.0, 0.0, 255.0));
    }
}
