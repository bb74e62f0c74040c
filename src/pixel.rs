// ---------------------------------------------------------------------------
// Neighborhood of a pixel and conversion of filter output back to storage.
// ---------------------------------------------------------------------------

use core::ops::Index;

use rgb::Rgba;

/// The 3×3 block of colors around a pixel, in row-major order.
///
/// Index 0 is top-left, 4 is the center pixel itself, 8 is bottom-right.
/// Positions outside the image have already been resolved by the convolver,
/// so every entry is a real source color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood([Rgba<u8>; 9]);

impl Neighborhood {
    /// Index of the center pixel.
    pub const CENTER: usize = 4;

    /// Wrap nine pixels given in row-major order.
    pub const fn new(pixels: [Rgba<u8>; 9]) -> Self {
        Self(pixels)
    }

    /// A neighborhood where all nine entries are `px`, as seen by every
    /// pixel of a 1×1 image.
    pub const fn uniform(px: Rgba<u8>) -> Self {
        Self([px; 9])
    }

    /// The pixel the filter's result will replace.
    #[inline]
    pub fn center(&self) -> Rgba<u8> {
        self.0[Self::CENTER]
    }

    /// Entry at `row`, `col` of the 3×3 grid (each 0..3).
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> Rgba<u8> {
        self.0[row * 3 + col]
    }

    /// All nine entries, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Rgba<u8>; 9] {
        &self.0
    }

    /// Iterate the entries in row-major order.
    pub fn iter(&self) -> core::slice::Iter<'_, Rgba<u8>> {
        self.0.iter()
    }
}

impl Index<usize> for Neighborhood {
    type Output = Rgba<u8>;

    #[inline]
    fn index(&self, i: usize) -> &Rgba<u8> {
        &self.0[i]
    }
}

impl<'a> IntoIterator for &'a Neighborhood {
    type Item = &'a Rgba<u8>;
    type IntoIter = core::slice::Iter<'a, Rgba<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// How a filter's real-valued channel becomes a stored byte.
///
/// Every mode first saturates to `0..=255`; NaN stores as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rounding {
    /// Nearest integer, ties away from zero (`127.5` → `128`).
    #[default]
    HalfUp,
    /// Nearest integer, ties to even (`127.5` → `128`, `126.5` → `126`).
    ///
    /// Matches what an HTML canvas `Uint8ClampedArray` stores.
    HalfEven,
    /// Drop the fractional part (`127.9` → `127`).
    Truncate,
}

impl Rounding {
    /// Convert one channel.
    #[inline]
    pub fn channel(self, v: f32) -> u8 {
        if v.is_nan() || v <= 0.0 {
            return 0;
        }
        if v >= 255.0 {
            return 255;
        }
        // Work from the truncated value; `v + 0.5` can round up in f32.
        let floor = v as u8;
        let frac = v - f32::from(floor);
        match self {
            Rounding::HalfUp if frac >= 0.5 => floor + 1,
            Rounding::HalfEven if frac > 0.5 || (frac == 0.5 && floor & 1 == 1) => floor + 1,
            _ => floor,
        }
    }

    /// Convert all four channels of a filter result.
    #[inline]
    pub fn pixel(self, px: Rgba<f32>) -> Rgba<u8> {
        Rgba::new(
            self.channel(px.r),
            self.channel(px.g),
            self.channel(px.b),
            self.channel(px.a),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Neighborhood {
        let mut px = [Rgba::default(); 9];
        for (i, p) in px.iter_mut().enumerate() {
            let v = i as u8 * 10;
            *p = Rgba::new(v, v + 1, v + 2, 255);
        }
        Neighborhood::new(px)
    }

    #[test]
    fn test_center_and_grid_access() {
        let n = grid();
        assert_eq!(n.center(), Rgba::new(40, 41, 42, 255));
        assert_eq!(n.at(0, 0), n[0]);
        assert_eq!(n.at(1, 1), n.center());
        assert_eq!(n.at(2, 1), n[7]);
        assert_eq!(n.iter().count(), 9);
    }

    #[test]
    fn test_uniform() {
        let px = Rgba::new(1u8, 2, 3, 4);
        let n = Neighborhood::uniform(px);
        assert!(n.iter().all(|&p| p == px));
    }

    #[test]
    fn test_half_up() {
        let r = Rounding::HalfUp;
        assert_eq!(r.channel(127.5), 128);
        assert_eq!(r.channel(126.5), 127);
        assert_eq!(r.channel(127.49), 127);
        assert_eq!(r.channel(0.0), 0);
        assert_eq!(r.channel(255.0), 255);
        assert_eq!(r.channel(254.5), 255);
    }

    #[test]
    fn test_half_up_just_below_half() {
        let r = Rounding::HalfUp;
        assert_eq!(r.channel(0.49999997), 0);
        assert_eq!(r.channel(254.49998), 254);
        assert_eq!(r.channel(f32::from_bits(0.5f32.to_bits() - 1)), 0);
    }

    #[test]
    fn test_half_even() {
        let r = Rounding::HalfEven;
        assert_eq!(r.channel(127.5), 128);
        assert_eq!(r.channel(126.5), 126);
        assert_eq!(r.channel(0.5), 0);
        assert_eq!(r.channel(1.5), 2);
        assert_eq!(r.channel(126.6), 127);
        assert_eq!(r.channel(254.5), 254);
    }

    #[test]
    fn test_truncate() {
        let r = Rounding::Truncate;
        assert_eq!(r.channel(127.9), 127);
        assert_eq!(r.channel(0.99), 0);
    }

    #[test]
    fn test_out_of_range_saturates() {
        for r in [Rounding::HalfUp, Rounding::HalfEven, Rounding::Truncate] {
            assert_eq!(r.channel(-3.0), 0, "{r:?}");
            assert_eq!(r.channel(300.0), 255, "{r:?}");
            assert_eq!(r.channel(f32::NAN), 0, "{r:?}");
            assert_eq!(r.channel(f32::INFINITY), 255, "{r:?}");
            assert_eq!(r.channel(f32::NEG_INFINITY), 0, "{r:?}");
        }
    }

    #[test]
    fn test_pixel_conversion() {
        let px = Rounding::HalfUp.pixel(Rgba::new(10.5, 20.4, 0.0, 255.0));
        assert_eq!(px, Rgba::new(11, 20, 0, 255));
    }
}
