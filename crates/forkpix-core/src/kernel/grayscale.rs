use crate::pixel::{alpha, blue, green, pack, red};

/// Shifts, masks, multiplies and adds spent per pixel.
pub const OPS_PER_PIXEL: u64 = 11;

/// Rec. 601 luma, `floor(0.299 R + 0.587 G + 0.114 B)`.
///
/// Evaluated in fixed point so the floor is exact: an equal-channel pixel
/// maps to itself, and the result can never leave 0..=255.
#[inline]
pub fn grayscale(p: u32) -> u32 {
    let luma = (299 * red(p) + 587 * green(p) + 114 * blue(p)) / 1000;
    pack(alpha(p), luma, luma, luma)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_and_white() {
        let luma: Vec<u32> = [0xFFFF0000, 0xFF00FF00, 0xFF0000FF, 0xFFFFFFFF]
            .into_iter()
            .map(|p| grayscale(p) & 0xff)
            .collect();
        assert_eq!(luma, vec![76, 149, 29, 255]);
    }

    #[test]
    fn channels_equal_after_conversion() {
        let out = grayscale(0xFF_64_32_19);
        assert_eq!(red(out), green(out));
        assert_eq!(green(out), blue(out));
    }

    #[test]
    fn gray_pixels_are_fixed_points() {
        for v in 0..=255u32 {
            let p = pack(0xff, v, v, v);
            assert_eq!(grayscale(p), p, "gray level {v} should map to itself");
        }
    }

    #[test]
    fn alpha_untouched() {
        for a in [0x00, 0x01, 0x7f, 0xfe, 0xff] {
            let out = grayscale(pack(a, 200, 10, 90));
            assert_eq!(alpha(out), a);
        }
    }
}
