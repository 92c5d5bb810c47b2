use crate::pixel::{alpha, blue, clamp_channel, green, pack, red};

/// Unpack (6), nine weighted products, six sums, three clamps.
pub const OPS_PER_PIXEL: u64 = 24;

#[inline]
pub fn sepia(p: u32) -> u32 {
    let r = red(p) as f64;
    let g = green(p) as f64;
    let b = blue(p) as f64;

    let sr = clamp_channel(0.393 * r + 0.769 * g + 0.189 * b);
    let sg = clamp_channel(0.349 * r + 0.686 * g + 0.168 * b);
    let sb = clamp_channel(0.272 * r + 0.534 * g + 0.131 * b);

    pack(alpha(p), sr, sg, sb)
}
