// Pixels are packed as 0xAARRGGBB: alpha in the most significant byte.

#[inline]
pub fn alpha(p: u32) -> u32 {
    (p >> 24) & 0xff
}

#[inline]
pub fn red(p: u32) -> u32 {
    (p >> 16) & 0xff
}

#[inline]
pub fn green(p: u32) -> u32 {
    (p >> 8) & 0xff
}

#[inline]
pub fn blue(p: u32) -> u32 {
    p & 0xff
}

/// Pack four channel values. Each channel must already be in 0..=255.
#[inline]
pub fn pack(a: u32, r: u32, g: u32, b: u32) -> u32 {
    (a << 24) | (r << 16) | (g << 8) | b
}

/// Truncate toward zero and clamp to a valid 8-bit channel.
#[inline]
pub fn clamp_channel(v: f64) -> u32 {
    (v as i64).clamp(0, 255) as u32
}

/// Clamp a signed sample coordinate into `0..len` (edge replication).
#[inline]
pub fn clamp_coord(v: i64, len: u32) -> u32 {
    v.clamp(0, len as i64 - 1) as u32
}
