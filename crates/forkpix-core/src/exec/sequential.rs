use std::time::Instant;

use tracing::debug;

use super::process_rows;
use super::task::{TaskRange, TaskStats};
use crate::error::Result;
use crate::kernel::Kernel;
use crate::pixel_buf::PixelBuffer;

/// Single-threaded reference transform.
pub fn transform_sequential(src: &PixelBuffer, kernel: &Kernel) -> Result<PixelBuffer> {
    run(src, kernel).map(|(out, _)| out)
}

/// Row-major pass over the whole image on the calling thread.
pub fn run(src: &PixelBuffer, kernel: &Kernel) -> Result<(PixelBuffer, TaskStats)> {
    src.validate()?;
    Ok(run_unchecked(src, kernel))
}

pub(crate) fn run_unchecked(src: &PixelBuffer, kernel: &Kernel) -> (PixelBuffer, TaskStats) {
    let t0 = Instant::now();
    let mut pixels = vec![0u32; src.pixel_count()];
    let stats = process_rows(src, kernel, TaskRange::new(0, src.height), &mut pixels, 0);
    debug!(
        %kernel,
        width = src.width,
        height = src.height,
        elapsed_us = t0.elapsed().as_micros(),
        "sequential transform"
    );
    let out = PixelBuffer {
        width: src.width,
        height: src.height,
        pixels,
    };
    (out, stats)
}
