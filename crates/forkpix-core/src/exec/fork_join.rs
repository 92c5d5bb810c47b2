use std::time::Instant;

use tracing::debug;

use super::pool::WorkerPool;
use super::process_rows;
use super::task::{TaskRange, TaskStats};
use crate::error::{Error, Result};
use crate::kernel::Kernel;
use crate::pixel_buf::PixelBuffer;

/// Rows handled by a single leaf task unless the caller picks otherwise.
pub const DEFAULT_THRESHOLD: u32 = 100;

pub fn check_threshold(threshold: u32) -> Result<()> {
    if threshold == 0 {
        return Err(Error::InvalidThreshold(threshold));
    }
    Ok(())
}

/// Transform on a freshly built pool of exactly `workers` threads.
///
/// The pool is dropped before returning.
pub fn transform_parallel(
    src: &PixelBuffer,
    kernel: &Kernel,
    threshold: u32,
    workers: usize,
) -> Result<PixelBuffer> {
    src.validate()?;
    check_threshold(threshold)?;
    let pool = WorkerPool::new(workers)?;
    run(src, kernel, threshold, &pool).map(|(out, _)| out)
}

/// Fork-join transform over the row range `[0, height)`.
///
/// Ranges longer than `threshold` rows are halved and both halves run via
/// `rayon::join`; shorter ranges are processed directly. The output slice is
/// split alongside the range, so every leaf writes only its own row band.
pub fn run(
    src: &PixelBuffer,
    kernel: &Kernel,
    threshold: u32,
    pool: &WorkerPool,
) -> Result<(PixelBuffer, TaskStats)> {
    src.validate()?;
    check_threshold(threshold)?;

    let t0 = Instant::now();
    let mut pixels = vec![0u32; src.pixel_count()];
    let root = TaskRange::new(0, src.height);
    let stats = pool.install(|| fork(src, kernel, threshold, root, &mut pixels, 0));

    debug!(
        %kernel,
        workers = pool.workers(),
        threshold,
        leaves = stats.leaves,
        depth = stats.max_depth,
        elapsed_us = t0.elapsed().as_micros(),
        "fork-join transform"
    );

    let out = PixelBuffer {
        width: src.width,
        height: src.height,
        pixels,
    };
    Ok((out, stats))
}

fn fork(
    src: &PixelBuffer,
    kernel: &Kernel,
    threshold: u32,
    range: TaskRange,
    out: &mut [u32],
    depth: u32,
) -> TaskStats {
    if range.rows() <= threshold {
        return process_rows(src, kernel, range, out, depth);
    }

    let (lo, hi) = range.split();
    let (lo_out, hi_out) = out.split_at_mut(lo.rows() as usize * src.width as usize);
    let (a, b) = rayon::join(
        || fork(src, kernel, threshold, lo, lo_out, depth + 1),
        || fork(src, kernel, threshold, hi, hi_out, depth + 1),
    );
    a.merge(b)
}

/// Leaf ranges the scheduler would produce for an image of `height` rows,
/// in top-to-bottom order.
pub fn plan_leaves(height: u32, threshold: u32) -> Result<Vec<TaskRange>> {
    check_threshold(threshold)?;
    let mut leaves = Vec::new();
    collect_leaves(TaskRange::new(0, height), threshold, &mut leaves);
    Ok(leaves)
}

fn collect_leaves(range: TaskRange, threshold: u32, leaves: &mut Vec<TaskRange>) {
    if range.rows() <= threshold {
        leaves.push(range);
        return;
    }
    let (lo, hi) = range.split();
    collect_leaves(lo, threshold, leaves);
    collect_leaves(hi, threshold, leaves);
}
