use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use super::pool::WorkerPool;
use super::sequential;
use super::task::TaskStats;
use crate::error::{Error, Result};
use crate::kernel::Kernel;
use crate::pixel_buf::PixelBuffer;

/// Transform a batch of frames on `workers` threads, one task per frame.
/// Results come back in input order.
pub fn transform_frames(
    frames: &[PixelBuffer],
    kernel: &Kernel,
    workers: usize,
) -> Result<Vec<PixelBuffer>> {
    validate_frames(frames)?;
    let pool = WorkerPool::new(workers)?;
    run(frames, kernel, &pool).map(|(out, _)| out)
}

pub fn validate_frames(frames: &[PixelBuffer]) -> Result<()> {
    if frames.is_empty() {
        return Err(Error::InvalidImage("frame batch is empty".into()));
    }
    frames.iter().try_for_each(PixelBuffer::validate)
}

/// Transform every frame on the calling thread.
pub fn run_sequential(
    frames: &[PixelBuffer],
    kernel: &Kernel,
) -> Result<(Vec<PixelBuffer>, TaskStats)> {
    validate_frames(frames)?;
    let mut stats = TaskStats::default();
    let mut out = Vec::with_capacity(frames.len());
    for frame in frames {
        let (buf, s) = sequential::run_unchecked(frame, kernel);
        stats = stats.merge(s);
        out.push(buf);
    }
    Ok((out, stats))
}

/// Transform frames concurrently on `pool`, one task per frame.
pub fn run(
    frames: &[PixelBuffer],
    kernel: &Kernel,
    pool: &WorkerPool,
) -> Result<(Vec<PixelBuffer>, TaskStats)> {
    validate_frames(frames)?;
    let t0 = Instant::now();

    let results: Vec<(PixelBuffer, TaskStats)> = pool.install(|| {
        frames
            .par_iter()
            .map(|frame| sequential::run_unchecked(frame, kernel))
            .collect()
    });

    let mut stats = TaskStats::default();
    let mut out = Vec::with_capacity(results.len());
    for (buf, s) in results {
        stats = stats.merge(s);
        out.push(buf);
    }

    debug!(
        %kernel,
        frames = frames.len(),
        workers = pool.workers(),
        elapsed_us = t0.elapsed().as_micros(),
        "frame batch transform"
    );
    Ok((out, stats))
}
