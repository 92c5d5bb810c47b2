pub mod fork_join;
pub mod frames;
pub mod pool;
pub mod sequential;
pub mod task;

use crate::kernel::Kernel;
use crate::pixel_buf::PixelBuffer;
use task::{TaskRange, TaskStats};

/// Apply `kernel` to every pixel of the rows in `range`.
///
/// Sequential and fork-join runs both go through here, so they differ only
/// in which thread writes a given row.
///
/// `out` holds exactly the output rows of `range`, starting at `range.start_y`.
pub(crate) fn process_rows(
    src: &PixelBuffer,
    kernel: &Kernel,
    range: TaskRange,
    out: &mut [u32],
    depth: u32,
) -> TaskStats {
    let width = src.width as usize;
    debug_assert_eq!(out.len(), range.rows() as usize * width);

    for (y, row) in (range.start_y..range.end_y).zip(out.chunks_exact_mut(width)) {
        kernel.apply_row(src, y, row);
    }

    TaskStats::leaf(out.len() as u64, kernel.ops_per_pixel(), depth)
}
