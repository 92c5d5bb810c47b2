pub mod error;
pub mod exec;
pub mod kernel;
pub mod pixel;
pub mod pixel_buf;

pub use error::{Error, Result};
pub use exec::fork_join::{DEFAULT_THRESHOLD, plan_leaves, transform_parallel};
pub use exec::frames::transform_frames;
pub use exec::pool::WorkerPool;
pub use exec::sequential::transform_sequential;
pub use exec::task::{TaskRange, TaskStats};
pub use kernel::{ConvolutionMatrix, EFFECTS, Kernel};
pub use pixel_buf::PixelBuffer;
