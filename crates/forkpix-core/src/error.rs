use thiserror::Error;

/// Failures reported by the transform engine.
///
/// Every variant is raised before any pixel work starts, so a caller never
/// observes a partially written output buffer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("unsupported effect: {0:?}")]
    UnsupportedEffect(String),

    #[error("invalid convolution kernel: {0}")]
    InvalidKernel(String),

    #[error("row threshold must be at least 1, got {0}")]
    InvalidThreshold(u32),

    #[error("worker count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
