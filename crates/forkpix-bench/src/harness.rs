use std::time::Instant;

use tracing::{debug, info};

use forkpix_core::exec::{fork_join, frames, sequential};
use forkpix_core::{Error, Kernel, PixelBuffer, Result, TaskStats, WorkerPool};

use crate::config::BenchmarkConfig;
use crate::metrics::{Speedup, TimingTable, WorkerTiming};

/// Outcome of one image benchmark.
#[derive(Clone, Debug)]
pub struct BenchmarkResult {
    pub kernel: Kernel,
    pub width: u32,
    pub height: u32,
    pub threshold: u32,
    pub timings: TimingTable,
    pub speedup: Option<Speedup>,
    pub sequential_image: PixelBuffer,
    /// Output of the widest (max worker) parallel run.
    pub parallel_image: PixelBuffer,
    pub sequential_stats: TaskStats,
    pub parallel_stats: TaskStats,
}

impl BenchmarkResult {
    pub fn sequential_ms(&self) -> u64 {
        self.timings.sequential_ms()
    }

    pub fn parallel_ms_by_workers(&self) -> Vec<(usize, u64)> {
        self.timings.parallel_ms_by_workers()
    }

    pub fn outputs_match(&self) -> bool {
        self.sequential_image == self.parallel_image
    }
}

/// Outcome of a frame-batch benchmark.
#[derive(Clone, Debug)]
pub struct FrameBenchmarkResult {
    pub kernel: Kernel,
    pub frames: usize,
    pub timings: TimingTable,
    pub speedup: Option<Speedup>,
    /// Frames from the widest parallel run, in input order.
    pub outputs: Vec<PixelBuffer>,
    pub stats: TaskStats,
    pub outputs_match: bool,
}

/// Sequential baseline followed by fork-join runs on 1..=max_workers threads.
pub struct Benchmark {
    config: BenchmarkConfig,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Time one image transform at every worker count.
    ///
    /// All inputs are checked before the first timed run, so a failure never
    /// leaves a partial timing table behind.
    pub fn run(&self, src: &PixelBuffer, kernel: &Kernel) -> Result<BenchmarkResult> {
        src.validate()?;
        self.config.validate()?;
        let threshold = self.config.threshold;

        info!(
            %kernel,
            width = src.width,
            height = src.height,
            threshold,
            max_workers = self.config.max_workers,
            "starting benchmark"
        );

        let t0 = Instant::now();
        let (sequential_image, sequential_stats) = sequential::run(src, kernel)?;
        let sequential = t0.elapsed();
        info!(elapsed_ms = sequential.as_millis(), "sequential run");

        let mut parallel = Vec::with_capacity(self.config.max_workers);
        let mut last = None;
        for workers in 1..=self.config.max_workers {
            let pool = WorkerPool::new(workers)?;
            let t0 = Instant::now();
            let (image, stats) = fork_join::run(src, kernel, threshold, &pool)?;
            let elapsed = t0.elapsed();
            pool.shutdown();

            info!(workers, elapsed_ms = elapsed.as_millis(), "parallel run");
            parallel.push(WorkerTiming { workers, elapsed });
            last = Some((image, stats));
        }
        let (parallel_image, parallel_stats) =
            last.ok_or(Error::InvalidWorkerCount(self.config.max_workers))?;

        let timings = TimingTable {
            sequential,
            parallel,
        };
        let speedup = timings.speedup();
        if let Some(s) = speedup {
            info!(
                speedup = s.speedup,
                efficiency = s.efficiency,
                "benchmark complete"
            );
        }
        debug!(
            leaves = parallel_stats.leaves,
            operations = parallel_stats.operations,
            "task tree"
        );

        Ok(BenchmarkResult {
            kernel: kernel.clone(),
            width: src.width,
            height: src.height,
            threshold,
            timings,
            speedup,
            sequential_image,
            parallel_image,
            sequential_stats,
            parallel_stats,
        })
    }

    /// Time a frame batch: one sequential pass, then one task per frame on
    /// pools of 1..=max_workers threads.
    pub fn run_frames(&self, batch: &[PixelBuffer], kernel: &Kernel) -> Result<FrameBenchmarkResult> {
        frames::validate_frames(batch)?;
        self.config.validate()?;

        info!(%kernel, frames = batch.len(), "starting frame benchmark");

        let t0 = Instant::now();
        let (reference, _) = frames::run_sequential(batch, kernel)?;
        let sequential = t0.elapsed();

        let mut parallel = Vec::with_capacity(self.config.max_workers);
        let mut last = None;
        for workers in 1..=self.config.max_workers {
            let pool = WorkerPool::new(workers)?;
            let t0 = Instant::now();
            let out = frames::run(batch, kernel, &pool)?;
            let elapsed = t0.elapsed();
            pool.shutdown();

            info!(workers, elapsed_ms = elapsed.as_millis(), "parallel frame run");
            parallel.push(WorkerTiming { workers, elapsed });
            last = Some(out);
        }
        let (outputs, stats) = last.ok_or(Error::InvalidWorkerCount(self.config.max_workers))?;

        let timings = TimingTable {
            sequential,
            parallel,
        };
        Ok(FrameBenchmarkResult {
            kernel: kernel.clone(),
            frames: batch.len(),
            speedup: timings.speedup(),
            timings,
            outputs_match: outputs == reference,
            outputs,
            stats,
        })
    }
}

/// Benchmark `src` with the default worker sweep (1..=12).
pub fn benchmark(src: &PixelBuffer, kernel: &Kernel, threshold: u32) -> Result<BenchmarkResult> {
    Benchmark::new(BenchmarkConfig::with_threshold(threshold)).run(src, kernel)
}

pub fn benchmark_frames(batch: &[PixelBuffer], kernel: &Kernel) -> Result<FrameBenchmarkResult> {
    Benchmark::new(BenchmarkConfig::default()).run_frames(batch, kernel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forkpix_core::ConvolutionMatrix;

    fn image(width: u32, height: u32) -> PixelBuffer {
        let pixels = (0..width * height)
            .map(|i| 0xff00_0000 | i.wrapping_mul(0x9e37_79b9) >> 8)
            .collect();
        PixelBuffer::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn full_sweep_has_twelve_entries() {
        let src = image(32, 40);
        let result = benchmark(&src, &Kernel::Grayscale, 8).unwrap();
        let table = result.parallel_ms_by_workers();
        assert_eq!(table.len(), 12);
        let workers: Vec<usize> = table.iter().map(|(w, _)| *w).collect();
        assert_eq!(workers, (1..=12).collect::<Vec<_>>());
        assert!(result.outputs_match());
        assert_eq!(result.threshold, 8);
    }

    #[test]
    fn images_match_reference_transforms() {
        let src = image(17, 29);
        let kernel = Kernel::Convolution(ConvolutionMatrix::blur());
        let result = benchmark(&src, &kernel, 5).unwrap();
        let expected = forkpix_core::transform_sequential(&src, &kernel).unwrap();
        assert_eq!(result.sequential_image, expected);
        assert_eq!(result.parallel_image, expected);
    }

    #[test]
    fn stats_cover_whole_image() {
        let src = image(10, 21);
        let result = benchmark(&src, &Kernel::Sepia, 5).unwrap();
        assert_eq!(result.sequential_stats.pixels, 210);
        assert_eq!(result.parallel_stats.pixels, 210);
        assert_eq!(
            result.parallel_stats.leaves,
            forkpix_core::plan_leaves(21, 5).unwrap().len() as u64
        );
    }

    #[test]
    fn custom_worker_ceiling() {
        let src = image(8, 8);
        let bench = Benchmark::new(BenchmarkConfig {
            threshold: 2,
            max_workers: 3,
        });
        let result = bench.run(&src, &Kernel::Grayscale).unwrap();
        assert_eq!(result.timings.parallel.len(), 3);
        assert_eq!(result.timings.widest().unwrap().workers, 3);
    }

    #[test]
    fn invalid_image_fails_before_timing() {
        let err = benchmark(&PixelBuffer::new(0, 0), &Kernel::Grayscale, 10).unwrap_err();
        assert!(matches!(err, Error::InvalidImage(_)));
    }

    #[test]
    fn zero_threshold_rejected() {
        let err = benchmark(&image(4, 4), &Kernel::Grayscale, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidThreshold(0)));
    }

    #[test]
    fn zero_workers_rejected() {
        let bench = Benchmark::new(BenchmarkConfig {
            threshold: 4,
            max_workers: 0,
        });
        assert!(matches!(
            bench.run(&image(4, 4), &Kernel::Sepia),
            Err(Error::InvalidWorkerCount(0))
        ));
    }

    #[test]
    fn frame_benchmark_sweeps_and_matches() {
        let batch: Vec<_> = (0..6).map(|_| image(12, 9)).collect();
        let result = benchmark_frames(&batch, &Kernel::Grayscale).unwrap();
        assert_eq!(result.frames, 6);
        assert_eq!(result.timings.parallel.len(), 12);
        assert_eq!(result.outputs.len(), 6);
        assert!(result.outputs_match);
        assert_eq!(result.stats.leaves, 6);
    }

    #[test]
    fn empty_frame_batch_rejected() {
        assert!(matches!(
            benchmark_frames(&[], &Kernel::Sepia),
            Err(Error::InvalidImage(_))
        ));
    }
}
